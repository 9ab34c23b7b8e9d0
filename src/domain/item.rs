// ==========================================
// 仓储库位分配系统 - 物料主数据模型
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 2. 库存单元
// 用途: 空库位首次承载该物料时,以 default_slot_capacity 初始化库位容量
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ItemMaster - 物料主数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMaster {
    // ===== 主键 =====
    pub item_id: String,

    // ===== 基本信息 =====
    pub item_name: String,

    // ===== 容量参数 =====
    pub default_slot_capacity: i64, // 单库位默认容量 (单元数)
}
