// ==========================================
// 仓储库位分配系统 - 库存单元领域模型
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 2. 库存单元
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryUnit - 库存单元
// ==========================================
// 一个可单独追踪的物理单元 (序列号/二维码绑定)
// 红线: location_id 只能通过 PlacementRepository.commit 写入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryUnit {
    // ===== 主键 =====
    pub unit_id: String,

    // ===== 归属 =====
    pub item_id: String, // 物料身份 (SKU)

    // ===== 位置 =====
    pub location_id: Option<String>, // None = 入库中,尚未上架

    // ===== 审计 =====
    pub created_at: NaiveDateTime,
}

impl InventoryUnit {
    /// 是否已上架
    pub fn is_placed(&self) -> bool {
        self.location_id.is_some()
    }
}
