// ==========================================
// 仓储库位分配系统 - 上架指令领域模型
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 3. 上架事务
// 红线: "当前库位"是显式字段,禁止伪造 id=-1 之类的哨兵记录
// ==========================================

use crate::domain::location::StorageLocation;
use serde::{Deserialize, Serialize};

// ==========================================
// PlacementAssignment - 单条上架/移库指令
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementAssignment {
    pub unit_id: String,            // 要移动的库存单元
    pub target_location_id: String, // 目标库位
    // 移库来源库位 (上架新单元时为 None)。
    // 仅用于调用方表达意图与展示,实际来源以单元当前 location_id 为准。
    pub current_location_id: Option<String>,
}

// ==========================================
// LocationMutation - 库位占用变更
// ==========================================
// 规划结果中一个库位的 旧版本号 + 新状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationMutation {
    pub expected_revision: i64, // 提交时校验的乐观锁版本
    pub after: StorageLocation, // 变更后的完整库位状态 (revision 未自增)
}

// ==========================================
// UnitMove - 库存单元位置变更
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitMove {
    pub unit_id: String,
    pub from_location_id: Option<String>,
    pub to_location_id: String,
}

// ==========================================
// PlacementPlan - 批次规划结果
// ==========================================
// 由 PlacementPlanner 基于单一快照推导,PlacementRepository 原子提交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub location_mutations: Vec<LocationMutation>,
    pub unit_moves: Vec<UnitMove>,
}

impl PlacementPlan {
    /// 规划是否为空 (批次里没有任何实际移动)
    pub fn is_empty(&self) -> bool {
        self.unit_moves.is_empty()
    }
}

// ==========================================
// PlacementAck - 上架事务确认
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementAck {
    pub moved_units: usize,
    pub touched_locations: usize,
    pub retries: u32, // 因版本冲突重试的次数
}
