// ==========================================
// 仓储库位分配系统 - 领域模型层
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 1~4. 主实体定义
// ==========================================
// 职责: 定义领域实体、类型、派生字段规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod item;
pub mod location;
pub mod placement;
pub mod reconciliation;
pub mod types;
pub mod unit;

// 重导出核心类型
pub use item::ItemMaster;
pub use location::{LocationCoord, StorageLocation};
pub use placement::{
    LocationMutation, PlacementAck, PlacementAssignment, PlacementPlan, UnitMove,
};
pub use reconciliation::{
    ReconcileDocument, ReconcileInput, ReconcileOutcome, ReconcileSummary, ReconciliationLine,
};
pub use types::{
    ComparisonMode, DocumentKind, DocumentStatus, PlacementPhase, ReconcileStatus,
};
pub use unit::InventoryUnit;
