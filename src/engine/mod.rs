// ==========================================
// 仓储库位分配系统 - 引擎层
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 1~4. 模块拆分
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有拒绝必须输出 reason
// ==========================================

pub mod capacity;
pub mod grid;
pub mod placement;
pub mod reconcile;
pub mod session;
pub mod suggestion;

// 重导出核心引擎
pub use capacity::{CapacityValidator, PlacementRejection};
pub use grid::LocationGrid;
pub use placement::{PlacementConflict, PlacementPlanner};
pub use reconcile::{ReconcileInputError, ReconciliationCalculator};
pub use session::{PlacementSession, SessionError};
pub use suggestion::SuggestionEngine;
