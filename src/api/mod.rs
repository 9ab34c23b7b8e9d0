// ==========================================
// 仓储库位分配系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供任意传输层 (HTTP/桌面命令) 调用
// ==========================================

pub mod error;
pub mod location_api;
pub mod placement_api;
pub mod reconcile_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use location_api::LocationApi;
pub use placement_api::PlacementApi;
pub use reconcile_api::ReconcileApi;
