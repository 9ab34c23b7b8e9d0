// ==========================================
// 仓储库位分配系统 - 数据仓储层
// ==========================================
// 职责: rusqlite 数据访问
// 红线: Repository 不含业务逻辑; 占用字段只经 PlacementRepository 写入
// ==========================================

pub mod document_repo;
pub mod error;
pub mod item_repo;
pub mod location_repo;
pub mod placement_repo;
pub mod unit_repo;

// 重导出核心类型
pub use document_repo::DocumentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use item_repo::ItemRepository;
pub use location_repo::LocationRepository;
pub use placement_repo::PlacementRepository;
pub use unit_repo::UnitRepository;
