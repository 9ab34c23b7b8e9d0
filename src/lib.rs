// ==========================================
// 仓储库位分配系统 - 核心库
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md
// 技术栈: Rust + SQLite
// 系统定位: 仓库管理控制台的库位分配与核对核心
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ComparisonMode, DocumentKind, DocumentStatus, PlacementPhase, ReconcileStatus,
};

// 领域实体
pub use domain::{
    InventoryUnit, ItemMaster, LocationCoord, PlacementAck, PlacementAssignment, PlacementPlan,
    ReconcileDocument, ReconcileInput, ReconcileOutcome, ReconcileSummary, ReconciliationLine,
    StorageLocation,
};

// 引擎
pub use engine::{
    CapacityValidator, LocationGrid, PlacementPlanner, PlacementSession, ReconciliationCalculator,
    SuggestionEngine,
};

// API
pub use api::{ApiError, ApiResult, LocationApi, PlacementApi, ReconcileApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓储库位分配系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
