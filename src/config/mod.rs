// ==========================================
// 仓储库位分配系统 - 配置层
// ==========================================
// 职责: 系统配置的加载与查询
// ==========================================

pub mod config_manager;

pub use config_manager::ConfigManager;
