// ==========================================
// 仓储库位分配系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换 Repository/Engine 错误为用户友好的错误消息
// 红线: 所有错误信息必须包含显式原因 (可解释性)
// ==========================================

use crate::domain::types::PlacementPhase;
use crate::engine::capacity::PlacementRejection;
use crate::engine::placement::PlacementConflict;
use crate::engine::reconcile::ReconcileInputError;
use crate::engine::session::SessionError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 上架事务错误
    // ==========================================
    /// 容量冲突: 可恢复,调用方应重新获取建议后换库位重试
    #[error("该库位已不可用,请重新选择: {0}")]
    CapacityConflict(String),

    /// 过期的库位标识: 刷新快照后方可重试
    #[error("库位不存在: location_id={location_id}")]
    UnknownLocation { location_id: String },

    /// 过期的单元标识: 刷新快照后方可重试
    #[error("库存单元不存在: unit_id={unit_id}")]
    UnknownUnit { unit_id: String },

    /// 通道/门口单元被作为上架目标: 调用方校验缺陷,记录并整批拒绝
    #[error("通道/门口单元不可作为上架目标: {0}")]
    RoadOrDoorLocation(String),

    // ==========================================
    // 核对错误
    // ==========================================
    #[error("核对输入无效: {0}")]
    InvalidReconciliationInput(String),

    /// 单据存在未确认的差异行,不允许完成
    #[error("单据存在未确认差异: document_id={document_id}, 未确认行 {line_ids:?}")]
    UnacknowledgedDiscrepancy {
        document_id: String,
        line_ids: Vec<String>,
    },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// 上架会话阶段错误
    #[error("上架会话阶段错误: from={from} to={to}")]
    InvalidSessionPhase {
        from: PlacementPhase,
        to: PlacementPhase,
    },

    // ==========================================
    // 并发控制错误
    // ==========================================
    #[error("乐观锁冲突: {0}")]
    OptimisticLockFailure(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// 实现 From<RepositoryError>
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::OptimisticLockFailure { .. }
            | RepositoryError::StaleUnitLocation { .. } => {
                ApiError::OptimisticLockFailure(err.to_string())
            }
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} with id={}", entity, id))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// 实现 From<PlacementConflict>: 批次规划失败 → 用户可操作的错误
impl From<PlacementConflict> for ApiError {
    fn from(err: PlacementConflict) -> Self {
        match err {
            PlacementConflict::UnknownUnit { unit_id, .. } => ApiError::UnknownUnit { unit_id },
            PlacementConflict::UnknownLocation { location_id, .. } => {
                ApiError::UnknownLocation { location_id }
            }
            PlacementConflict::Rejected { ref rejection, .. } => match rejection {
                PlacementRejection::RoadOrDoor { .. } => {
                    ApiError::RoadOrDoorLocation(err.to_string())
                }
                PlacementRejection::ItemMismatch { .. }
                | PlacementRejection::CapacityExceeded { .. } => {
                    ApiError::CapacityConflict(err.to_string())
                }
            },
        }
    }
}

// 实现 From<ReconcileInputError>
impl From<ReconcileInputError> for ApiError {
    fn from(err: ReconcileInputError) -> Self {
        ApiError::InvalidReconciliationInput(err.to_string())
    }
}

// 实现 From<SessionError>
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidTransition { from, to } => {
                ApiError::InvalidSessionPhase { from, to }
            }
            SessionError::ChoiceNotSuggested { location_id } => ApiError::InvalidInput(format!(
                "选定库位不在候选列表内: location_id={}",
                location_id
            )),
        }
    }
}

// 实现 From<Box<dyn std::error::Error>>: ConfigManager 错误
impl From<Box<dyn std::error::Error>> for ApiError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
