// ==========================================
// 仓储库位分配系统 - 核对业务 API
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 4. 核对引擎 / 5. 操作面
// 职责: 单据/明细维护、清点录入、汇总、完成门禁
// 红线: LACK/EXCESS 是正常结果不是错误;
//       未确认的差异行存在时不得完成单据
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::reconciliation::{
    ReconcileDocument, ReconcileInput, ReconcileOutcome, ReconcileSummary, ReconciliationLine,
};
use crate::domain::types::{ComparisonMode, DocumentKind, DocumentStatus};
use crate::engine::reconcile::ReconciliationCalculator;
use crate::repository::DocumentRepository;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// ReconcileApi - 核对业务 API
// ==========================================
pub struct ReconcileApi {
    document_repo: Arc<DocumentRepository>,
}

impl ReconcileApi {
    /// 创建核对业务 API 实例
    pub fn new(document_repo: Arc<DocumentRepository>) -> Self {
        Self { document_repo }
    }

    /// 创建核对单据 (口径随单据固定)
    #[instrument(skip(self))]
    pub fn create_document(
        &self,
        kind: DocumentKind,
        comparison_mode: ComparisonMode,
    ) -> ApiResult<ReconcileDocument> {
        let document = ReconcileDocument {
            document_id: Uuid::new_v4().to_string(),
            kind,
            comparison_mode,
            status: DocumentStatus::InProgress,
            created_at: Utc::now().naive_utc(),
        };
        self.document_repo.create_document(&document)?;
        info!(document_id = %document.document_id, kind = %kind, "核对单据已创建");
        Ok(document)
    }

    /// 添加明细行 (单据首次填充)
    #[instrument(skip(self))]
    pub fn add_line(
        &self,
        document_id: &str,
        item_id: &str,
        declared_quantity: i64,
        declared_measurement: Option<f64>,
    ) -> ApiResult<ReconciliationLine> {
        if declared_quantity < 0 {
            return Err(ApiError::InvalidReconciliationInput(format!(
                "declared_quantity 不得为负: {}",
                declared_quantity
            )));
        }
        if matches!(declared_measurement, Some(v) if v < 0.0) {
            return Err(ApiError::InvalidReconciliationInput(
                "declared_measurement 不得为负".to_string(),
            ));
        }
        let document = self.require_in_progress(document_id)?;
        // 计量口径单据的行缺了声明计量值,后续清点/汇总/完成全都无法计算,
        // 必须在创建时拦下
        if document.comparison_mode == ComparisonMode::Measurement
            && declared_measurement.is_none()
        {
            return Err(ApiError::InvalidReconciliationInput(
                "计量口径单据的明细行必须提供 declared_measurement".to_string(),
            ));
        }

        let line = ReconciliationLine {
            line_id: Uuid::new_v4().to_string(),
            document_id: document.document_id,
            item_id: item_id.to_string(),
            declared_quantity,
            declared_measurement,
            counted_quantity: None,
            counted_measurement: None,
        };
        self.document_repo.insert_line(&line)?;
        Ok(line)
    }

    /// 录入清点结果并返回该行的核对结果
    ///
    /// 清点流程是实际值的唯一写入口
    #[instrument(skip(self))]
    pub fn record_counted(
        &self,
        line_id: &str,
        counted_quantity: i64,
        counted_measurement: Option<f64>,
    ) -> ApiResult<ReconcileOutcome> {
        let line = self
            .document_repo
            .find_line(line_id)?
            .ok_or_else(|| ApiError::NotFound(format!("ReconciliationLine with id={}", line_id)))?;
        let document = self.require_in_progress(&line.document_id)?;

        // 先算后写: 非法输入不得污染已存数据
        let outcome = ReconciliationCalculator::reconcile(ReconcileInput {
            declared_quantity: line.declared_quantity,
            counted_quantity,
            declared_measurement: line.declared_measurement,
            counted_measurement,
            comparison_mode: document.comparison_mode,
        })?;

        self.document_repo
            .update_counted(line_id, counted_quantity, counted_measurement)?;
        Ok(outcome)
    }

    /// 纯计算入口: 声明/实际 对比
    pub fn reconcile(&self, input: ReconcileInput) -> ApiResult<ReconcileOutcome> {
        Ok(ReconciliationCalculator::reconcile(input)?)
    }

    /// 单据级汇总
    #[instrument(skip(self))]
    pub fn aggregate_document(&self, document_id: &str) -> ApiResult<ReconcileSummary> {
        let document = self.require_document(document_id)?;
        let lines = self.document_repo.find_lines(document_id)?;
        let outcomes = lines
            .iter()
            .map(|line| {
                ReconciliationCalculator::reconcile_line(line, document.comparison_mode)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReconciliationCalculator::aggregate(&outcomes))
    }

    /// 查询单据全部明细行及其核对结果 (展示用)
    pub fn line_outcomes(
        &self,
        document_id: &str,
    ) -> ApiResult<Vec<(ReconciliationLine, ReconcileOutcome)>> {
        let document = self.require_document(document_id)?;
        let lines = self.document_repo.find_lines(document_id)?;
        lines
            .into_iter()
            .map(|line| {
                let outcome =
                    ReconciliationCalculator::reconcile_line(&line, document.comparison_mode)?;
                Ok((line, outcome))
            })
            .collect()
    }

    /// 完成单据
    ///
    /// # 门禁规则
    /// 每一条 LACK/EXCESS 明细行都必须出现在 acknowledged_line_ids 里
    /// (对应确认弹窗逐行勾选),否则拒绝完成并列出未确认行。
    #[instrument(skip(self, acknowledged_line_ids))]
    pub fn complete_document(
        &self,
        document_id: &str,
        acknowledged_line_ids: &HashSet<String>,
    ) -> ApiResult<ReconcileSummary> {
        let document = self.require_in_progress(document_id)?;
        let lines = self.document_repo.find_lines(document_id)?;

        let unresolved =
            ReconciliationCalculator::unresolved_line_ids(&lines, document.comparison_mode)?;
        let unacknowledged: Vec<String> = unresolved
            .into_iter()
            .filter(|line_id| !acknowledged_line_ids.contains(line_id))
            .collect();
        if !unacknowledged.is_empty() {
            return Err(ApiError::UnacknowledgedDiscrepancy {
                document_id: document_id.to_string(),
                line_ids: unacknowledged,
            });
        }

        self.document_repo
            .update_document_status(document_id, DocumentStatus::Completed)?;
        info!(document_id = %document_id, "核对单据已完成");
        self.aggregate_document(document_id)
    }

    fn require_document(&self, document_id: &str) -> ApiResult<ReconcileDocument> {
        self.document_repo
            .find_document(document_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("ReconcileDocument with id={}", document_id))
            })
    }

    fn require_in_progress(&self, document_id: &str) -> ApiResult<ReconcileDocument> {
        let document = self.require_document(document_id)?;
        if document.status != DocumentStatus::InProgress {
            return Err(ApiError::InvalidStateTransition {
                from: document.status.to_string(),
                to: DocumentStatus::InProgress.to_string(),
            });
        }
        Ok(document)
    }
}
