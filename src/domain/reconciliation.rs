// ==========================================
// 仓储库位分配系统 - 核对领域模型
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 4. 核对引擎
// 红线: 状态永远由输入推导 (见 engine/reconcile.rs),不落库
// ==========================================

use crate::domain::types::{ComparisonMode, DocumentKind, DocumentStatus, ReconcileStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ReconcileDocument - 核对单据
// ==========================================
// 入库单/出库单/盘点单的核对视角: 一组明细行 + 固定比对口径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileDocument {
    // ===== 主键 =====
    pub document_id: String,

    // ===== 单据属性 =====
    pub kind: DocumentKind,
    pub comparison_mode: ComparisonMode, // 本单据以哪个口径判定状态
    pub status: DocumentStatus,

    // ===== 审计 =====
    pub created_at: NaiveDateTime,
}

// ==========================================
// ReconciliationLine - 核对明细行
// ==========================================
// 一种物料在一张单据内的 声明值/实际值 对比
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationLine {
    // ===== 主键 =====
    pub line_id: String,
    pub document_id: String,

    // ===== 物料 =====
    pub item_id: String,

    // ===== 声明值 (单据创建时确定) =====
    pub declared_quantity: i64,
    pub declared_measurement: Option<f64>, // 计量值可选 (如重量 kg)

    // ===== 实际值 (清点流程写入) =====
    pub counted_quantity: Option<i64>, // None = 尚未清点
    pub counted_measurement: Option<f64>,
}

impl ReconciliationLine {
    /// 是否已记录实际值
    pub fn is_counted(&self) -> bool {
        self.counted_quantity.is_some()
    }
}

// ==========================================
// ReconcileInput - 核对计算输入
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReconcileInput {
    pub declared_quantity: i64,
    pub counted_quantity: i64,
    pub declared_measurement: Option<f64>,
    pub counted_measurement: Option<f64>,
    pub comparison_mode: ComparisonMode,
}

// ==========================================
// ReconcileOutcome - 核对计算结果
// ==========================================
// quantity_delta = counted - declared (带符号); measurement_delta 同理
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub status: ReconcileStatus,
    pub quantity_delta: i64,
    pub measurement_delta: Option<f64>,
}

// ==========================================
// ReconcileSummary - 单据级汇总
// ==========================================
// 不变式: match_count + lack_count + excess_count == total_lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub match_count: usize,
    pub lack_count: usize,
    pub excess_count: usize,
    pub total_lines: usize,
}

impl ReconcileSummary {
    /// 是否存在未相符的明细行
    pub fn has_discrepancy(&self) -> bool {
        self.lack_count > 0 || self.excess_count > 0
    }
}
