// ==========================================
// 仓储库位分配系统 - 核对计算纯函数库
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 4. 核对引擎
// 职责: 声明值/实际值 对比 → LACK/EXCESS/MATCH 与差异量
// 红线: 无状态、无副作用; LACK/EXCESS 是正常结果而非错误,
//       只有非法输入 (负数) 才报错
// ==========================================

use crate::domain::reconciliation::{
    ReconcileInput, ReconcileOutcome, ReconcileSummary, ReconciliationLine,
};
use crate::domain::types::{ComparisonMode, ReconcileStatus};
use std::cmp::Ordering;
use thiserror::Error;

// ==========================================
// ReconcileInputError - 非法核对输入
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileInputError {
    #[error("数量不得为负: {field}={value}")]
    NegativeQuantity { field: &'static str, value: i64 },

    #[error("计量值不得为负: {field}={value}")]
    NegativeMeasurement { field: &'static str, value: f64 },

    #[error("计量口径单据缺少计量值: {field}")]
    MissingMeasurement { field: &'static str },
}

// ==========================================
// ReconciliationCalculator - 核对计算器
// ==========================================
pub struct ReconciliationCalculator;

impl ReconciliationCalculator {
    /// 计算一条 声明/实际 对比的状态与差异量
    ///
    /// # 规则
    /// - quantity_delta = counted - declared (带符号),计量差异同理
    /// - 状态由单据口径决定的那个轴驱动; 两个差异量始终都返回,供展示
    /// - 幂等: 相同输入恒得相同输出
    ///
    /// # 示例
    /// ```
    /// use wms_slot_core::domain::{ComparisonMode, ReconcileInput, ReconcileStatus};
    /// use wms_slot_core::engine::ReconciliationCalculator;
    ///
    /// let outcome = ReconciliationCalculator::reconcile(ReconcileInput {
    ///     declared_quantity: 10,
    ///     counted_quantity: 7,
    ///     declared_measurement: None,
    ///     counted_measurement: None,
    ///     comparison_mode: ComparisonMode::Quantity,
    /// })
    /// .unwrap();
    /// assert_eq!(outcome.status, ReconcileStatus::Lack);
    /// assert_eq!(outcome.quantity_delta, -3);
    /// ```
    pub fn reconcile(input: ReconcileInput) -> Result<ReconcileOutcome, ReconcileInputError> {
        Self::validate(&input)?;

        let quantity_delta = input.counted_quantity - input.declared_quantity;
        let measurement_delta = match (input.declared_measurement, input.counted_measurement) {
            (Some(declared), Some(counted)) => Some(counted - declared),
            _ => None,
        };

        let status = match input.comparison_mode {
            ComparisonMode::Quantity => Self::status_of_ordering(quantity_delta.cmp(&0)),
            ComparisonMode::Measurement => {
                // validate 已保证计量口径下两个计量值都存在
                let delta = measurement_delta.unwrap_or(0.0);
                Self::status_of_ordering(
                    delta.partial_cmp(&0.0).unwrap_or(Ordering::Equal),
                )
            }
        };

        Ok(ReconcileOutcome {
            status,
            quantity_delta,
            measurement_delta,
        })
    }

    /// 计算一条明细行; 未清点行按 counted = 0 处理 (全缺)
    pub fn reconcile_line(
        line: &ReconciliationLine,
        mode: ComparisonMode,
    ) -> Result<ReconcileOutcome, ReconcileInputError> {
        Self::reconcile(ReconcileInput {
            declared_quantity: line.declared_quantity,
            counted_quantity: line.counted_quantity.unwrap_or(0),
            declared_measurement: line.declared_measurement,
            counted_measurement: match mode {
                // 计量口径下未清点行的实际计量按 0 处理
                ComparisonMode::Measurement => Some(line.counted_measurement.unwrap_or(0.0)),
                ComparisonMode::Quantity => line.counted_measurement,
            },
            comparison_mode: mode,
        })
    }

    /// 单据级汇总: 按状态分拣
    ///
    /// 不变式: match_count + lack_count + excess_count == total_lines
    pub fn aggregate(outcomes: &[ReconcileOutcome]) -> ReconcileSummary {
        let mut summary = ReconcileSummary {
            total_lines: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.status {
                ReconcileStatus::Match => summary.match_count += 1,
                ReconcileStatus::Lack => summary.lack_count += 1,
                ReconcileStatus::Excess => summary.excess_count += 1,
            }
        }
        summary
    }

    /// 找出未相符 (LACK/EXCESS) 的明细行 id
    ///
    /// 单据完成前,这些行必须全部出现在确认集合里
    pub fn unresolved_line_ids(
        lines: &[ReconciliationLine],
        mode: ComparisonMode,
    ) -> Result<Vec<String>, ReconcileInputError> {
        let mut unresolved = Vec::new();
        for line in lines {
            let outcome = Self::reconcile_line(line, mode)?;
            if outcome.status != ReconcileStatus::Match {
                unresolved.push(line.line_id.clone());
            }
        }
        Ok(unresolved)
    }

    fn status_of_ordering(ordering: Ordering) -> ReconcileStatus {
        match ordering {
            Ordering::Less => ReconcileStatus::Lack,
            Ordering::Greater => ReconcileStatus::Excess,
            Ordering::Equal => ReconcileStatus::Match,
        }
    }

    fn validate(input: &ReconcileInput) -> Result<(), ReconcileInputError> {
        if input.declared_quantity < 0 {
            return Err(ReconcileInputError::NegativeQuantity {
                field: "declared_quantity",
                value: input.declared_quantity,
            });
        }
        if input.counted_quantity < 0 {
            return Err(ReconcileInputError::NegativeQuantity {
                field: "counted_quantity",
                value: input.counted_quantity,
            });
        }
        if let Some(v) = input.declared_measurement {
            if v < 0.0 {
                return Err(ReconcileInputError::NegativeMeasurement {
                    field: "declared_measurement",
                    value: v,
                });
            }
        }
        if let Some(v) = input.counted_measurement {
            if v < 0.0 {
                return Err(ReconcileInputError::NegativeMeasurement {
                    field: "counted_measurement",
                    value: v,
                });
            }
        }
        if input.comparison_mode == ComparisonMode::Measurement {
            if input.declared_measurement.is_none() {
                return Err(ReconcileInputError::MissingMeasurement {
                    field: "declared_measurement",
                });
            }
            if input.counted_measurement.is_none() {
                return Err(ReconcileInputError::MissingMeasurement {
                    field: "counted_measurement",
                });
            }
        }
        Ok(())
    }
}
