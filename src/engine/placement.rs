// ==========================================
// 仓储库位分配系统 - 上架批次规划引擎
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 3. 上架事务
// 职责: 基于单一快照校验整个批次并推导库位占用变更
// 红线: 纯逻辑,不拼 SQL; 任一指令校验失败则整批作废 (全有或全无)
// ==========================================

use crate::domain::location::StorageLocation;
use crate::domain::placement::{LocationMutation, PlacementAssignment, PlacementPlan, UnitMove};
use crate::domain::unit::InventoryUnit;
use crate::engine::capacity::{CapacityValidator, PlacementRejection};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

// ==========================================
// PlacementConflict - 批次规划失败原因
// ==========================================
// 携带首个失败指令的序号与标识,供调用方给出可操作的反馈
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementConflict {
    #[error("库存单元不存在: unit_id={unit_id} (指令 #{index})")]
    UnknownUnit { index: usize, unit_id: String },

    #[error("库位不存在: location_id={location_id} (指令 #{index})")]
    UnknownLocation { index: usize, location_id: String },

    #[error("指令 #{index} (unit_id={unit_id}) 被拒绝: {rejection}")]
    Rejected {
        index: usize,
        unit_id: String,
        rejection: PlacementRejection,
    },
}

// ==========================================
// PlacementPlanner - 批次规划器
// ==========================================
pub struct PlacementPlanner;

impl PlacementPlanner {
    /// 校验并规划一个上架批次
    ///
    /// # 规则
    /// - 整批基于同一快照校验,逐条累积前序指令的占用效果:
    ///   同一批内两个单元可以合法地共同填满一个库位
    /// - 首个失败指令立即终止规划,整批不产生任何变更
    /// - 单元移出后来源库位占用减一; 减到 0 时清除承载物料并释放容量预留
    /// - 空库位首次承载某物料时,容量按该物料默认容量初始化
    ///
    /// # 参数
    /// - assignments: 上架/移库指令批次 (每条指令移动一个单元)
    /// - locations: 库位快照 (location_id -> StorageLocation)
    /// - units: 涉及单元快照 (unit_id -> InventoryUnit)
    /// - item_defaults: 物料默认容量 (item_id -> 单库位容量)
    /// - fallback_capacity: 物料主数据缺失时的全局默认容量
    pub fn plan(
        assignments: &[PlacementAssignment],
        locations: &HashMap<String, StorageLocation>,
        units: &HashMap<String, InventoryUnit>,
        item_defaults: &HashMap<String, i64>,
        fallback_capacity: i64,
    ) -> Result<PlacementPlan, PlacementConflict> {
        // 工作副本: 批内累积占用效果,失败时整体丢弃
        let mut working: HashMap<String, StorageLocation> = locations.clone();
        // 单元当前位置的工作视图 (同一单元在批内被移动两次时以最新位置为准)
        let mut unit_pos: HashMap<String, Option<String>> = HashMap::new();
        let mut touched: BTreeSet<String> = BTreeSet::new();
        let mut moves: Vec<UnitMove> = Vec::new();

        for (index, assignment) in assignments.iter().enumerate() {
            let unit = units.get(&assignment.unit_id).ok_or_else(|| {
                PlacementConflict::UnknownUnit {
                    index,
                    unit_id: assignment.unit_id.clone(),
                }
            })?;

            if !working.contains_key(&assignment.target_location_id) {
                return Err(PlacementConflict::UnknownLocation {
                    index,
                    location_id: assignment.target_location_id.clone(),
                });
            }

            let source_id = unit_pos
                .get(&assignment.unit_id)
                .cloned()
                .unwrap_or_else(|| unit.location_id.clone());

            // 原地移动没有任何效果,按无操作处理
            if source_id.as_deref() == Some(assignment.target_location_id.as_str()) {
                debug!(unit_id = %assignment.unit_id, "指令目标即当前库位,跳过");
                continue;
            }

            let default_capacity = item_defaults
                .get(&unit.item_id)
                .copied()
                .unwrap_or(fallback_capacity);

            // 校验目标库位 (已累积批内前序效果)
            let target = &working[&assignment.target_location_id];
            CapacityValidator::check(target, &unit.item_id, 1, default_capacity).map_err(
                |rejection| PlacementConflict::Rejected {
                    index,
                    unit_id: assignment.unit_id.clone(),
                    rejection,
                },
            )?;

            // 来源库位占用减一
            if let Some(src_id) = &source_id {
                if let Some(src) = working.get_mut(src_id) {
                    src.occupant_count -= 1;
                    if src.occupant_count <= 0 {
                        // 最后一个单元离开: 清除承载物料,释放容量预留
                        src.occupant_count = 0;
                        src.assigned_item_id = None;
                        src.capacity_for_item = 0;
                    }
                    touched.insert(src_id.clone());
                }
            }

            // 目标库位占用加一
            let target = working
                .get_mut(&assignment.target_location_id)
                .ok_or_else(|| PlacementConflict::UnknownLocation {
                    index,
                    location_id: assignment.target_location_id.clone(),
                })?;
            if target.assigned_item_id.is_none() {
                target.assigned_item_id = Some(unit.item_id.clone());
                target.capacity_for_item = default_capacity;
            }
            target.occupant_count += 1;
            touched.insert(assignment.target_location_id.clone());

            moves.push(UnitMove {
                unit_id: assignment.unit_id.clone(),
                from_location_id: source_id.clone(),
                to_location_id: assignment.target_location_id.clone(),
            });
            unit_pos.insert(
                assignment.unit_id.clone(),
                Some(assignment.target_location_id.clone()),
            );
        }

        let location_mutations = touched
            .into_iter()
            .map(|id| LocationMutation {
                expected_revision: locations[&id].revision,
                after: working[&id].clone(),
            })
            .collect();

        Ok(PlacementPlan {
            location_mutations,
            unit_moves: moves,
        })
    }
}
