// ==========================================
// 仓储库位分配系统 - 上架业务 API
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 5. 操作面
// 职责: 建议查询 + 上架事务提交 (快照 → 规划 → 原子提交 → 冲突重试)
// 红线: 版本冲突时整批基于新快照重试,禁止部分重试;
//       建议结果天然可能过期,提交前必须重新校验
// ==========================================

use crate::config::ConfigManager;
use crate::domain::location::StorageLocation;
use crate::domain::placement::{PlacementAck, PlacementAssignment};
use crate::domain::reconciliation::ReconcileOutcome;
use crate::domain::types::ReconcileStatus;
use crate::domain::unit::InventoryUnit;
use crate::engine::placement::PlacementPlanner;
use crate::engine::suggestion::SuggestionEngine;
use crate::repository::{
    ItemRepository, LocationRepository, PlacementRepository, RepositoryError, UnitRepository,
};

use crate::api::error::{ApiError, ApiResult};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// PlacementApi - 上架业务 API
// ==========================================
pub struct PlacementApi {
    location_repo: Arc<LocationRepository>,
    unit_repo: Arc<UnitRepository>,
    item_repo: Arc<ItemRepository>,
    placement_repo: Arc<PlacementRepository>,
    config_manager: Arc<ConfigManager>,
}

impl PlacementApi {
    /// 创建上架业务 API 实例
    pub fn new(
        location_repo: Arc<LocationRepository>,
        unit_repo: Arc<UnitRepository>,
        item_repo: Arc<ItemRepository>,
        placement_repo: Arc<PlacementRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            location_repo,
            unit_repo,
            item_repo,
            placement_repo,
            config_manager,
        }
    }

    /// 查询候选库位建议
    ///
    /// # 参数
    /// - item_id: 物料身份
    /// - exclude_location_id: 移库来源库位 (不得作为自己的替代)
    ///
    /// # 返回
    /// 排序后的候选列表; 空列表是正常结果 (需人工介入或调整容量配置)
    #[instrument(skip(self))]
    pub fn get_suggestions(
        &self,
        item_id: &str,
        exclude_location_id: Option<&str>,
    ) -> ApiResult<Vec<StorageLocation>> {
        self.suggest_internal(item_id, 1, exclude_location_id)
    }

    /// 查询移库候选库位建议
    ///
    /// LACK/EXCESS 物料可能需要不同的容量足迹: EXCESS 行的多余单元数
    /// 决定目标库位需要的剩余容量
    #[instrument(skip(self, outcome))]
    pub fn get_relocation_suggestions(
        &self,
        item_id: &str,
        current_location_id: &str,
        outcome: &ReconcileOutcome,
    ) -> ApiResult<Vec<StorageLocation>> {
        let required_units = match outcome.status {
            ReconcileStatus::Excess => outcome.quantity_delta.max(1),
            _ => 1,
        };
        self.suggest_internal(item_id, required_units, Some(current_location_id))
    }

    fn suggest_internal(
        &self,
        item_id: &str,
        required_units: i64,
        exclude_location_id: Option<&str>,
    ) -> ApiResult<Vec<StorageLocation>> {
        let locations = self.location_repo.find_all()?;
        let default_capacity = self.item_default_capacity(item_id)?;

        let mut suggestions = SuggestionEngine::suggest(
            item_id,
            required_units,
            exclude_location_id,
            &locations,
            default_capacity,
        );

        let limit = self.config_manager.suggestion_limit()?;
        if limit > 0 && suggestions.len() > limit {
            suggestions.truncate(limit);
        }
        Ok(suggestions)
    }

    /// 提交上架批次 (全有或全无)
    ///
    /// # 并发控制
    /// 校验与提交之间若有并发提交改动了任一受影响库位,则提交遇到乐观锁
    /// 冲突,整批基于新快照重试; 超过重试上限后以容量冲突的口径返回,
    /// 调用方应重新获取建议。
    #[instrument(skip(self, assignments), fields(batch_size = assignments.len()))]
    pub fn apply_placement(
        &self,
        assignments: &[PlacementAssignment],
    ) -> ApiResult<PlacementAck> {
        if assignments.is_empty() {
            return Err(ApiError::InvalidInput("上架批次不能为空".to_string()));
        }

        let max_retries = self.config_manager.placement_max_retries()?;
        let fallback_capacity = self.config_manager.default_slot_capacity()?;
        let mut retries: u32 = 0;

        loop {
            // 1. 单一快照
            let locations: HashMap<String, StorageLocation> = self
                .location_repo
                .find_all()?
                .into_iter()
                .map(|loc| (loc.location_id.clone(), loc))
                .collect();
            let units = self.load_units(assignments)?;
            let item_defaults = self.item_repo.default_capacity_map()?;

            // 2. 整批规划 (纯逻辑,首个失败指令即整批作废)
            let plan = PlacementPlanner::plan(
                assignments,
                &locations,
                &units,
                &item_defaults,
                fallback_capacity,
            )
            .map_err(|conflict| {
                let api_err = ApiError::from(conflict);
                if let ApiError::RoadOrDoorLocation(ref msg) = api_err {
                    // 正确的调用方不会让通道/门口走到事务层
                    error!(reason = %msg, "上架批次指向非存储单元,视为调用方缺陷");
                }
                api_err
            })?;

            // 3. 原子提交,冲突则整批重试
            match self.placement_repo.commit(&plan) {
                Ok(()) => {
                    info!(
                        moved_units = plan.unit_moves.len(),
                        touched_locations = plan.location_mutations.len(),
                        retries,
                        "上架批次提交成功"
                    );
                    return Ok(PlacementAck {
                        moved_units: plan.unit_moves.len(),
                        touched_locations: plan.location_mutations.len(),
                        retries,
                    });
                }
                Err(RepositoryError::OptimisticLockFailure {
                    location_id,
                    expected,
                    actual,
                }) => {
                    retries += 1;
                    if retries > max_retries {
                        warn!(
                            location_id = %location_id,
                            retries,
                            "上架批次重试次数耗尽"
                        );
                        return Err(ApiError::CapacityConflict(format!(
                            "location_id={} 持续被并发修改 (expected_revision={}, actual_revision={})",
                            location_id, expected, actual
                        )));
                    }
                    warn!(location_id = %location_id, retries, "乐观锁冲突,整批重试");
                    continue;
                }
                Err(RepositoryError::StaleUnitLocation { unit_id, .. }) => {
                    retries += 1;
                    if retries > max_retries {
                        warn!(unit_id = %unit_id, retries, "上架批次重试次数耗尽");
                        return Err(ApiError::CapacityConflict(format!(
                            "unit_id={} 持续被并发移动",
                            unit_id
                        )));
                    }
                    warn!(unit_id = %unit_id, retries, "单元位置冲突,整批重试");
                    continue;
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    /// 入库登记: 为物料创建 count 个未上架单元
    ///
    /// 单元 id 采用 UUID v4,与二维码/序列号绑定由上游完成
    #[instrument(skip(self))]
    pub fn intake_units(&self, item_id: &str, count: usize) -> ApiResult<Vec<InventoryUnit>> {
        if count == 0 {
            return Err(ApiError::InvalidInput("入库单元数必须大于 0".to_string()));
        }
        if self.item_repo.find_by_id(item_id)?.is_none() {
            return Err(ApiError::NotFound(format!("ItemMaster with id={}", item_id)));
        }

        let now = Utc::now().naive_utc();
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            let unit = InventoryUnit {
                unit_id: Uuid::new_v4().to_string(),
                item_id: item_id.to_string(),
                location_id: None,
                created_at: now,
            };
            self.unit_repo.insert(&unit)?;
            units.push(unit);
        }
        info!(item_id = %item_id, count, "入库登记完成");
        Ok(units)
    }

    /// 读取物料的单库位默认容量 (主数据缺失时回落到全局配置)
    fn item_default_capacity(&self, item_id: &str) -> ApiResult<i64> {
        if let Some(item) = self.item_repo.find_by_id(item_id)? {
            return Ok(item.default_slot_capacity);
        }
        Ok(self.config_manager.default_slot_capacity()?)
    }

    /// 加载批次涉及的单元快照
    fn load_units(
        &self,
        assignments: &[PlacementAssignment],
    ) -> ApiResult<HashMap<String, InventoryUnit>> {
        let mut units = HashMap::with_capacity(assignments.len());
        for assignment in assignments {
            if units.contains_key(&assignment.unit_id) {
                continue;
            }
            if let Some(unit) = self.unit_repo.find_by_id(&assignment.unit_id)? {
                units.insert(assignment.unit_id.clone(), unit);
            }
            // 不存在的单元留给规划器报 UnknownUnit,保证错误里带指令序号
        }
        Ok(units)
    }
}
