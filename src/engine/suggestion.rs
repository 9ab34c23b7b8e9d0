// ==========================================
// 仓储库位分配系统 - 候选库位建议引擎
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 2. 建议引擎
// 职责: 为待上架/待移库物料筛选并排序候选库位
// 红线: 只读不写; 每次请求基于新快照重算,禁止缓存建议结果
// ==========================================

use crate::domain::location::StorageLocation;
use crate::engine::capacity::CapacityValidator;
use tracing::debug;

// ==========================================
// SuggestionEngine - 建议引擎
// ==========================================
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// 为物料筛选候选库位
    ///
    /// # 规则
    /// 1. 过滤: 仅保留 CapacityValidator 通过的库位
    /// 2. 排除: 移库来源库位不得作为自己的替代 (exclude_location_id)
    /// 3. 排序: 先"已承载同物料且有剩余容量"(聚拢优先于分散),
    ///    再空库位; 同档内按 (区,层,排,列) 升序,保证确定性
    ///
    /// # 参数
    /// - item_id: 物料身份
    /// - required_units: 本次需要放入的单元数 (增量上架为 1,
    ///   移库按差异量由调用方计算)
    /// - exclude_location_id: 移库来源库位
    /// - locations: 库位全量快照
    /// - default_capacity: 该物料的单库位默认容量
    ///
    /// # 返回
    /// 排序后的候选列表; 无可用库位时返回空列表 (正常结果,非错误)
    pub fn suggest(
        item_id: &str,
        required_units: i64,
        exclude_location_id: Option<&str>,
        locations: &[StorageLocation],
        default_capacity: i64,
    ) -> Vec<StorageLocation> {
        let mut candidates: Vec<&StorageLocation> = locations
            .iter()
            .filter(|loc| exclude_location_id != Some(loc.location_id.as_str()))
            .filter(|loc| {
                CapacityValidator::is_placeable(loc, item_id, required_units, default_capacity)
            })
            .collect();

        candidates.sort_by(|a, b| {
            Self::pack_tier(a, item_id)
                .cmp(&Self::pack_tier(b, item_id))
                .then_with(|| a.coord.cmp(&b.coord))
        });

        debug!(
            item_id = %item_id,
            required_units,
            candidate_count = candidates.len(),
            "建议引擎筛选完成"
        );

        candidates.into_iter().cloned().collect()
    }

    /// 聚拢档位: 已承载同物料且有剩余容量 = 0,空库位 = 1
    ///
    /// 能通过容量过滤的库位只有这两类 (其他物料身份的库位已被过滤)
    fn pack_tier(location: &StorageLocation, item_id: &str) -> u8 {
        match &location.assigned_item_id {
            Some(assigned) if assigned == item_id => 0,
            _ => 1,
        }
    }
}
