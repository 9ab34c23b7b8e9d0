// ==========================================
// 仓储库位分配系统 - 容量校验纯函数库
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 1.3 容量校验
// 职责: 判定"某物料能否放入某库位"的纯逻辑
// 红线: 无状态、无副作用、无 I/O; 所有拒绝必须输出 reason
// ==========================================

use crate::domain::location::StorageLocation;
use thiserror::Error;

// ==========================================
// PlacementRejection - 容量校验拒绝原因
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementRejection {
    /// 通道/门口单元,永不可分配
    #[error("通道/门口单元不可存放: location_id={location_id}")]
    RoadOrDoor { location_id: String },

    /// 库位已承载其他物料身份
    #[error("物料身份不符: location_id={location_id}, assigned={assigned_item_id}, requested={requested_item_id}")]
    ItemMismatch {
        location_id: String,
        assigned_item_id: String,
        requested_item_id: String,
    },

    /// 剩余容量不足
    #[error("容量不足: location_id={location_id}, occupant={occupant_count}, capacity={capacity}, required={required_units}")]
    CapacityExceeded {
        location_id: String,
        occupant_count: i64,
        capacity: i64,
        required_units: i64,
    },
}

// ==========================================
// CapacityValidator - 容量校验器
// ==========================================
pub struct CapacityValidator;

impl CapacityValidator {
    /// 判定库位能否为指定物料再容纳 required_units 个单元
    ///
    /// # 规则 (按顺序)
    /// 1. 通道/门口 → 拒绝
    /// 2. 已承载其他物料身份 → 拒绝
    /// 3. 空库位 → 接受首次分配,容量按物料默认容量初始化
    ///    (default_capacity 本身需 >= required_units)
    /// 4. 同物料 → occupant_count + required_units <= capacity_for_item
    ///
    /// # 参数
    /// - location: 候选库位
    /// - item_id: 物料身份
    /// - required_units: 需要放入的单元数
    /// - default_capacity: 该物料的单库位默认容量 (空库位首次分配时生效)
    pub fn check(
        location: &StorageLocation,
        item_id: &str,
        required_units: i64,
        default_capacity: i64,
    ) -> Result<(), PlacementRejection> {
        if location.is_non_storage() {
            return Err(PlacementRejection::RoadOrDoor {
                location_id: location.location_id.clone(),
            });
        }

        match &location.assigned_item_id {
            Some(assigned) if assigned != item_id => Err(PlacementRejection::ItemMismatch {
                location_id: location.location_id.clone(),
                assigned_item_id: assigned.clone(),
                requested_item_id: item_id.to_string(),
            }),
            Some(_) => {
                if location.occupant_count + required_units <= location.capacity_for_item {
                    Ok(())
                } else {
                    Err(PlacementRejection::CapacityExceeded {
                        location_id: location.location_id.clone(),
                        occupant_count: location.occupant_count,
                        capacity: location.capacity_for_item,
                        required_units,
                    })
                }
            }
            None => {
                // 空库位: 首次分配,以物料默认容量为上限
                if required_units <= default_capacity {
                    Ok(())
                } else {
                    Err(PlacementRejection::CapacityExceeded {
                        location_id: location.location_id.clone(),
                        occupant_count: 0,
                        capacity: default_capacity,
                        required_units,
                    })
                }
            }
        }
    }

    /// 布尔便捷入口 (建议引擎过滤用)
    pub fn is_placeable(
        location: &StorageLocation,
        item_id: &str,
        required_units: i64,
        default_capacity: i64,
    ) -> bool {
        Self::check(location, item_id, required_units, default_capacity).is_ok()
    }
}
