// ==========================================
// 仓储库位分配系统 - 库位领域模型
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 1. 库位模型
// 红线: 一个库位同一时刻只能承载一种物料身份
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// LocationCoord - 库位坐标
// ==========================================
// 四元组 (区/层/排/列) 在仓库内唯一
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationCoord {
    pub zone: String,  // 库区
    pub floor: String, // 楼层
    pub row: String,   // 排
    pub line: String,  // 列
}

impl std::fmt::Display for LocationCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}-{}", self.zone, self.floor, self.row, self.line)
    }
}

// ==========================================
// StorageLocation - 库位
// ==========================================
// 红线: 占用数/承载物料只能通过 PlacementRepository.commit 写入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLocation {
    // ===== 主键 =====
    pub location_id: String,

    // ===== 坐标 =====
    pub coord: LocationCoord,

    // ===== 非存储单元标志 =====
    pub is_road: bool, // 通道
    pub is_door: bool, // 门口

    // ===== 占用状态 =====
    pub assigned_item_id: Option<String>, // 当前承载的物料身份
    pub occupant_count: i64,              // 当前占用单元数
    pub capacity_for_item: i64,           // 针对当前物料的容量上限 (空库位为 0)

    // ===== 并发控制 =====
    pub revision: i64, // 乐观锁版本号
}

impl StorageLocation {
    /// 是否已被占用 (派生字段,不落库)
    pub fn is_used(&self) -> bool {
        self.occupant_count > 0
    }

    /// 是否已满 (派生字段,不落库)
    ///
    /// 不变式: is_full == (occupant_count == capacity_for_item) 且已有承载物料
    pub fn is_full(&self) -> bool {
        self.assigned_item_id.is_some() && self.occupant_count >= self.capacity_for_item
    }

    /// 剩余可放单元数 (空库位返回 0,由调用方按物料默认容量解释)
    pub fn remaining_capacity(&self) -> i64 {
        if self.assigned_item_id.is_none() {
            return 0;
        }
        (self.capacity_for_item - self.occupant_count).max(0)
    }

    /// 是否为不可存储单元 (通道/门口)
    pub fn is_non_storage(&self) -> bool {
        self.is_road || self.is_door
    }

    /// 校验占用不变式: occupant_count <= capacity_for_item,
    /// 且通道/门口不得承载物料
    pub fn occupancy_invariant_holds(&self) -> bool {
        if self.is_non_storage() && self.assigned_item_id.is_some() {
            return false;
        }
        match self.assigned_item_id {
            Some(_) => self.occupant_count >= 0 && self.occupant_count <= self.capacity_for_item,
            None => self.occupant_count == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(assigned: Option<&str>, count: i64, cap: i64) -> StorageLocation {
        StorageLocation {
            location_id: "L1".to_string(),
            coord: LocationCoord {
                zone: "A".to_string(),
                floor: "1".to_string(),
                row: "01".to_string(),
                line: "01".to_string(),
            },
            is_road: false,
            is_door: false,
            assigned_item_id: assigned.map(String::from),
            occupant_count: count,
            capacity_for_item: cap,
            revision: 0,
        }
    }

    #[test]
    fn test_is_full_derivation() {
        assert!(!location(None, 0, 0).is_full());
        assert!(!location(Some("X"), 3, 5).is_full());
        assert!(location(Some("X"), 5, 5).is_full());
    }

    #[test]
    fn test_occupancy_invariant() {
        assert!(location(None, 0, 0).occupancy_invariant_holds());
        assert!(location(Some("X"), 5, 5).occupancy_invariant_holds());
        assert!(!location(Some("X"), 6, 5).occupancy_invariant_holds());
        // 空库位不应有占用
        assert!(!location(None, 1, 0).occupancy_invariant_holds());
    }
}
