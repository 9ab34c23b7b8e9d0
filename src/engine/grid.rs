// ==========================================
// 仓储库位分配系统 - 库位网格索引
// ==========================================
// 依据: WMS_Core_Specs_v0.2.md - 1.2 网格索引
// 职责: 把扁平库位快照索引为 区 -> 层 -> 排 -> 列 的可导航结构
// 红线: 无状态、无副作用; 反映新数据的唯一方式是重建
// ==========================================

use crate::domain::location::StorageLocation;
use std::collections::BTreeMap;

/// 列 -> 库位
type LineMap = BTreeMap<String, StorageLocation>;
/// 排 -> 列
type RowMap = BTreeMap<String, LineMap>;
/// 层 -> 排
type FloorMap = BTreeMap<String, RowMap>;

// ==========================================
// LocationGrid - 库位网格
// ==========================================
// 纯函数式索引: 从任意快照可重建,容忍稀疏坐标
// (没有库位的 区/层/排 就没有对应子节点)
#[derive(Debug, Clone, Default)]
pub struct LocationGrid {
    zones: BTreeMap<String, FloorMap>,
    total: usize,
}

impl LocationGrid {
    /// 从库位快照构建网格
    ///
    /// # 规则
    /// - 坐标四元组重复时后者覆盖前者 (快照来源保证唯一性,此处只做容忍)
    /// - 通道/门口单元同样入网格,供平面图展示,但由容量校验拒绝分配
    pub fn build(locations: &[StorageLocation]) -> Self {
        let mut zones: BTreeMap<String, FloorMap> = BTreeMap::new();
        for loc in locations {
            zones
                .entry(loc.coord.zone.clone())
                .or_default()
                .entry(loc.coord.floor.clone())
                .or_default()
                .entry(loc.coord.row.clone())
                .or_default()
                .insert(loc.coord.line.clone(), loc.clone());
        }
        let total = zones
            .values()
            .flat_map(|f| f.values())
            .flat_map(|r| r.values())
            .map(|l| l.len())
            .sum();
        Self { zones, total }
    }

    /// 点查询
    pub fn get(&self, zone: &str, floor: &str, row: &str, line: &str) -> Option<&StorageLocation> {
        self.zones.get(zone)?.get(floor)?.get(row)?.get(line)
    }

    /// 区代码列表 (字典序)
    pub fn zone_codes(&self) -> Vec<&str> {
        self.zones.keys().map(String::as_str).collect()
    }

    /// 某区某层的排代码列表
    pub fn row_codes(&self, zone: &str, floor: &str) -> Vec<&str> {
        self.zones
            .get(zone)
            .and_then(|f| f.get(floor))
            .map(|rows| rows.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// 遍历一个区内的全部库位 (按 层/排/列 字典序)
    pub fn iter_zone<'a>(&'a self, zone: &str) -> impl Iterator<Item = &'a StorageLocation> {
        self.zones
            .get(zone)
            .into_iter()
            .flat_map(|floors| floors.values())
            .flat_map(|rows| rows.values())
            .flat_map(|lines| lines.values())
    }

    /// 遍历一个区某层的全部库位 (按 排/列 字典序)
    pub fn iter_floor<'a>(
        &'a self,
        zone: &str,
        floor: &str,
    ) -> impl Iterator<Item = &'a StorageLocation> {
        self.zones
            .get(zone)
            .and_then(|floors| floors.get(floor))
            .into_iter()
            .flat_map(|rows| rows.values())
            .flat_map(|lines| lines.values())
    }

    /// 网格内库位总数
    pub fn len(&self) -> usize {
        self.total
    }

    /// 网格是否为空
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
