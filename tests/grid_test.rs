// ==========================================
// 库位网格测试
// ==========================================
// 职责: 验证四级索引的构建、点查询与范围遍历
// ==========================================


#[cfg(test)]
mod grid_test {
    use crate::test_helpers::make_location;
    use wms_slot_core::engine::LocationGrid;

    #[test]
    fn test_point_lookup() {
        let locations = vec![
            make_location("L1", "A", "1", "01", "01"),
            make_location("L2", "A", "1", "01", "02"),
            make_location("L3", "B", "2", "03", "01"),
        ];
        let grid = LocationGrid::build(&locations);

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.get("A", "1", "01", "02").unwrap().location_id, "L2");
        assert_eq!(grid.get("B", "2", "03", "01").unwrap().location_id, "L3");
        assert!(grid.get("A", "1", "99", "01").is_none());
    }

    #[test]
    fn test_sparse_coordinates_tolerated() {
        // 没有库位的 区/层/排 就没有对应子节点,查询返回 None 而不是 panic
        let grid = LocationGrid::build(&[make_location("L1", "A", "1", "01", "01")]);
        assert!(grid.get("Z", "9", "99", "99").is_none());
        assert!(grid.row_codes("Z", "9").is_empty());
        assert!(grid.iter_zone("Z").next().is_none());
    }

    #[test]
    fn test_zone_iteration_order() {
        let locations = vec![
            make_location("L4", "A", "2", "01", "01"),
            make_location("L2", "A", "1", "01", "02"),
            make_location("L1", "A", "1", "01", "01"),
            make_location("L3", "A", "1", "02", "01"),
        ];
        let grid = LocationGrid::build(&locations);

        let ids: Vec<&str> = grid.iter_zone("A").map(|l| l.location_id.as_str()).collect();
        // 层/排/列 字典序
        assert_eq!(ids, vec!["L1", "L2", "L3", "L4"]);
    }

    #[test]
    fn test_iter_floor() {
        let locations = vec![
            make_location("L1", "A", "1", "01", "01"),
            make_location("L2", "A", "2", "01", "01"),
        ];
        let grid = LocationGrid::build(&locations);
        let ids: Vec<&str> = grid
            .iter_floor("A", "2")
            .map(|l| l.location_id.as_str())
            .collect();
        assert_eq!(ids, vec!["L2"]);
    }

    #[test]
    fn test_rebuild_reflects_new_snapshot() {
        // 网格不持有可变状态,反映新数据的唯一方式是重建
        let grid = LocationGrid::build(&[make_location("L1", "A", "1", "01", "01")]);
        assert_eq!(grid.len(), 1);

        let rebuilt = LocationGrid::build(&[
            make_location("L1", "A", "1", "01", "01"),
            make_location("L2", "B", "1", "01", "01"),
        ]);
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.zone_codes(), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_grid() {
        let grid = LocationGrid::build(&[]);
        assert!(grid.is_empty());
        assert!(grid.zone_codes().is_empty());
    }
}
