// ==========================================
// 并发控制测试
// ==========================================
// 职责: 验证上架事务的乐观锁与整批重试机制
// ==========================================


#[cfg(test)]
mod concurrent_control_test {
    use crate::test_helpers::{create_test_db, make_location, with_occupancy};
    use chrono::Utc;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use wms_slot_core::api::{ApiError, PlacementApi};
    use wms_slot_core::config::ConfigManager;
    use wms_slot_core::db::open_sqlite_connection;
    use wms_slot_core::domain::{InventoryUnit, ItemMaster, PlacementAssignment};
    use wms_slot_core::engine::PlacementPlanner;
    use wms_slot_core::repository::{
        ItemRepository, LocationRepository, PlacementRepository, RepositoryError, UnitRepository,
    };

    /// 基于独立连接构建一套完整的上架 API (模拟独立调用方)
    fn build_api(db_path: &str) -> PlacementApi {
        let conn = Arc::new(Mutex::new(open_sqlite_connection(db_path).unwrap()));
        PlacementApi::new(
            Arc::new(LocationRepository::new(conn.clone())),
            Arc::new(UnitRepository::new(conn.clone())),
            Arc::new(ItemRepository::new(conn.clone())),
            Arc::new(PlacementRepository::new(conn.clone())),
            Arc::new(ConfigManager::from_connection(conn.clone()).unwrap()),
        )
    }

    fn seed(db_path: &str) {
        let conn = Arc::new(Mutex::new(open_sqlite_connection(db_path).unwrap()));
        let location_repo = LocationRepository::new(conn.clone());
        let unit_repo = UnitRepository::new(conn.clone());
        let item_repo = ItemRepository::new(conn.clone());

        item_repo
            .insert(&ItemMaster {
                item_id: "ITEM-X".to_string(),
                item_name: "物料 X".to_string(),
                default_slot_capacity: 5,
            })
            .unwrap();
        // 只剩最后一个空位的库位
        location_repo
            .insert(&with_occupancy(
                make_location("L-LAST", "A", "1", "01", "01"),
                "ITEM-X",
                4,
                5,
            ))
            .unwrap();
        for unit_id in ["U1", "U2"] {
            unit_repo
                .insert(&InventoryUnit {
                    unit_id: unit_id.to_string(),
                    item_id: "ITEM-X".to_string(),
                    location_id: None,
                    created_at: Utc::now().naive_utc(),
                })
                .unwrap();
        }
    }

    // ==========================================
    // 测试1: 两个并发批次争抢最后一个空位
    // ==========================================
    // 恰好一个成功,另一个收到容量冲突,最终占用等于容量,绝不超限
    #[test]
    fn test_concurrent_race_for_last_slot() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        seed(&db_path);

        let mut handles = Vec::new();
        for unit_id in ["U1", "U2"] {
            let db_path = db_path.clone();
            let unit_id = unit_id.to_string();
            handles.push(thread::spawn(move || {
                let api = build_api(&db_path);
                api.apply_placement(&[PlacementAssignment {
                    unit_id,
                    target_location_id: "L-LAST".to_string(),
                    current_location_id: None,
                }])
            }));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let ok_count = results.iter().filter(|r| r.is_ok()).count();
        let conflict_count = results
            .iter()
            .filter(|r| matches!(r, Err(ApiError::CapacityConflict(_))))
            .count();

        assert_eq!(ok_count, 1, "恰好一个批次成功");
        assert_eq!(conflict_count, 1, "另一个批次收到容量冲突");

        // 最终占用等于容量,绝不超限
        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
        let location_repo = LocationRepository::new(conn);
        let loc = location_repo.find_by_id("L-LAST").unwrap().unwrap();
        assert_eq!(loc.occupant_count, 5);
        assert_eq!(loc.capacity_for_item, 5);
        assert!(loc.is_full());
    }

    // ==========================================
    // 测试2: 仓储层乐观锁 - 过期版本号提交被拒
    // ==========================================
    #[test]
    fn test_stale_revision_rejected_at_repository() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        seed(&db_path);

        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
        let location_repo = LocationRepository::new(conn.clone());
        let placement_repo = PlacementRepository::new(conn.clone());

        let mut loc = location_repo.find_by_id("L-LAST").unwrap().unwrap();
        let stale_revision = loc.revision;
        loc.occupant_count += 1;

        // 第一次按当前版本提交成功
        let plan = wms_slot_core::domain::PlacementPlan {
            location_mutations: vec![wms_slot_core::domain::LocationMutation {
                expected_revision: stale_revision,
                after: loc.clone(),
            }],
            unit_moves: vec![],
        };
        placement_repo.commit(&plan).unwrap();

        // 用同一个过期版本再提交必须失败
        let err = placement_repo.commit(&plan).unwrap_err();
        assert!(matches!(err, RepositoryError::OptimisticLockFailure { .. }));

        // 占用只被第一次提交推进了一次
        let after = location_repo.find_by_id("L-LAST").unwrap().unwrap();
        assert_eq!(after.occupant_count, 5);
        assert_eq!(after.revision, stale_revision + 1);
    }

    // ==========================================
    // 测试3: 同一单元被并发放入两个不同库位 - 后到者整批回滚
    // ==========================================
    // 两个批次触碰的是不相交的库位版本号,库位乐观锁拦不住;
    // 必须由单元行的条件更新拦下,否则两个库位都记占用而单元只在一处
    #[test]
    fn test_same_unit_two_targets_rejected() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        seed(&db_path);

        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
        let location_repo = LocationRepository::new(conn.clone());
        let unit_repo = UnitRepository::new(conn.clone());
        let item_repo = ItemRepository::new(conn.clone());
        let placement_repo = PlacementRepository::new(conn.clone());
        location_repo
            .insert(&make_location("L-ALT-1", "B", "1", "01", "01"))
            .unwrap();
        location_repo
            .insert(&make_location("L-ALT-2", "B", "1", "01", "02"))
            .unwrap();

        // 两个规划基于同一快照,U1 分别被放入两个不同库位
        let snapshot: std::collections::HashMap<_, _> = location_repo
            .find_all()
            .unwrap()
            .into_iter()
            .map(|loc| (loc.location_id.clone(), loc))
            .collect();
        let units: std::collections::HashMap<_, _> = unit_repo
            .find_by_item("ITEM-X")
            .unwrap()
            .into_iter()
            .map(|u| (u.unit_id.clone(), u))
            .collect();
        let defaults = item_repo.default_capacity_map().unwrap();

        let plan_a = PlacementPlanner::plan(
            &[PlacementAssignment {
                unit_id: "U1".to_string(),
                target_location_id: "L-ALT-1".to_string(),
                current_location_id: None,
            }],
            &snapshot,
            &units,
            &defaults,
            1,
        )
        .unwrap();
        let plan_b = PlacementPlanner::plan(
            &[PlacementAssignment {
                unit_id: "U1".to_string(),
                target_location_id: "L-ALT-2".to_string(),
                current_location_id: None,
            }],
            &snapshot,
            &units,
            &defaults,
            1,
        )
        .unwrap();

        placement_repo.commit(&plan_a).unwrap();
        let err = placement_repo.commit(&plan_b).unwrap_err();
        assert!(matches!(err, RepositoryError::StaleUnitLocation { .. }));

        // 单元只在一处,未被提交的库位没有幽灵占用
        let unit = unit_repo.find_by_id("U1").unwrap().unwrap();
        assert_eq!(unit.location_id.as_deref(), Some("L-ALT-1"));
        let alt_1 = location_repo.find_by_id("L-ALT-1").unwrap().unwrap();
        assert_eq!(alt_1.occupant_count, 1);
        let alt_2 = location_repo.find_by_id("L-ALT-2").unwrap().unwrap();
        assert_eq!(alt_2.occupant_count, 0);
        assert!(alt_2.assigned_item_id.is_none());
    }

    // ==========================================
    // 测试4: 版本冲突后的整批重试最终成功
    // ==========================================
    // 两个批次写不同库位时互不冲突;写同一库位时后到者基于新快照重试成功
    #[test]
    fn test_retry_succeeds_when_capacity_remains() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        seed(&db_path);

        // 追加第二个库位,容量充足
        {
            let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
            let location_repo = LocationRepository::new(conn);
            location_repo
                .insert(&make_location("L-WIDE", "B", "1", "01", "01"))
                .unwrap();
        }

        let mut handles = Vec::new();
        for unit_id in ["U1", "U2"] {
            let db_path = db_path.clone();
            let unit_id = unit_id.to_string();
            handles.push(thread::spawn(move || {
                let api = build_api(&db_path);
                api.apply_placement(&[PlacementAssignment {
                    unit_id,
                    target_location_id: "L-WIDE".to_string(),
                    current_location_id: None,
                }])
            }));
        }

        // 容量足够 (默认 5),两个批次即使冲突重试后也都应成功
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
        let location_repo = LocationRepository::new(conn);
        let loc = location_repo.find_by_id("L-WIDE").unwrap().unwrap();
        assert_eq!(loc.occupant_count, 2);
        assert!(!loc.is_full());
    }
}
