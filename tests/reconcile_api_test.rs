// ==========================================
// 核对业务 API 测试
// ==========================================
// 职责: 验证单据流转、清点录入、汇总与完成门禁
// ==========================================


#[cfg(test)]
mod reconcile_api_test {
    use crate::test_helpers::create_test_db;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;
    use wms_slot_core::api::{ApiError, ReconcileApi};
    use wms_slot_core::db::open_sqlite_connection;
    use wms_slot_core::domain::{ComparisonMode, DocumentKind, ReconcileStatus};
    use wms_slot_core::repository::DocumentRepository;

    fn setup_env() -> (NamedTempFile, ReconcileApi) {
        let (temp_file, db_path) = create_test_db().unwrap();
        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
        let api = ReconcileApi::new(Arc::new(DocumentRepository::new(conn)));
        (temp_file, api)
    }

    // ==========================================
    // 测试1: 清点录入返回行级核对结果
    // ==========================================
    #[test]
    fn test_record_counted_returns_outcome() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::StockCheck, ComparisonMode::Quantity)
            .unwrap();
        let line = api.add_line(&doc.document_id, "ITEM-X", 10, None).unwrap();

        let outcome = api.record_counted(&line.line_id, 7, None).unwrap();
        assert_eq!(outcome.status, ReconcileStatus::Lack);
        assert_eq!(outcome.quantity_delta, -3);

        // 重复录入同一结果: 幂等
        let again = api.record_counted(&line.line_id, 7, None).unwrap();
        assert_eq!(again, outcome);
    }

    // ==========================================
    // 测试2: 非法输入在写入前被拒绝
    // ==========================================
    #[test]
    fn test_invalid_counted_rejected_before_write() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::Import, ComparisonMode::Quantity)
            .unwrap();
        let line = api.add_line(&doc.document_id, "ITEM-X", 10, None).unwrap();

        let err = api.record_counted(&line.line_id, -1, None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidReconciliationInput(_)));

        // 写入未发生,行仍处于未清点状态
        let outcomes = api.line_outcomes(&doc.document_id).unwrap();
        assert!(outcomes[0].0.counted_quantity.is_none());
    }

    #[test]
    fn test_negative_declared_rejected() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::Import, ComparisonMode::Quantity)
            .unwrap();
        let err = api.add_line(&doc.document_id, "ITEM-X", -2, None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidReconciliationInput(_)));
    }

    // ==========================================
    // 测试3: 单据级汇总
    // ==========================================
    #[test]
    fn test_aggregate_document() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::Export, ComparisonMode::Quantity)
            .unwrap();
        let l1 = api.add_line(&doc.document_id, "ITEM-A", 10, None).unwrap();
        let l2 = api.add_line(&doc.document_id, "ITEM-B", 10, None).unwrap();
        let l3 = api.add_line(&doc.document_id, "ITEM-C", 10, None).unwrap();
        api.record_counted(&l1.line_id, 10, None).unwrap();
        api.record_counted(&l2.line_id, 7, None).unwrap();
        api.record_counted(&l3.line_id, 13, None).unwrap();

        let summary = api.aggregate_document(&doc.document_id).unwrap();
        assert_eq!(summary.total_lines, 3);
        assert_eq!(summary.match_count, 1);
        assert_eq!(summary.lack_count, 1);
        assert_eq!(summary.excess_count, 1);
    }

    // ==========================================
    // 测试4: 完成门禁 - 未确认差异行阻止完成
    // ==========================================
    #[test]
    fn test_complete_requires_acknowledgement() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::StockCheck, ComparisonMode::Quantity)
            .unwrap();
        let ok_line = api.add_line(&doc.document_id, "ITEM-A", 5, None).unwrap();
        let lack_line = api.add_line(&doc.document_id, "ITEM-B", 5, None).unwrap();
        api.record_counted(&ok_line.line_id, 5, None).unwrap();
        api.record_counted(&lack_line.line_id, 3, None).unwrap();

        // 未确认: 拒绝,并列出未确认行
        let err = api
            .complete_document(&doc.document_id, &HashSet::new())
            .unwrap_err();
        match err {
            ApiError::UnacknowledgedDiscrepancy { line_ids, .. } => {
                assert_eq!(line_ids, vec![lack_line.line_id.clone()]);
            }
            other => panic!("预期 UnacknowledgedDiscrepancy,实际 {:?}", other),
        }

        // 确认后完成
        let acknowledged: HashSet<String> = [lack_line.line_id.clone()].into_iter().collect();
        let summary = api
            .complete_document(&doc.document_id, &acknowledged)
            .unwrap();
        assert_eq!(summary.lack_count, 1);

        // 完成后不可再录入清点
        let err = api.record_counted(&ok_line.line_id, 4, None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

        // 也不可重复完成
        let err = api
            .complete_document(&doc.document_id, &acknowledged)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
    }

    // ==========================================
    // 测试5: 全部相符的单据无需确认即可完成
    // ==========================================
    #[test]
    fn test_all_match_completes_without_acknowledgement() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::Import, ComparisonMode::Quantity)
            .unwrap();
        let line = api.add_line(&doc.document_id, "ITEM-A", 5, None).unwrap();
        api.record_counted(&line.line_id, 5, None).unwrap();

        let summary = api
            .complete_document(&doc.document_id, &HashSet::new())
            .unwrap();
        assert_eq!(summary.match_count, 1);
        assert!(!summary.has_discrepancy());
    }

    // ==========================================
    // 测试6: 计量口径单据
    // ==========================================
    #[test]
    fn test_measurement_mode_document() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::StockCheck, ComparisonMode::Measurement)
            .unwrap();
        let line = api
            .add_line(&doc.document_id, "ITEM-A", 10, Some(250.0))
            .unwrap();

        // 数量相符但重量超出: 计量口径判 EXCESS
        let outcome = api.record_counted(&line.line_id, 10, Some(260.0)).unwrap();
        assert_eq!(outcome.status, ReconcileStatus::Excess);
        assert_eq!(outcome.quantity_delta, 0);
        assert!((outcome.measurement_delta.unwrap() - 10.0).abs() < 1e-9);
    }

    // ==========================================
    // 测试7: 计量口径单据拒绝缺少声明计量值的明细行
    // ==========================================
    // 这样的行一旦入库,清点/汇总/完成全都会卡在 MissingMeasurement,
    // 单据再也无法推进
    #[test]
    fn test_measurement_mode_requires_declared_measurement_at_add() {
        let (_temp, api) = setup_env();
        let doc = api
            .create_document(DocumentKind::StockCheck, ComparisonMode::Measurement)
            .unwrap();

        let err = api.add_line(&doc.document_id, "ITEM-A", 10, None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidReconciliationInput(_)));

        // 行未入库,单据仍可正常走完
        let line = api
            .add_line(&doc.document_id, "ITEM-A", 10, Some(250.0))
            .unwrap();
        api.record_counted(&line.line_id, 10, Some(250.0)).unwrap();
        let summary = api
            .complete_document(&doc.document_id, &HashSet::new())
            .unwrap();
        assert_eq!(summary.total_lines, 1);
        assert_eq!(summary.match_count, 1);
    }
}
