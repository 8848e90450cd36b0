// ==========================================
// Inspection submission flow tests
// ==========================================
// Role: end-to-end submission behavior over a real database
// ==========================================


#[cfg(test)]
mod inspection_flow_test {
    use chrono::{TimeZone, Utc};
    use tempfile::NamedTempFile;

    use edms_core::api::ApiError;
    use edms_core::domain::types::DeviceStatus;
    use edms_core::domain::{ActionType, InspectionChecklist};
    use edms_core::engine::ValidationError;

    use crate::test_helpers::{
        base_new_device, base_submission, build_test_env, create_test_db, seed_reference_data,
        stored_status, FixedClock, TestEnv, TestRefs,
    };

    /// Fresh database, seeded references, one registered device, clock
    /// pinned to 2024-12-01 12:00 UTC.
    fn setup() -> (NamedTempFile, TestRefs, TestEnv, i64) {
        let (temp_file, db_path) = create_test_db().unwrap();
        let refs = seed_reference_data(&db_path).unwrap();
        let clock = FixedClock::at_ymd_hms(2024, 12, 1, 12, 0, 0);
        let env = build_test_env(&db_path, clock).unwrap();
        let device_id = env
            .device_api
            .register_device(&base_new_device(&refs), "admin")
            .unwrap();
        (temp_file, refs, env, device_id)
    }

    // ==========================================
    // Acceptance path
    // ==========================================

    #[tokio::test]
    async fn test_accepted_submission_updates_device() {
        let (_tmp, refs, env, device_id) = setup();

        let submission = base_submission(device_id, refs.user_id, "2024-09-01");
        let receipt = env.inspection_api.submit_inspection(&submission).await.unwrap();

        assert!(receipt.accepted);
        assert_eq!(receipt.status, Some(DeviceStatus::Active));
        assert!(receipt.inspection_id > 0);

        // Stored facts follow the receipt
        let device = env.device_repo.find_by_id(device_id).unwrap().unwrap();
        assert_eq!(device.status, Some(DeviceStatus::Active));
        assert_eq!(
            device.last_inspection_at,
            Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap())
        );

        // The log entry carries the inspector and the ingestion time
        let inspections = env.inspection_repo.list_by_device(device_id).unwrap();
        assert_eq!(inspections.len(), 1);
        assert_eq!(inspections[0].inspector_name, "inspector1");
        assert_eq!(
            inspections[0].created_at,
            Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap()
        );

        // Audit trail: registration first, then the applied inspection
        let log = env.device_api.list_action_log(device_id).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action_type, ActionType::InspectionApplied);
        assert_eq!(log[0].from_status, None);
        assert_eq!(log[0].to_status, Some(DeviceStatus::Active));
        assert_eq!(log[0].actor, "inspector1");
        assert_eq!(log[1].action_type, ActionType::DeviceRegistered);
    }

    #[tokio::test]
    async fn test_date_only_submission_maps_to_midnight() {
        let (_tmp, refs, env, device_id) = setup();

        let submission = base_submission(device_id, refs.user_id, "2024-09-01");
        env.inspection_api.submit_inspection(&submission).await.unwrap();

        let inspections = env.inspection_repo.list_by_device(device_id).unwrap();
        assert_eq!(
            inspections[0].inspection_at,
            Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_rfc3339_submission_keeps_time_of_day() {
        let (_tmp, refs, env, device_id) = setup();

        let mut submission = base_submission(device_id, refs.user_id, "2024-09-01T07:30:00Z");
        submission.notes = "gauge read at the morning round".to_string();
        let receipt = env.inspection_api.submit_inspection(&submission).await.unwrap();
        assert!(receipt.accepted);

        let inspections = env.inspection_repo.list_by_device(device_id).unwrap();
        assert_eq!(
            inspections[0].inspection_at,
            Utc.with_ymd_and_hms(2024, 9, 1, 7, 30, 0).unwrap()
        );
        assert_eq!(
            inspections[0].notes.as_deref(),
            Some("gauge read at the morning round")
        );
    }

    #[tokio::test]
    async fn test_checklist_round_trip() {
        let (_tmp, refs, env, device_id) = setup();

        let mut submission = base_submission(device_id, refs.user_id, "2024-09-01");
        submission.checklist = InspectionChecklist {
            is_conspicuous: Some(true),
            is_charge_gauge_normal: Some(false),
            work_order_required: Some(true),
            ..InspectionChecklist::default()
        };
        env.inspection_api.submit_inspection(&submission).await.unwrap();

        let inspections = env.inspection_repo.list_by_device(device_id).unwrap();
        assert_eq!(inspections[0].checklist.is_conspicuous, Some(true));
        assert_eq!(inspections[0].checklist.is_charge_gauge_normal, Some(false));
        assert_eq!(inspections[0].checklist.work_order_required, Some(true));
        // Untouched points stay absent
        assert_eq!(inspections[0].checklist.is_accessible, None);
    }

    #[tokio::test]
    async fn test_get_inspection_by_receipt_id() {
        let (_tmp, refs, env, device_id) = setup();

        let submission = base_submission(device_id, refs.user_id, "2024-09-01");
        let receipt = env.inspection_api.submit_inspection(&submission).await.unwrap();

        let inspection = env.inspection_api.get_inspection(receipt.inspection_id).unwrap();
        assert_eq!(inspection.inspection_id, receipt.inspection_id);
        assert_eq!(inspection.emergency_device_id, device_id);
        assert_eq!(inspection.inspector_name, "inspector1");

        let err = env.inspection_api.get_inspection(9999).unwrap_err();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains("Inspection")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    // ==========================================
    // Reference failures
    // ==========================================

    #[tokio::test]
    async fn test_unknown_device_is_not_found() {
        let (_tmp, refs, env, device_id) = setup();

        let submission = base_submission(9999, refs.user_id, "2024-09-01");
        let err = env.inspection_api.submit_inspection(&submission).await.unwrap_err();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains("EmergencyDevice")),
            other => panic!("expected NotFound, got {:?}", other),
        }

        // Nothing was recorded anywhere
        assert!(env.inspection_repo.list_by_device(device_id).unwrap().is_empty());
        assert!(env.inspection_repo.list_by_device(9999).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (_tmp, _refs, env, device_id) = setup();

        let submission = base_submission(device_id, 9999, "2024-09-01");
        let err = env.inspection_api.submit_inspection(&submission).await.unwrap_err();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains("User")),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(env.inspection_repo.list_by_device(device_id).unwrap().is_empty());
    }

    // ==========================================
    // Validation rejections
    // ==========================================

    #[tokio::test]
    async fn test_rejected_submissions_persist_nothing() {
        let (_tmp, refs, env, device_id) = setup();

        let rejected = [
            "",                      // missing
            "   ",                   // blank
            "September 1st",         // unparseable
            "2024-12-02",            // future (now is 2024-12-01)
            "2023-12-31",            // before manufacture
        ];
        for date in rejected {
            let submission = base_submission(device_id, refs.user_id, date);
            let err = env.inspection_api.submit_inspection(&submission).await.unwrap_err();
            assert!(
                matches!(err, ApiError::Validation(_)),
                "date {:?} should be rejected, got {:?}",
                date,
                err
            );
        }

        // Wrong result token
        let mut submission = base_submission(device_id, refs.user_id, "2024-09-01");
        submission.result = "PASS".to_string();
        let err = env.inspection_api.submit_inspection(&submission).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::InvalidResult(_))
        ));

        // Over-long notes
        let mut submission = base_submission(device_id, refs.user_id, "2024-09-01");
        submission.notes = "x".repeat(256);
        let err = env.inspection_api.submit_inspection(&submission).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::NotesTooLong { .. })
        ));

        // None of the rejects left a trace
        assert!(env.inspection_repo.list_by_device(device_id).unwrap().is_empty());
        assert_eq!(stored_status(&env.device_repo, device_id), None);
        let log = env.device_api.list_action_log(device_id).unwrap();
        assert_eq!(log.len(), 1); // the registration only
    }

    #[tokio::test]
    async fn test_notes_length_boundary() {
        let (_tmp, refs, env, device_id) = setup();

        let mut submission = base_submission(device_id, refs.user_id, "2024-09-01");
        submission.notes = "n".repeat(255);
        let receipt = env.inspection_api.submit_inspection(&submission).await.unwrap();
        assert!(receipt.accepted);

        let inspections = env.inspection_repo.list_by_device(device_id).unwrap();
        assert_eq!(inspections[0].notes.as_deref().map(|n| n.chars().count()), Some(255));
    }

    #[tokio::test]
    async fn test_empty_notes_stored_as_absent() {
        let (_tmp, refs, env, device_id) = setup();

        let submission = base_submission(device_id, refs.user_id, "2024-09-01");
        env.inspection_api.submit_inspection(&submission).await.unwrap();

        let inspections = env.inspection_repo.list_by_device(device_id).unwrap();
        assert_eq!(inspections[0].notes, None);
    }

    // ==========================================
    // History queries
    // ==========================================

    #[tokio::test]
    async fn test_list_inspections_newest_event_first() {
        let (_tmp, refs, env, device_id) = setup();

        for date in ["2024-03-01", "2024-09-01", "2024-06-01"] {
            let submission = base_submission(device_id, refs.user_id, date);
            env.inspection_api.submit_inspection(&submission).await.unwrap();
        }

        let inspections = env.inspection_api.list_inspections(device_id).unwrap();
        let months: Vec<u32> = inspections
            .iter()
            .map(|i| chrono::Datelike::month(&i.inspection_at))
            .collect();
        assert_eq!(months, vec![9, 6, 3]);
    }

    #[tokio::test]
    async fn test_list_inspections_for_unknown_device_is_not_found() {
        let (_tmp, _refs, env, _device_id) = setup();
        let err = env.inspection_api.list_inspections(4242).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
