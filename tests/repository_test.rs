// ==========================================
// Repository layer integration tests
// ==========================================
// Scope:
// 1. Atomic save of inspection + NCR (commit and rollback)
// 2. Open-record and max-pipe queries
// 3. Open-set uniqueness under racing duplicate stages
// 4. Listing order and caps
// 5. NCR sync-state updates
// ==========================================


use chrono::{Duration, TimeZone, Utc};
use pipe_inspection_qms::domain::{InspectionStatus, NcrStatus, NcrSyncStatus};
use pipe_inspection_qms::logging;
use pipe_inspection_qms::repository::{InspectionRepository, NcrRepository, RepositoryError};
use tempfile::NamedTempFile;
use test_helpers::{create_test_db, inspection_record, ncr_record};

fn setup() -> (NamedTempFile, InspectionRepository, NcrRepository) {
    logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("test db setup failed");
    let inspection_repo =
        InspectionRepository::new(&db_path).expect("inspection repo open failed");
    let ncr_repo = NcrRepository::new(&db_path).expect("ncr repo open failed");
    (temp_file, inspection_repo, ncr_repo)
}

// ==========================================
// Atomic save
// ==========================================

#[test]
fn test_save_with_ncr_commits_both_rows() {
    let (_db, inspections, ncrs) = setup();

    let record = inspection_record("WO1", "CONN-A", 1, 1, InspectionStatus::SecondInspection);
    let ncr = ncr_record(&record.record_id, NcrStatus::Open);

    let saved = inspections
        .save_with_ncr(&record, Some(&ncr))
        .expect("save failed");
    assert_eq!(saved.record_id, record.record_id);
    assert_eq!(saved.status, InspectionStatus::SecondInspection);
    assert_eq!(saved.round, 1);

    let stored_ncr = ncrs
        .find_by_id(&ncr.ncr_id)
        .expect("NCR lookup failed")
        .expect("NCR missing after save");
    assert_eq!(stored_ncr.inspection_id, record.record_id);
    assert_eq!(stored_ncr.status, NcrStatus::Open);
    assert_eq!(stored_ncr.sync_status, NcrSyncStatus::Pending);
}

#[test]
fn test_save_rolls_back_on_orphan_ncr() {
    let (_db, inspections, ncrs) = setup();

    let record = inspection_record("WO1", "CONN-A", 1, 1, InspectionStatus::SecondInspection);
    // Points at a record that does not exist
    let orphan = ncr_record("no-such-inspection", NcrStatus::Open);

    let err = inspections
        .save_with_ncr(&record, Some(&orphan))
        .expect_err("orphan NCR must fail the save");
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));

    // The inspection insert rolled back with it
    assert!(inspections
        .find_by_id(&record.record_id)
        .expect("lookup failed")
        .is_none());
    assert!(ncrs
        .find_by_id(&orphan.ncr_id)
        .expect("lookup failed")
        .is_none());
}

// ==========================================
// Open-record and max-pipe queries
// ==========================================

#[test]
fn test_find_open_record_picks_highest_round() {
    let (_db, inspections, _ncrs) = setup();

    // Escalation history: round 1 and round 2 both still open
    inspections
        .save_with_ncr(
            &inspection_record("WO1", "CONN-A", 1, 1, InspectionStatus::SecondInspection),
            None,
        )
        .expect("round 1 save failed");
    inspections
        .save_with_ncr(
            &inspection_record("WO1", "CONN-A", 1, 2, InspectionStatus::ThirdInspection),
            None,
        )
        .expect("round 2 save failed");

    let open = inspections
        .find_open_record("WO1", "CONN-A", 1)
        .expect("query failed")
        .expect("open record expected");
    assert_eq!(open.round, 2);
    assert_eq!(open.status, InspectionStatus::ThirdInspection);
}

#[test]
fn test_terminal_records_are_not_open() {
    let (_db, inspections, _ncrs) = setup();

    inspections
        .save_with_ncr(
            &inspection_record("WO1", "CONN-A", 5, 1, InspectionStatus::Completed),
            None,
        )
        .expect("save failed");
    inspections
        .save_with_ncr(
            &inspection_record("WO1", "CONN-A", 6, 3, InspectionStatus::Scrapped),
            None,
        )
        .expect("save failed");

    assert!(inspections
        .find_open_record("WO1", "CONN-A", 5)
        .expect("query failed")
        .is_none());
    assert!(inspections
        .find_open_record("WO1", "CONN-A", 6)
        .expect("query failed")
        .is_none());
}

#[test]
fn test_max_pipe_number_tracks_highest_recorded() {
    let (_db, inspections, _ncrs) = setup();

    assert_eq!(
        inspections
            .max_pipe_number("WO1", "CONN-A")
            .expect("query failed"),
        None
    );

    for (pipe, status) in [
        (2, InspectionStatus::Completed),
        (7, InspectionStatus::Scrapped),
        (3, InspectionStatus::SecondInspection),
    ] {
        inspections
            .save_with_ncr(&inspection_record("WO1", "CONN-A", pipe, 1, status), None)
            .expect("save failed");
    }
    // Other work orders do not leak in
    inspections
        .save_with_ncr(
            &inspection_record("WO2", "CONN-A", 50, 1, InspectionStatus::Completed),
            None,
        )
        .expect("save failed");

    assert_eq!(
        inspections
            .max_pipe_number("WO1", "CONN-A")
            .expect("query failed"),
        Some(7)
    );
}

// ==========================================
// Open-set uniqueness
// ==========================================

#[test]
fn test_duplicate_open_stage_is_rejected() {
    let (_db, inspections, _ncrs) = setup();

    inspections
        .save_with_ncr(
            &inspection_record("WO1", "CONN-A", 1, 1, InspectionStatus::SecondInspection),
            None,
        )
        .expect("first save failed");

    // A racing station lost: same pipe, same stage
    let err = inspections
        .save_with_ncr(
            &inspection_record("WO1", "CONN-A", 1, 1, InspectionStatus::SecondInspection),
            None,
        )
        .expect_err("duplicate open stage must be rejected");

    match err {
        RepositoryError::UniqueConstraintViolation(msg) => {
            assert!(msg.contains("inspection_record"), "got: {}", msg);
        }
        other => panic!("expected UniqueConstraintViolation, got {:?}", other),
    }

    // The escalated stage still inserts freely
    inspections
        .save_with_ncr(
            &inspection_record("WO1", "CONN-A", 1, 2, InspectionStatus::ThirdInspection),
            None,
        )
        .expect("escalation save failed");
}

// ==========================================
// Listing
// ==========================================

#[test]
fn test_list_recent_orders_newest_first_and_caps() {
    let (_db, inspections, _ncrs) = setup();

    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    for pipe in 1..=3 {
        let mut record =
            inspection_record("WO1", "CONN-A", pipe, 1, InspectionStatus::Completed);
        record.created_at = base + Duration::seconds(pipe);
        record.updated_at = record.created_at;
        inspections
            .save_with_ncr(&record, None)
            .expect("save failed");
    }

    let all = inspections.list_recent(None).expect("listing failed");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].pipe_number, 3);
    assert_eq!(all[2].pipe_number, 1);

    let capped = inspections.list_recent(Some(2)).expect("listing failed");
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[0].pipe_number, 3);
}

#[test]
fn test_ncr_listing_joins_pipe_identity() {
    let (_db, inspections, ncrs) = setup();

    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    for pipe in 1..=2 {
        let record =
            inspection_record("WO1", "CONN-A", pipe, 1, InspectionStatus::SecondInspection);
        let mut ncr = ncr_record(&record.record_id, NcrStatus::Open);
        ncr.created_at = base + Duration::seconds(pipe);
        ncr.updated_at = ncr.created_at;
        inspections
            .save_with_ncr(&record, Some(&ncr))
            .expect("save failed");
    }

    let listed = ncrs.list_with_inspection().expect("listing failed");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].pipe_number, 2, "newest NCR listed first");
    assert_eq!(listed[1].pipe_number, 1);
    assert!(listed
        .iter()
        .all(|n| n.work_order == "WO1" && n.connection == "CONN-A"));
}

// ==========================================
// NCR sync state
// ==========================================

#[test]
fn test_sync_state_updates_and_clears() {
    let (_db, inspections, ncrs) = setup();

    let record = inspection_record("WO1", "CONN-A", 1, 1, InspectionStatus::SecondInspection);
    let ncr = ncr_record(&record.record_id, NcrStatus::Open);
    inspections
        .save_with_ncr(&record, Some(&ncr))
        .expect("save failed");

    let first_push = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let synced = ncrs
        .mark_synced(&ncr.ncr_id, first_push)
        .expect("mark_synced failed");
    assert_eq!(synced.sync_status, NcrSyncStatus::Synced);
    assert_eq!(synced.synced_at, Some(first_push));

    // Idempotent re-push refreshes the stamp
    let second_push = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let resynced = ncrs
        .mark_synced(&ncr.ncr_id, second_push)
        .expect("mark_synced failed");
    assert_eq!(resynced.synced_at, Some(second_push));

    // Back to PENDING clears the stamp so the push job retries
    let reset = ncrs
        .update_sync_status(&ncr.ncr_id, NcrSyncStatus::Pending, second_push)
        .expect("update failed");
    assert_eq!(reset.sync_status, NcrSyncStatus::Pending);
    assert_eq!(reset.synced_at, None);
}

#[test]
fn test_sync_update_on_unknown_ncr_is_not_found() {
    let (_db, _inspections, ncrs) = setup();

    let err = ncrs
        .mark_synced("no-such-ncr", Utc::now())
        .expect_err("unknown NCR must be NotFound");
    match err {
        RepositoryError::NotFound { entity, id } => {
            assert_eq!(entity, "NcrRecord");
            assert_eq!(id, "no-such-ncr");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}
