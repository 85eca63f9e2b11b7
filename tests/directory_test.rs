// ==========================================
// Snapshot directory integration tests
// ==========================================
// Scope:
// 1. Login and directory reads over real snapshot CSV files
// 2. Submissions resolving recipes from the snapshot
// 3. Startup preload counts and missing-file failures
// ==========================================


use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::{tempdir, NamedTempFile, TempDir};

use pipe_inspection_qms::api::{ApiError, InspectionApi, SessionApi};
use pipe_inspection_qms::db::open_sqlite_connection;
use pipe_inspection_qms::directory::{DirectoryError, SnapshotDirectory};
use pipe_inspection_qms::domain::{InspectionStatus, NcrStatus};
use pipe_inspection_qms::engine::{ShiftResolver, StationMap};
use pipe_inspection_qms::logging;
use pipe_inspection_qms::repository::InspectionRepository;
use test_helpers::{create_test_db, submission};

/// Write the three snapshot CSVs the way the sync job drops them.
fn write_snapshot_dir() -> TempDir {
    let dir = tempdir().expect("tempdir failed");

    fs::write(
        dir.path().join("employees.csv"),
        "ADPNumber,Title,Active,Branch,Department\n\
         10021,Jordan Reyes,Yes,Ennis,Quality\n\
         10044,Sam Okafor,true,Ennis,Tubular\n\
         10099,Alex Stone,No,Ennis,Quality\n\
         10112,Riley Marsh,Yes,Houston,Quality\n",
    )
    .expect("employees.csv write failed");

    fs::write(
        dir.path().join("work_orders.csv"),
        "Title,Status\nWO100,Released\nWO200,Hold\n",
    )
    .expect("work_orders.csv write failed");

    fs::write(
        dir.path().join("recipes.csv"),
        r#"Title,limits
VAM TOP 7-5/8,"{""od"": {""min"": 1.0, ""max"": 1.1}, ""ovality"": {""min"": 0.0, ""max"": 0.5}}"
BAD JSON,not json
"#,
    )
    .expect("recipes.csv write failed");

    dir
}

fn snapshot_env(
    snapshot_dir: &Path,
) -> (
    NamedTempFile,
    SessionApi<SnapshotDirectory>,
    InspectionApi<SnapshotDirectory>,
) {
    logging::init_test();

    let (temp_file, db_path) = create_test_db().expect("test db setup failed");
    let conn = Arc::new(Mutex::new(
        open_sqlite_connection(&db_path).expect("db open failed"),
    ));
    let inspection_repo = Arc::new(InspectionRepository::from_connection(conn));

    let directory = Arc::new(SnapshotDirectory::locate(snapshot_dir).expect("locate failed"));
    let resolver = Arc::new(ShiftResolver::new(StationMap::default_ennis()));

    let session_api = SessionApi::new(directory.clone(), resolver.clone());
    let inspection_api = InspectionApi::new(inspection_repo, directory, resolver);
    (temp_file, session_api, inspection_api)
}

// ==========================================
// Login and directory reads
// ==========================================

#[tokio::test]
async fn test_login_over_snapshot_files() {
    let snapshots = write_snapshot_dir();
    let (_db, session_api, _inspection_api) = snapshot_env(snapshots.path());

    let profile = session_api
        .login("10021", "QMS-ENNIS-M2")
        .await
        .expect("login failed");
    assert_eq!(profile.inspector_name, "Jordan Reyes");
    assert_eq!(profile.area, "Area B");
    assert_eq!(profile.machine_number, "M2");

    // Inactive and off-site rows never become logins
    for adp in ["10099", "10112"] {
        let err = session_api
            .login(adp, "QMS-ENNIS-M2")
            .await
            .expect_err("ineligible roster row must be rejected");
        assert!(matches!(err, ApiError::EmployeeNotFound));
    }

    let work_orders = session_api
        .list_work_orders()
        .await
        .expect("work order listing failed");
    assert_eq!(work_orders.len(), 2);
    assert_eq!(work_orders[0].fields["Title"], "WO100");
    assert_eq!(work_orders[1].fields["Status"], "Hold");

    println!("✓ snapshot roster drove login and work order reads");
}

#[tokio::test]
async fn test_malformed_limits_column_reads_as_unchecked() {
    let snapshots = write_snapshot_dir();
    let (_db, session_api, _inspection_api) = snapshot_env(snapshots.path());

    let recipe = session_api
        .get_recipe("BAD JSON")
        .await
        .expect("recipe lookup failed");
    assert!(
        recipe.limits.is_empty(),
        "unparseable limits read as an empty map, never an error"
    );

    let err = session_api
        .get_recipe("NO SUCH CONN")
        .await
        .expect_err("unknown recipe must be rejected");
    assert!(matches!(err, ApiError::RecipeNotFound(_)));

    println!("✓ lenient limits parse and recipe-miss wording verified");
}

// ==========================================
// Submissions over the snapshot
// ==========================================

#[tokio::test]
async fn test_submission_resolves_recipe_from_snapshot() {
    let snapshots = write_snapshot_dir();
    let (_db, _session_api, inspection_api) = snapshot_env(snapshots.path());

    let passed = inspection_api
        .submit_inspection(submission(1, 1.05))
        .await
        .expect("passing submission failed");
    assert_eq!(passed.record.status, InspectionStatus::Completed);
    assert!(passed.ncr.is_none());

    let failed = inspection_api
        .submit_inspection(submission(2, 1.5))
        .await
        .expect("failing submission failed");
    assert_eq!(failed.record.status, InspectionStatus::SecondInspection);
    assert_eq!(failed.ncr.unwrap().status, NcrStatus::Open);

    println!("✓ tolerance limits came off the snapshot CSV end to end");
}

// ==========================================
// Preload and missing files
// ==========================================

#[tokio::test]
async fn test_preload_counts_snapshot_rows() {
    let snapshots = write_snapshot_dir();
    let directory =
        SnapshotDirectory::locate(snapshots.path()).expect("locate failed");

    let summary = directory.preload().await.expect("preload failed");
    assert_eq!(summary.employees, 4);
    assert_eq!(summary.work_orders, 2);
    assert_eq!(summary.recipes, 2);

    println!(
        "✓ preload counted {} employees / {} work orders / {} recipes",
        summary.employees, summary.work_orders, summary.recipes
    );
}

#[test]
fn test_locate_reports_the_missing_file() {
    let dir = tempdir().expect("tempdir failed");
    fs::write(
        dir.path().join("employees.csv"),
        "ADPNumber,Title,Active,Branch,Department\n",
    )
    .expect("employees.csv write failed");

    let err = SnapshotDirectory::locate(dir.path())
        .expect_err("missing work_orders snapshot must fail locate");
    match err {
        DirectoryError::FileNotFound(msg) => {
            assert!(msg.contains("work_orders"), "got: {}", msg);
        }
        other => panic!("expected FileNotFound, got {:?}", other),
    }
}
