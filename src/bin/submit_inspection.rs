// ==========================================
// Pipe Inspection QMS - Submission utility
// ==========================================
// Reads a submission JSON file, runs the full submit pipeline against
// the configured database and prints the decision. Reference caller
// for the library API.
//
// Usage: submit_inspection <submission.json> [db_path]
// ==========================================

use anyhow::{bail, Context};

use pipe_inspection_qms::app::AppState;
use pipe_inspection_qms::config::AppSettings;
use pipe_inspection_qms::domain::InspectionSubmission;
use pipe_inspection_qms::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let Some(submission_path) = std::env::args().nth(1) else {
        bail!("usage: submit_inspection <submission.json> [db_path]");
    };

    let raw = std::fs::read_to_string(&submission_path)
        .with_context(|| format!("failed to read {}", submission_path))?;
    let submission: InspectionSubmission =
        serde_json::from_str(&raw).with_context(|| format!("invalid submission JSON in {}", submission_path))?;

    let mut settings = AppSettings::from_env()?;
    if let Some(db_path) = std::env::args().nth(2) {
        settings.db_path = db_path;
    }

    let state = AppState::new(settings)?;
    let decision = state
        .inspection_api
        .submit_inspection(submission)
        .await
        .context("submission rejected")?;

    println!("record_id: {}", decision.record.record_id);
    println!(
        "work_order={} connection={} pipe_number={}",
        decision.record.work_order, decision.record.connection, decision.record.pipe_number
    );
    println!("round: {}", decision.record.round);
    println!("status: {}", decision.record.status);
    match &decision.ncr {
        Some(ncr) => println!(
            "ncr: {} tier={} status={} sync={}",
            ncr.ncr_id, ncr.tier_code, ncr.status, ncr.sync_status
        ),
        None => println!("ncr: none"),
    }
    println!("reasons:");
    for reason in &decision.reasons {
        println!("  - {}", reason);
    }

    Ok(())
}
