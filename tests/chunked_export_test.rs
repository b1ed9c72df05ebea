//! Integration tests for chunked per-server export
//!
//! These tests verify that:
//! - A failing unit never stops the units after it
//! - Exit code 0 without a file is a failure
//! - Successful units are merged with a single metadata sheet
//! - Intermediates are removed after a merge and kept when it fails

mod common;

use common::{credential, file_names, host, orchestrator, Script, ScriptedRunner, METADATA_SHEET};
use std::sync::Arc;
use tempfile::TempDir;
use vsweep::core::catalog::UnitCatalog;
use vsweep::core::export::naming;
use vsweep::core::export::ServerStatus;
use vsweep::core::merge::list_sheets;
use vsweep::domain::FailureCategory;

const BASE: &str = "vc01_20250101-120000";

#[tokio::test]
async fn test_full_catalog_all_units_succeed() {
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(ScriptedRunner::new());

    let result = orchestrator(runner.clone())
        .export_server_chunked(&host(), &credential(), &UnitCatalog::full(), temp.path(), BASE)
        .await;

    assert!(result.overall_success);
    assert_eq!(result.status, ServerStatus::Succeeded);
    assert_eq!(result.successful_unit_count, 26);
    assert_eq!(result.failed_unit_count, 0);
    assert_eq!(result.message, "complete: 26/26 units");
    assert_eq!(runner.calls().len(), 26);

    let sheets = list_sheets(result.final_artifact_path.as_ref().unwrap()).unwrap();
    assert_eq!(sheets.len(), 27);
    assert_eq!(sheets.iter().filter(|s| *s == METADATA_SHEET).count(), 1);
    assert_eq!(sheets[0], "vInfo");
    assert_eq!(sheets.last().unwrap(), "vHealth");
}

#[tokio::test]
async fn test_timeout_and_connection_failure_are_isolated() {
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(
        ScriptedRunner::new()
            .with("vCD", Script::Timeout)
            .with("dvSwitch", Script::Exit(-1)),
    );

    let result = orchestrator(runner.clone())
        .export_server_chunked(&host(), &credential(), &UnitCatalog::full(), temp.path(), BASE)
        .await;

    // Units after #7 and #19 were still attempted
    assert_eq!(runner.calls().len(), 26);
    assert!(result.overall_success);
    assert_eq!(result.status, ServerStatus::PartialSucceeded);
    assert_eq!(result.successful_unit_count, 24);
    assert_eq!(result.failed_unit_count, 2);
    assert_eq!(
        result.failed_unit_details,
        vec!["vCD (timeout)", "dvSwitch (connection failed)"]
    );
    assert_eq!(result.message, "partial success (24/26 units)");

    let sheets = list_sheets(result.final_artifact_path.as_ref().unwrap()).unwrap();
    assert_eq!(sheets.len(), 25);
    assert!(!sheets.contains(&"vCD".to_string()));
    assert!(!sheets.contains(&"dvSwitch".to_string()));
}

#[tokio::test]
async fn test_single_failure_anywhere_leaves_the_rest() {
    let catalog = UnitCatalog::full();
    for failing in [0, 12, 25] {
        let temp = TempDir::new().unwrap();
        let name = catalog.units()[failing].logical_name;
        let runner = Arc::new(ScriptedRunner::new().with(name, Script::Exit(-1073741819)));

        let result = orchestrator(runner.clone())
            .export_server_chunked(&host(), &credential(), &catalog, temp.path(), BASE)
            .await;

        assert_eq!(runner.calls().len(), 26, "failing unit {name}");
        assert_eq!(result.successful_unit_count, 25, "failing unit {name}");
        assert_eq!(
            result.failed_unit_details,
            vec![format!("{name} (process crashed)")]
        );
    }
}

#[tokio::test]
async fn test_all_units_fail_no_merge() {
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(ScriptedRunner::new().all(Script::Exit(-1)));

    let result = orchestrator(runner)
        .export_server_chunked(&host(), &credential(), &UnitCatalog::full(), temp.path(), BASE)
        .await;

    assert!(!result.overall_success);
    assert_eq!(result.status, ServerStatus::Failed);
    assert_eq!(result.message, "no files exported");
    assert_eq!(result.failed_unit_count, 26);
    assert!(result.final_artifact_path.is_none());
    assert!(!naming::final_artifact_path(temp.path(), BASE).exists());
}

#[tokio::test]
async fn test_fast_catalog_merged_sheets() {
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(ScriptedRunner::new());

    let result = orchestrator(runner)
        .export_server_chunked(&host(), &credential(), &UnitCatalog::fast(), temp.path(), BASE)
        .await;

    assert_eq!(result.message, "complete: 3/3 units");
    let sheets = list_sheets(result.final_artifact_path.as_ref().unwrap()).unwrap();
    assert_eq!(sheets, vec!["vInfo", METADATA_SHEET, "vHost", "vLicense"]);
}

#[tokio::test]
async fn test_exit_zero_without_file_is_artifact_missing() {
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(ScriptedRunner::new().with("vHost", Script::NoArtifact));

    let result = orchestrator(runner)
        .export_server_chunked(&host(), &credential(), &UnitCatalog::fast(), temp.path(), BASE)
        .await;

    let vhost = result
        .unit_outcomes
        .iter()
        .find(|o| o.unit.logical_name == "vHost")
        .unwrap();
    assert!(!vhost.success);
    assert_eq!(vhost.failure_category, FailureCategory::ArtifactMissing);
    assert_eq!(vhost.exit_code, Some(0));
    assert_eq!(result.failed_unit_details, vec!["vHost (artifact missing)"]);
}

#[tokio::test]
async fn test_successful_merge_leaves_only_final_file() {
    let temp = TempDir::new().unwrap();
    let unrelated = temp.path().join("other_20250101-000000__vInfo.xlsx");
    std::fs::write(&unrelated, b"someone else's").unwrap();
    let runner = Arc::new(ScriptedRunner::new().with("vLicense", Script::Exit(3)));

    let result = orchestrator(runner)
        .export_server_chunked(&host(), &credential(), &UnitCatalog::fast(), temp.path(), BASE)
        .await;

    assert!(result.overall_success);
    assert_eq!(
        file_names(temp.path()),
        vec![
            "other_20250101-000000__vInfo.xlsx".to_string(),
            format!("{BASE}.xlsx"),
        ]
    );
    let pattern = naming::intermediate_pattern(BASE).unwrap();
    assert!(file_names(temp.path()).iter().all(|n| !pattern.is_match(n)));
}

#[tokio::test]
async fn test_failed_merge_keeps_intermediates() {
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(ScriptedRunner::new().with("vHost", Script::Garbage));

    let result = orchestrator(runner)
        .export_server_chunked(&host(), &credential(), &UnitCatalog::fast(), temp.path(), BASE)
        .await;

    assert!(!result.overall_success);
    assert_eq!(result.status, ServerStatus::Failed);
    assert!(result.message.starts_with("merge failed; 3 unit artifacts kept in"));
    assert!(!naming::final_artifact_path(temp.path(), BASE).exists());

    let parts = naming::parts_dir(temp.path(), BASE);
    for unit in UnitCatalog::fast().units() {
        assert!(naming::unit_artifact_path(&parts, BASE, unit).is_file());
    }
}

#[tokio::test]
async fn test_stale_artifact_is_not_a_success() {
    let temp = TempDir::new().unwrap();
    let parts = naming::parts_dir(temp.path(), BASE);
    std::fs::create_dir_all(&parts).unwrap();
    let unit = *UnitCatalog::full().find_unit("vHost").unwrap();
    common::write_unit_workbook(&naming::unit_artifact_path(&parts, BASE, &unit), "vHost");

    let runner = Arc::new(ScriptedRunner::new().with("vHost", Script::NoArtifact));
    let result = orchestrator(runner)
        .export_server_chunked(&host(), &credential(), &UnitCatalog::fast(), temp.path(), BASE)
        .await;

    assert_eq!(result.failed_unit_details, vec!["vHost (artifact missing)"]);
    let sheets = list_sheets(result.final_artifact_path.as_ref().unwrap()).unwrap();
    assert!(!sheets.contains(&"vHost".to_string()));
}

#[test]
fn test_artifact_paths_are_deterministic() {
    let temp = TempDir::new().unwrap();
    for unit in UnitCatalog::full().units() {
        let first = naming::unit_artifact_path(temp.path(), BASE, unit);
        let second = naming::unit_artifact_path(temp.path(), BASE, unit);
        assert_eq!(first, second);
        assert!(naming::intermediate_pattern(BASE)
            .unwrap()
            .is_match(&first.file_name().unwrap().to_string_lossy()));
    }
}
