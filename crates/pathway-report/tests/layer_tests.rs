use pathway_report::{ReportConfig, ReportError, ReportLayer};
use pathway_test_utils::{sample_snapshot, DEPTH_JUMP_REPORT, LATER_REPORT, SAMPLE_REPORT};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn load_parses_and_caches_by_content() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.md");
    let copy = dir.path().join("b.md");
    std::fs::write(&first, SAMPLE_REPORT).unwrap();
    std::fs::write(&copy, SAMPLE_REPORT).unwrap();

    let layer = ReportLayer::new();
    let loaded = layer.load(&first).await.unwrap();
    assert!(!loaded.cached);
    assert_eq!(*loaded.snapshot, sample_snapshot());

    // Same text under another name hits the cache
    let again = layer.load(&copy).await.unwrap();
    assert!(again.cached);
    assert_eq!(again.metadata.checksum, loaded.metadata.checksum);
    assert_eq!(again.metadata.path, copy);
}

#[tokio::test]
async fn load_reports_parse_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.md");
    std::fs::write(&path, DEPTH_JUMP_REPORT).unwrap();

    let err = ReportLayer::new().load(&path).await.unwrap_err();
    match err {
        ReportError::Parse { path: p, source } => {
            assert_eq!(p, path);
            assert_eq!(source.line(), 6);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn load_rejects_oversized_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.md");
    std::fs::write(&path, SAMPLE_REPORT).unwrap();

    let layer = ReportLayer::from_config(&ReportConfig::new().with_max_file_size(16));
    assert!(matches!(
        layer.load(&path).await,
        Err(ReportError::FileTooLarge { max: 16, .. })
    ));
}

#[tokio::test]
async fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReportLayer::new().load(dir.path().join("nope.md")).await.unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}

#[tokio::test]
async fn store_writes_canonical_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.md");

    let layer = ReportLayer::new();
    layer.store(&sample_snapshot(), &path).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_REPORT);
}

#[tokio::test]
async fn load_dir_collects_reports_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("2025-01-12.md"), SAMPLE_REPORT).unwrap();
    std::fs::write(dir.path().join("2025-01-13.md"), LATER_REPORT).unwrap();
    std::fs::write(dir.path().join("broken.md"), DEPTH_JUMP_REPORT).unwrap();
    std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

    let load = ReportLayer::new().load_dir(dir.path()).await.unwrap();
    assert_eq!(load.reports.len(), 2);
    assert_eq!(load.failures.len(), 1);
    assert!(load.failures[0].0.ends_with("broken.md"));
    assert!(load.reports[0].metadata.path.ends_with("2025-01-12.md"));
}
