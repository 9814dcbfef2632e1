//! Export pipeline tests against local storage and failing backends

use async_trait::async_trait;
use fieldmap_core::{
    thread_safe, AppEvent, EventCategory, EventFilter, ExportError, LatLng, NoticeLevel,
    ShapeKind, ThreadSafe,
};
use fieldmap_designer::{EditorAction, EditorState, MetadataInput, Scene};
use fieldmap_report::{
    ExportOptions, ExportRequest, ExportTarget, JsonlReportTable, LocalReportStorage,
    Rasterizer, ReportExporter, ReportRecord, ReportStorage, ShapeRasterizer,
};
use image::RgbImage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct FailingStorage;

#[async_trait]
impl ReportStorage for FailingStorage {
    async fn store(&self, path: &str, _bytes: &[u8]) -> Result<String, ExportError> {
        Err(ExportError::Upload {
            path: path.to_string(),
            reason: "bucket unavailable".to_string(),
        })
    }
}

/// Records whether the tile layer was attached in each captured scene
struct RecordingRasterizer {
    inner: ShapeRasterizer,
    attached: Mutex<Vec<bool>>,
}

#[async_trait]
impl Rasterizer for RecordingRasterizer {
    async fn rasterize(&self, scene: &Scene) -> Result<RgbImage, ExportError> {
        self.attached.lock().push(scene.basemap.is_attached());
        self.inner.rasterize(scene).await
    }
}

fn editor_with_block() -> ThreadSafe<EditorState> {
    let mut editor = EditorState::new();
    editor
        .dispatch(EditorAction::DrawCompleted {
            kind: ShapeKind::Polygon,
            coords: vec![
                LatLng::new(-21.0, -48.0),
                LatLng::new(-21.0, -47.998),
                LatLng::new(-21.002, -47.998),
                LatLng::new(-21.002, -48.0),
            ],
        })
        .unwrap();
    let id = editor.features().next().unwrap().id();
    editor
        .dispatch(EditorAction::SubmitMetadata {
            id,
            input: MetadataInput::named("Talhão 7"),
        })
        .unwrap();
    thread_safe(editor)
}

fn exporter(editor: &ThreadSafe<EditorState>, settle_ms: u64) -> ReportExporter {
    ReportExporter::new(
        editor.clone(),
        Arc::new(ShapeRasterizer::new(160, 120)),
        ExportOptions {
            settle_delay: Duration::from_millis(settle_ms),
            report_root: "reports".to_string(),
        },
    )
}

#[tokio::test]
async fn test_upload_stores_document_and_record() {
    let dir = tempfile::tempdir().unwrap();
    let editor = editor_with_block();
    let table = Arc::new(JsonlReportTable::new(dir.path().join("relatorios.jsonl")));
    let target = ExportTarget::Upload {
        storage: Arc::new(LocalReportStorage::new(dir.path().join("bucket"))),
        table: table.clone(),
    };

    let outcome = exporter(&editor, 1)
        .export(&ExportRequest::new("farm-9", "Talhão 7"), &target)
        .await
        .unwrap();

    let record = outcome.record.clone().unwrap();
    assert_eq!(record.farm_id, "farm-9");
    assert_eq!(record.block_name, "Talhão 7");
    assert!(record.pdf_url.starts_with("file://"));
    assert!(record.pdf_url.contains("reports/farm-9/Talhão 7_"));

    let stored = std::fs::read_dir(dir.path().join("bucket/reports/farm-9"))
        .unwrap()
        .count();
    assert_eq!(stored, 1);

    let rows = std::fs::read_to_string(table.path()).unwrap();
    let row: ReportRecord = serde_json::from_str(rows.trim()).unwrap();
    assert_eq!(row, record);
    assert!(editor.lock().basemap().is_attached());
}

#[tokio::test]
async fn test_upload_failure_keeps_editor_usable() {
    let dir = tempfile::tempdir().unwrap();
    let editor = editor_with_block();
    let notices = Arc::new(Mutex::new(Vec::new()));
    let sink = notices.clone();
    editor.lock().bus().subscribe(
        EventFilter::Categories(vec![EventCategory::Notice]),
        move |event| {
            if let AppEvent::Notice(notice) = event {
                sink.lock().push(notice);
            }
        },
    );

    let target = ExportTarget::Upload {
        storage: Arc::new(FailingStorage),
        table: Arc::new(JsonlReportTable::new(dir.path().join("rows.jsonl"))),
    };
    let failure = exporter(&editor, 1)
        .export(&ExportRequest::new("farm-9", "Talhão 7"), &target)
        .await
        .unwrap_err();

    assert!(matches!(failure.error, ExportError::Upload { .. }));
    let document = failure.document.unwrap();
    assert!(document.starts_with(b"%PDF"));
    assert!(!dir.path().join("rows.jsonl").exists());

    let notices = notices.lock();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    let mut editor = editor.lock();
    assert!(editor.basemap().is_attached());
    assert!(!editor.is_exporting());
    let ack = editor.handle_host_message(r#"{"type":"toggleBaseMap"}"#);
    assert!(ack.ok);
}

#[tokio::test]
async fn test_second_export_rejected_first_completes() {
    let dir = tempfile::tempdir().unwrap();
    let editor = editor_with_block();
    let first = exporter(&editor, 200);
    let second = exporter(&editor, 1);
    let target = ExportTarget::Download {
        dir: dir.path().to_path_buf(),
    };

    let running = {
        let target = target.clone();
        tokio::spawn(async move {
            first
                .export(&ExportRequest::new("f", "Primeiro"), &target)
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(editor.lock().is_exporting());
    assert!(!editor.lock().basemap().is_attached());

    let rejected = second
        .export(&ExportRequest::new("f", "Segundo"), &target)
        .await
        .unwrap_err();
    assert_eq!(rejected.error, ExportError::AlreadyInProgress);

    let outcome = running.await.unwrap().unwrap();
    assert!(outcome.location.contains("Primeiro_"));
    assert!(editor.lock().basemap().is_attached());
    assert!(!editor.lock().is_exporting());
}

#[tokio::test]
async fn test_toggle_during_export_never_reaches_capture() {
    let dir = tempfile::tempdir().unwrap();
    let editor = editor_with_block();
    let rasterizer = Arc::new(RecordingRasterizer {
        inner: ShapeRasterizer::new(160, 120),
        attached: Mutex::new(Vec::new()),
    });
    let exporter = ReportExporter::new(
        editor.clone(),
        rasterizer.clone(),
        ExportOptions {
            settle_delay: Duration::from_millis(200),
            report_root: "reports".to_string(),
        },
    );
    let target = ExportTarget::Download {
        dir: dir.path().to_path_buf(),
    };

    let running = tokio::spawn(async move {
        exporter
            .export(&ExportRequest::new("f", "Talhão 7"), &target)
            .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let ack = editor
        .lock()
        .handle_host_message(r#"{"type":"toggleBaseMap"}"#);
    assert!(ack.ok);
    assert!(!editor.lock().basemap().is_attached());

    running.await.unwrap().unwrap();
    assert_eq!(*rasterizer.attached.lock(), vec![false]);

    // the toggle applies once the export is over
    let editor = editor.lock();
    assert!(!editor.is_exporting());
    assert!(!editor.basemap().is_attached());
}
