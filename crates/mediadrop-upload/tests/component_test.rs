mod helpers;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use helpers::{mount, png, GatedTransport, ScriptedTransport};
use mediadrop_core::{CandidateFile, MediaValue, TransportError, UploadConfig, UploadResult};
use mediadrop_upload::{Callbacks, ImageUpload, InputMode, Notification, OwnerChange, Phase};

#[tokio::test]
async fn test_successful_upload_reaches_success() {
    let transport = Arc::new(ScriptedTransport::succeeding(
        &[50, 100],
        "https://cdn.example.com/a.png",
    ));
    let (upload, sink) = mount(UploadConfig::default(), transport.clone());

    let state = upload.upload(png(1024)).await;

    assert_eq!(state.phase, Phase::Success);
    assert_eq!(state.progress(), 100);
    assert_eq!(state.resolved_url(), "https://cdn.example.com/a.png");
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.endpoints(), vec!["/api/upload"]);

    let result = UploadResult::from_url("https://cdn.example.com/a.png");
    assert_eq!(
        sink.all(),
        vec![
            Notification::UploadStarted {
                file_name: "photo.png".to_string()
            },
            Notification::UploadProgress { progress: 50 },
            Notification::UploadProgress { progress: 100 },
            Notification::UploadSucceeded(result.clone()),
            Notification::Changed(OwnerChange::Uploaded(result)),
        ]
    );
}

#[tokio::test]
async fn test_failed_upload_never_reaches_owner() {
    let transport = Arc::new(ScriptedTransport::failing(
        &[30],
        TransportError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        },
    ));
    let (upload, sink) = mount(UploadConfig::default(), transport.clone());

    let state = upload.upload(png(1024)).await;

    assert!(matches!(state.phase, Phase::Error { .. }));
    assert_eq!(state.error_message(), Some("Upload failed with status 502."));
    assert!(sink.changes().is_empty());
    assert!(sink
        .all()
        .iter()
        .any(|n| matches!(n, Notification::UploadFailed { .. })));
}

#[tokio::test]
async fn test_retry_after_failure_uploads_again() {
    let transport = Arc::new(ScriptedTransport::failing(
        &[],
        TransportError::Network("reset".to_string()),
    ));
    let (upload, _sink) = mount(UploadConfig::default(), transport.clone());
    upload.set_url_input("https://typed");

    upload.upload(png(10)).await;
    upload.retry();
    let state = upload.state();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.url_input, "https://typed");

    upload.upload(png(10)).await;
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_invalid_files_never_reach_transport() {
    let transport = Arc::new(ScriptedTransport::succeeding(&[], "https://unused"));
    let (upload, sink) = mount(UploadConfig::default(), transport.clone());

    let state = upload
        .upload(CandidateFile::new("notes.txt", "text/plain", vec![1u8; 10]))
        .await;
    assert!(state.error_message().unwrap().contains("PNG"));

    upload.retry();
    let state = upload.upload(png(6 * 1024 * 1024)).await;
    assert!(state.error_message().unwrap().contains("5MB"));

    upload.retry();
    assert!(upload
        .drop_file(CandidateFile::new("a.pdf", "application/pdf", vec![1u8]))
        .is_none());
    assert_eq!(upload.state().error_message(), Some("Please drop an image file"));

    assert_eq!(transport.calls(), 0);
    assert!(sink.all().is_empty());
}

#[tokio::test]
async fn test_late_callbacks_after_unmount_are_ignored() {
    let transport = Arc::new(GatedTransport::default());
    let (upload, sink) = mount(UploadConfig::default(), transport.clone());

    let job = upload.select_file(png(10)).expect("upload should start");
    let handle = tokio::spawn(job.run());
    transport.started.notified().await;

    upload.unmount();
    transport.release.notify_one();
    handle.await.unwrap();

    assert_eq!(
        sink.all(),
        vec![Notification::UploadStarted {
            file_name: "photo.png".to_string()
        }]
    );
}

#[tokio::test]
async fn test_clear_during_upload_orphans_result() {
    let transport = Arc::new(GatedTransport::default());
    let (upload, sink) = mount(UploadConfig::default(), transport.clone());

    let handle = upload.spawn_upload(png(10)).expect("upload should start");
    transport.started.notified().await;
    assert!(upload.state().phase.is_uploading());

    upload.clear();
    transport.release.notify_one();
    handle.await.unwrap();

    let state = upload.state();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.value, None);
    assert_eq!(sink.changes(), vec![OwnerChange::Cleared]);
}

#[tokio::test]
async fn test_dropped_job_leaves_field_retryable() {
    let transport = Arc::new(ScriptedTransport::succeeding(
        &[100],
        "https://cdn.example.com/c.png",
    ));
    let (upload, sink) = mount(UploadConfig::default(), transport.clone());

    let job = upload.select_file(png(10)).expect("upload should start");
    drop(job);

    let state = upload.state();
    assert_eq!(
        state.error_message(),
        Some("Upload was interrupted. Please try again.")
    );
    assert!(sink
        .all()
        .iter()
        .any(|n| matches!(n, Notification::UploadFailed { .. })));
    assert!(sink.changes().is_empty());

    upload.retry();
    let state = upload.upload(png(10)).await;
    assert_eq!(state.phase, Phase::Success);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_aborted_upload_leaves_field_retryable() {
    let transport = Arc::new(GatedTransport::default());
    let (upload, _sink) = mount(UploadConfig::default(), transport.clone());

    let handle = upload.spawn_upload(png(10)).expect("upload should start");
    transport.started.notified().await;
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    assert!(matches!(upload.state().phase, Phase::Error { .. }));
    upload.retry();
    assert_eq!(upload.state().phase, Phase::Idle);

    let retried = upload.spawn_upload(png(10)).expect("retry should start");
    transport.started.notified().await;
    transport.release.notify_one();
    retried.await.unwrap();
    assert_eq!(upload.state().phase, Phase::Success);
}

#[tokio::test]
async fn test_only_one_upload_in_flight() {
    let transport = Arc::new(GatedTransport::default());
    let (upload, _sink) = mount(UploadConfig::default(), transport.clone());

    let first = upload.spawn_upload(png(10)).expect("first upload should start");
    transport.started.notified().await;
    assert!(upload.select_file(png(10)).is_none());
    assert!(upload.drop_file(png(10)).is_none());

    transport.release.notify_one();
    first.await.unwrap();
    assert_eq!(upload.state().phase, Phase::Success);
}

#[tokio::test]
async fn test_disabled_field_ignores_everything() {
    let transport = Arc::new(ScriptedTransport::succeeding(&[100], "https://unused"));
    let config = UploadConfig {
        disabled: true,
        ..UploadConfig::default()
    };
    let sink = Arc::new(helpers::RecordingSink::default());
    let upload = ImageUpload::new(
        config,
        Some(MediaValue::Url("https://x/current.png".to_string())),
        transport.clone(),
        sink.clone(),
    );

    assert!(upload.select_file(png(10)).is_none());
    upload.drag_enter();
    upload.set_mode(InputMode::Url);
    upload.set_url_input("https://x/other.png");
    upload.apply_url();
    upload.clear();

    let state = upload.state();
    assert_eq!(state.resolved_url(), "https://x/current.png");
    assert_eq!(state.url_input, "https://x/current.png");
    assert!(!state.is_dragging);
    assert_eq!(state.mode, InputMode::File);
    assert_eq!(transport.calls(), 0);
    assert!(sink.all().is_empty());
}

#[test]
fn test_drag_leave_clears_dragging() {
    let (upload, sink) = mount(
        UploadConfig::default(),
        Arc::new(ScriptedTransport::succeeding(&[], "https://unused")),
    );

    upload.drag_enter();
    assert!(upload.state().is_dragging);
    upload.drag_leave();

    let state = upload.state();
    assert!(!state.is_dragging);
    assert_eq!(state.phase, Phase::Idle);
    assert!(sink.all().is_empty());
}

#[test]
fn test_url_mode_with_callbacks() {
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = changes.clone();
    let last = Arc::new(std::sync::Mutex::new(String::new()));
    let last_url = last.clone();
    let callbacks = Callbacks::new().on_change(move |change| {
        counter.fetch_add(1, Ordering::SeqCst);
        *last_url.lock().unwrap() = change.url().to_string();
    });

    let upload = ImageUpload::new(
        UploadConfig::default(),
        None,
        Arc::new(ScriptedTransport::succeeding(&[], "https://unused")),
        Arc::new(callbacks),
    );

    upload.set_mode(InputMode::Url);
    upload.set_url_input("https://x/");
    upload.set_url_input("https://x/pic.png");
    assert_eq!(changes.load(Ordering::SeqCst), 0);

    upload.apply_url();
    assert_eq!(changes.load(Ordering::SeqCst), 1);
    assert_eq!(*last.lock().unwrap(), "https://x/pic.png");

    upload.image_failed();
    assert!(upload.state().image_load_failed);

    upload.clear();
    assert_eq!(changes.load(Ordering::SeqCst), 2);
    assert_eq!(*last.lock().unwrap(), "");
}

#[test]
fn test_upload_runs_on_blocking_executor() {
    let transport = Arc::new(ScriptedTransport::succeeding(
        &[100],
        "https://cdn.example.com/b.png",
    ));
    let (upload, sink) = mount(UploadConfig::default(), transport);

    let state = tokio_test::block_on(upload.upload(png(64)));

    assert_eq!(state.phase, Phase::Success);
    assert_eq!(
        sink.changes(),
        vec![OwnerChange::Uploaded(UploadResult::from_url(
            "https://cdn.example.com/b.png"
        ))]
    );
}

#[test]
fn test_required_field_tracks_value() {
    let upload = ImageUpload::new(
        UploadConfig {
            required: true,
            ..UploadConfig::default()
        },
        None,
        Arc::new(ScriptedTransport::succeeding(&[], "https://unused")),
        Arc::new(()),
    );
    assert!(upload.missing_required());

    upload.set_value(Some(MediaValue::Url("https://x/a.png".to_string())));
    assert!(!upload.missing_required());
}
