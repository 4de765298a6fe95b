//! End-to-end lifecycle of an `ImageView` against a recording loader.
//!
//! Completions are delivered from background threads and applied when the
//! test drains the view's UI queue, the way a host event loop would.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{bitmap, deliver_on_background_thread, RecordingLoader};
use image_view::{
    Dimension, ImageView, LoadingView, ViewConfig, ViewError, Visibility, FALLBACK_SOURCE,
};

#[test]
fn happy_path_single_load() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();

    view.set_image_url(loader.clone(), "http://a");
    view.on_size_changed(100, 80);

    assert_eq!(
        loader.history(),
        vec![("http://a".to_string(), Some(Dimension::new(100, 80)))]
    );

    let bmp_a = bitmap(1);
    deliver_on_background_thread(loader.take("http://a"), bmp_a.clone());
    assert!(view.bitmap().is_none(), "installed before the UI thread ran");

    assert!(view.process_pending());
    assert!(view.bitmap().unwrap().ptr_eq(&bmp_a));
}

#[test]
fn stale_result_is_discarded() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();

    view.set_image_url(loader.clone(), "A");
    view.on_size_changed(50, 50);
    let req_a = loader.take("A");

    view.set_image_url(loader.clone(), "B");
    let req_b = loader.take("B");

    let bmp_a = bitmap(1);
    let bmp_b = bitmap(2);
    deliver_on_background_thread(req_a, bmp_a.clone());
    assert!(!view.process_pending(), "A must never be installed");
    assert!(view.bitmap().is_none());

    deliver_on_background_thread(req_b, bmp_b.clone());
    assert!(view.process_pending());
    assert!(view.bitmap().unwrap().ptr_eq(&bmp_b));
    assert_eq!(view.last_source().as_deref(), Some("B"));
}

#[test]
fn reordered_callbacks_still_show_latest() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();
    view.on_size_changed(10, 10);

    view.set_image_url(loader.clone(), "A");
    view.set_image_url(loader.clone(), "B");
    let req_a = loader.take("A");
    let req_b = loader.take("B");

    let bmp_b = bitmap(2);
    deliver_on_background_thread(req_b, bmp_b.clone());
    deliver_on_background_thread(req_a, bitmap(1));
    view.process_pending();

    assert!(view.bitmap().unwrap().ptr_eq(&bmp_b));
}

#[test]
fn placeholder_cycle() {
    let loader = RecordingLoader::shared();
    let placeholder = LoadingView::new("loading");
    let mut view = ImageView::new();
    view.set_loading_view(Some(placeholder.clone()));
    view.on_size_changed(20, 20);

    view.set_image_url(loader.clone(), "A");
    assert!(placeholder.is_visible());
    assert_eq!(view.visibility(), Visibility::Hidden);

    let bmp_a = bitmap(1);
    deliver_on_background_thread(loader.take("A"), bmp_a.clone());
    // Nothing changes until the UI thread applies the result.
    assert!(placeholder.is_visible());

    view.process_pending();
    assert!(!placeholder.is_visible());
    assert_eq!(view.visibility(), Visibility::Visible);
    assert!(view.bitmap().unwrap().ptr_eq(&bmp_a));
}

#[test]
fn stale_discard_leaves_visibility_alone() {
    let loader = RecordingLoader::shared();
    let placeholder = LoadingView::default();
    let mut view = ImageView::new();
    view.set_loading_view(Some(placeholder.clone()));
    view.on_size_changed(20, 20);

    view.set_image_url(loader.clone(), "A");
    view.set_image_url(loader.clone(), "B");
    deliver_on_background_thread(loader.take("A"), bitmap(1));
    view.process_pending();

    assert!(placeholder.is_visible());
    assert!(!view.is_visible());

    deliver_on_background_thread(loader.take("B"), bitmap(2));
    view.process_pending();
    assert!(!placeholder.is_visible());
    assert!(view.is_visible());
}

#[test]
fn clearing_placeholder_stops_coordination() {
    let loader = RecordingLoader::shared();
    let placeholder = LoadingView::default();
    let mut view = ImageView::new();
    view.set_loading_view(Some(placeholder.clone()))
        .set_loading_view(None);
    view.on_size_changed(20, 20);

    view.set_image_url(loader.clone(), "A");
    assert!(!placeholder.is_visible());
    assert!(view.is_visible());
}

#[test]
fn empty_source_takes_fallback_path() {
    for blank in ["", "   "] {
        let loader = RecordingLoader::shared();
        let mut view = ImageView::new();

        view.set_image_url(loader.clone(), blank);
        view.on_size_changed(30, 20);

        let history = loader.history();
        assert!(history.iter().all(|(s, _)| s == FALLBACK_SOURCE));
        assert!(history.contains(&(
            FALLBACK_SOURCE.to_string(),
            Some(Dimension::new(30, 20))
        )));

        let fallback = bitmap(9);
        deliver_on_background_thread(loader.take_last(), fallback.clone());
        view.process_pending();
        assert!(view.bitmap().unwrap().ptr_eq(&fallback));
    }
}

#[test]
fn fallback_skips_placeholder() {
    let loader = RecordingLoader::shared();
    let placeholder = LoadingView::default();
    let mut view = ImageView::new();
    view.set_loading_view(Some(placeholder.clone()));
    view.on_size_changed(8, 8);

    view.set_image_url(loader.clone(), "");
    assert!(!placeholder.is_visible());
    assert!(view.is_visible());
}

#[test]
fn fallback_supersedes_in_flight_load() {
    let loader = RecordingLoader::shared();
    let placeholder = LoadingView::default();
    let mut view = ImageView::new();
    view.set_loading_view(Some(placeholder.clone()));
    view.on_size_changed(8, 8);

    view.set_image_url(loader.clone(), "A");
    let req_a = loader.take("A");
    view.set_image_url(loader.clone(), " ");
    assert_eq!(view.last_source().as_deref(), Some(FALLBACK_SOURCE));

    deliver_on_background_thread(req_a, bitmap(1));
    assert!(!view.process_pending());

    let fallback = bitmap(9);
    deliver_on_background_thread(loader.take(FALLBACK_SOURCE), fallback.clone());
    view.process_pending();
    assert!(view.bitmap().unwrap().ptr_eq(&fallback));
    // The abandoned load had hidden the view; the fallback brings it back.
    assert!(view.is_visible());
    assert!(!placeholder.is_visible());
}

#[test]
fn load_waits_for_measurement() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();

    view.set_image_url(loader.clone(), "A");
    assert_eq!(loader.call_count(), 0);

    view.on_size_changed(10, 10);
    assert_eq!(
        loader.history(),
        vec![("A".to_string(), Some(Dimension::new(10, 10)))]
    );
}

#[test]
fn zero_size_never_loads() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();
    view.set_image_url(loader.clone(), "A");
    view.on_size_changed(0, 0);
    assert_eq!(loader.call_count(), 0);
    view.on_size_changed(0, 7);
    assert_eq!(loader.call_count(), 1);
}

#[test]
fn configuration_missing_fails_fast() {
    let mut view = ImageView::new();
    let err = view.show_fallback().unwrap_err();
    assert!(matches!(err, ViewError::LoaderMissing));
    assert!(err.to_string().contains("set_image_url"));
}

#[test]
fn explicit_show_fallback_uses_current_size() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();
    view.set_image_url(loader.clone(), "A");
    view.on_size_changed(6, 4);
    view.show_fallback().unwrap();

    let (source, dims) = loader.history().pop().unwrap();
    assert_eq!(source, FALLBACK_SOURCE);
    assert_eq!(dims, Some(Dimension::new(6, 4)));
}

#[test]
fn fit_view_requests_carry_measured_size() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();
    view.set_image_url(loader.clone(), "A");
    view.on_size_changed(10, 10);
    view.on_size_changed(30, 12);
    view.set_image_url(loader.clone(), "B");

    let history = loader.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].1, Some(Dimension::new(30, 12)));
    assert_eq!(history[2], ("B".to_string(), Some(Dimension::new(30, 12))));
}

#[test]
fn repeated_set_image_url_is_idempotent() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();
    view.on_size_changed(10, 10);

    view.set_image_url(loader.clone(), "A");
    view.set_image_url(loader.clone(), "A");
    assert_eq!(loader.call_count(), 2);

    let first = loader.take("A");
    let second = loader.take("A");
    let bmp = bitmap(3);
    deliver_on_background_thread(first, bitmap(3));
    deliver_on_background_thread(second, bmp.clone());
    view.process_pending();
    assert_eq!(view.bitmap(), Some(&bmp));
}

#[test]
fn new_source_keeps_old_bitmap_until_loaded() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();
    view.on_size_changed(10, 10);

    view.set_image_url(loader.clone(), "A");
    let bmp_a = bitmap(1);
    deliver_on_background_thread(loader.take("A"), bmp_a.clone());
    view.process_pending();

    view.set_image_url(loader.clone(), "B");
    assert!(view.bitmap().unwrap().ptr_eq(&bmp_a));
}

#[test]
fn config_flags_apply_to_new_view() {
    let config = ViewConfig::from_toml_str("fit_view = false\ninvalidate_on_load = true").unwrap();
    let loader = RecordingLoader::shared();
    let mut view = ImageView::from_config(&config, Arc::new(tokio::sync::Notify::new()));
    view.set_image_url(loader.clone(), "A");
    view.on_size_changed(10, 10);
    assert_eq!(loader.history()[0].1, None);
    assert!(view.invalidate_on_load());
}

#[tokio::test]
async fn completion_from_runtime_task_wakes_host() {
    let loader = RecordingLoader::shared();
    let mut view = ImageView::new();
    let waker = view.waker();
    view.set_image_url(loader.clone(), "A");
    view.on_size_changed(10, 10);

    let request = loader.take("A");
    tokio::spawn(async move {
        request.completion.deliver(request.source, bitmap(5));
    });

    tokio::time::timeout(Duration::from_secs(1), waker.notified())
        .await
        .expect("view waker never fired");
    assert!(view.process_pending());
    assert!(view.bitmap().is_some());
}
