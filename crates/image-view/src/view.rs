//! ImageView — a widget that displays a bitmap resolved asynchronously from
//! a logical source.
//!
//! The view never loads before it has been measured: `set_image_url` is
//! usually called before the first layout pass, so the first real request
//! goes out from `on_size_changed`, at which point the target size is known.
//!
//! All methods must be called on the UI thread. Completions may fire on any
//! thread; their results are queued and applied by `process_pending`.

use std::sync::Arc;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::bitmap::{Bitmap, Dimension};
use crate::config::ViewConfig;
use crate::dispatch::{Delivery, LoadKind, UiDispatcher};
use crate::error::ViewError;
use crate::guard::LoadGuard;
use crate::loader::{Completion, SharedLoader, FALLBACK_SOURCE};
use crate::placeholder::{LoadingView, Visibility};
use crate::render;

pub struct ImageView {
    source: Option<String>,
    loader: Option<SharedLoader>,
    placeholder: Option<LoadingView>,
    fit_view: bool,
    invalidate_on_load: bool,
    measured: Dimension,
    visibility: Visibility,
    bitmap: Option<Bitmap>,
    layout_requested: bool,
    redraw_requested: bool,
    guard: Arc<LoadGuard>,
    dispatcher: UiDispatcher,
}

impl ImageView {
    pub fn new() -> Self {
        Self::with_dispatcher(UiDispatcher::new())
    }

    /// A view whose completions wake `waker`. Share one waker across many
    /// views to drive them from a single host loop.
    pub fn with_waker(waker: Arc<Notify>) -> Self {
        Self::with_dispatcher(UiDispatcher::with_waker(waker))
    }

    pub fn from_config(config: &ViewConfig, waker: Arc<Notify>) -> Self {
        let mut view = Self::with_waker(waker);
        view.set_fit_view(config.fit_view)
            .set_invalidate_on_load(config.invalidate_on_load);
        view
    }

    fn with_dispatcher(dispatcher: UiDispatcher) -> Self {
        Self {
            source: None,
            loader: None,
            placeholder: None,
            fit_view: true,
            invalidate_on_load: false,
            measured: Dimension::ZERO,
            visibility: Visibility::Visible,
            bitmap: None,
            layout_requested: false,
            redraw_requested: false,
            guard: Arc::new(LoadGuard::new()),
            dispatcher,
        }
    }

    // ── Configuration ────────────────────────────────────────────────────────

    /// Bind the view to `source`, resolved through `loader`.
    ///
    /// Every load still in flight is invalidated. The current bitmap stays
    /// until the new one arrives, unless `source` is blank, in which case the
    /// fallback is requested straight away.
    pub fn set_image_url(&mut self, loader: SharedLoader, source: impl Into<String>) {
        self.loader = Some(loader);
        self.source = Some(source.into());
        self.guard.supersede();
        self.load_from_source();
    }

    /// Whether the loader is asked to decode at the view's measured size.
    /// On by default; turning it off lets large images through at full size.
    pub fn set_fit_view(&mut self, fit_view: bool) -> &mut Self {
        self.fit_view = fit_view;
        self
    }

    /// Register the placeholder shown while a load is in flight, or `None`
    /// to stop coordinating one. The view is hidden whenever the placeholder
    /// is shown.
    pub fn set_loading_view(&mut self, view: Option<LoadingView>) -> &mut Self {
        if self.visibility == Visibility::Hidden {
            // Mid-load: the new placeholder (or the view itself) takes over.
            if let Some(old) = &self.placeholder {
                old.set_visibility(Visibility::Hidden);
            }
            match &view {
                Some(new) => new.set_visibility(Visibility::Visible),
                None => self.visibility = Visibility::Visible,
            }
        }
        self.placeholder = view;
        self
    }

    pub fn set_invalidate_on_load(&mut self, invalidate: bool) -> &mut Self {
        self.invalidate_on_load = invalidate;
        self
    }

    /// Load the loader's fallback image into the view.
    pub fn show_fallback(&mut self) -> Result<(), ViewError> {
        let loader = self.loader.clone().ok_or(ViewError::LoaderMissing)?;
        self.load_fallback(&loader);
        Ok(())
    }

    // ── Measurement ──────────────────────────────────────────────────────────

    /// Size-change notification from the host. Loads the current source at
    /// the new size.
    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        let size = Dimension::new(width, height);
        if size == self.measured {
            return;
        }
        self.measured = size;
        self.load_from_source();
    }

    /// Measure against the cell area the view is about to be drawn in.
    pub fn measure_area(&mut self, area: Rect) {
        let size = render::measure(area);
        self.on_size_changed(size.width, size.height);
    }

    // ── Loading ──────────────────────────────────────────────────────────────

    fn debug_enabled(&self) -> bool {
        self.loader.as_ref().is_some_and(|l| l.is_debug_enabled())
    }

    fn load_from_source(&mut self) {
        let Some(loader) = self.loader.clone() else {
            return;
        };
        let Some(source) = self.source.clone().filter(|s| !s.trim().is_empty()) else {
            self.load_fallback(&loader);
            return;
        };
        if self.measured.is_zero() {
            if self.debug_enabled() {
                debug!("view not measured yet, waiting before loading {}", source);
            }
            return;
        }

        let generation = self.guard.begin(&source);
        let dimension = self.fit_view.then_some(self.measured);
        if let Some(placeholder) = &self.placeholder {
            placeholder.set_visibility(Visibility::Visible);
            self.visibility = Visibility::Hidden;
        }
        let completion = self.completion(generation, dimension, LoadKind::Source);
        loader.get(&source, dimension, completion);
    }

    fn load_fallback(&mut self, loader: &SharedLoader) {
        if loader.is_debug_enabled() {
            debug!("loading fallback image for view");
        }
        let generation = self.guard.begin(FALLBACK_SOURCE);
        let dimension = Some(self.measured);
        let completion = self.completion(generation, dimension, LoadKind::Fallback);
        loader.get(FALLBACK_SOURCE, dimension, completion);
    }

    fn completion(
        &self,
        generation: u64,
        dimension: Option<Dimension>,
        kind: LoadKind,
    ) -> Completion {
        Completion::new(
            generation,
            dimension,
            kind,
            self.debug_enabled(),
            Arc::clone(&self.guard),
            self.dispatcher.poster(),
        )
    }

    // ── UI-thread delivery ───────────────────────────────────────────────────

    /// Apply every completed load queued for this view. Call from the UI
    /// thread, typically when the view's waker fires. Returns true if a
    /// bitmap was installed.
    pub fn process_pending(&mut self) -> bool {
        let mut installed = false;
        while let Some(delivery) = self.dispatcher.try_next() {
            if !self.guard.is_current(delivery.generation) {
                if self.debug_enabled() {
                    debug!("dropping {} queued behind a newer load", delivery.source);
                }
                continue;
            }
            self.apply(delivery);
            installed = true;
        }
        installed
    }

    fn apply(&mut self, delivery: Delivery) {
        let Delivery {
            source,
            dimension,
            kind,
            bitmap,
            ..
        } = delivery;

        self.bitmap = Some(bitmap);
        if self.invalidate_on_load {
            self.layout_requested = true;
            self.redraw_requested = true;
        }

        // A fallback only restores visibility when a superseded load left the
        // view hidden behind its placeholder.
        let restore = match kind {
            LoadKind::Source => true,
            LoadKind::Fallback => self.visibility == Visibility::Hidden,
        };
        if restore {
            if let Some(placeholder) = &self.placeholder {
                placeholder.set_visibility(Visibility::Hidden);
            }
            self.visibility = Visibility::Visible;
        }

        if self.debug_enabled() {
            match kind {
                LoadKind::Source => {
                    info!("{} set to view", Dimension::cache_key(&source, dimension))
                }
                LoadKind::Fallback => info!("fallback image set to view"),
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Source of the most recently dispatched load.
    pub fn last_source(&self) -> Option<Arc<str>> {
        self.guard.last_source()
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn measured(&self) -> Dimension {
        self.measured
    }

    pub fn fit_view(&self) -> bool {
        self.fit_view
    }

    pub fn invalidate_on_load(&self) -> bool {
        self.invalidate_on_load
    }

    pub fn loading_view(&self) -> Option<&LoadingView> {
        self.placeholder.as_ref()
    }

    /// Waker notified whenever a completion is queued for this view.
    pub fn waker(&self) -> Arc<Notify> {
        self.dispatcher.waker()
    }

    /// Consume a pending layout request.
    pub fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_requested)
    }

    /// Consume a pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl Default for ImageView {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &ImageView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_visible() {
            return;
        }
        if let Some(bitmap) = &self.bitmap {
            render::draw_bitmap(bitmap, area, buf);
        }
    }
}
