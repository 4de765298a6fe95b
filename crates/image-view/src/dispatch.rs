//! UI-thread dispatch: completions post `Delivery` values from any thread,
//! the owning view drains them on the UI thread.

use std::sync::Arc;

use tokio::sync::{mpsc, Notify};

use crate::bitmap::{Bitmap, Dimension};

/// What kind of load produced a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// A load of the view's own source; drives placeholder coordination.
    Source,
    /// The loader's fallback image.
    Fallback,
}

/// A completed load waiting to be applied on the UI thread.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub generation: u64,
    pub source: String,
    pub dimension: Option<Dimension>,
    pub kind: LoadKind,
    pub bitmap: Bitmap,
}

/// Send half handed to completions. `Send + Sync`, cheap to clone.
#[derive(Debug, Clone)]
pub struct UiPoster {
    tx: mpsc::UnboundedSender<Delivery>,
    waker: Arc<Notify>,
}

impl UiPoster {
    /// Enqueue `delivery` for the UI thread and wake the host loop.
    /// Returns false when the owning view has been dropped.
    pub fn post(&self, delivery: Delivery) -> bool {
        if self.tx.send(delivery).is_err() {
            return false;
        }
        self.waker.notify_one();
        true
    }
}

/// Receive half, owned by the view.
#[derive(Debug)]
pub struct UiDispatcher {
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
    waker: Arc<Notify>,
}

impl UiDispatcher {
    pub fn new() -> Self {
        Self::with_waker(Arc::new(Notify::new()))
    }

    /// Share `waker` with other dispatchers so one host loop can wait on all
    /// of them.
    pub fn with_waker(waker: Arc<Notify>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, waker }
    }

    pub fn poster(&self) -> UiPoster {
        UiPoster {
            tx: self.tx.clone(),
            waker: Arc::clone(&self.waker),
        }
    }

    pub fn waker(&self) -> Arc<Notify> {
        Arc::clone(&self.waker)
    }

    /// Next queued delivery, without waiting.
    pub fn try_next(&mut self) -> Option<Delivery> {
        self.rx.try_recv().ok()
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
