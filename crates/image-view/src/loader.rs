//! Contract with the external image loader.
//!
//! The loader decodes, caches and fetches; the view only tells it what to
//! load and at which size, and hands it a `Completion` to fire once done.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::bitmap::{Bitmap, Dimension};
use crate::dispatch::{Delivery, LoadKind, UiPoster};
use crate::guard::LoadGuard;

/// Sentinel source identifying the loader's built-in fallback image.
pub const FALLBACK_SOURCE: &str = "image-view:fallback";

/// An asynchronous image-producing service.
pub trait ImageLoader: Send + Sync {
    /// Start loading `source`, decoded to fit `dimension` when given.
    ///
    /// Must return without blocking. `completion` may be delivered from any
    /// thread, at most once (it is consumed), with the same `source` string.
    /// Dropping it without delivering is allowed; the view simply never
    /// receives a result.
    fn get(&self, source: &str, dimension: Option<Dimension>, completion: Completion);

    /// Gates the view's diagnostic logging.
    fn is_debug_enabled(&self) -> bool {
        false
    }
}

pub type SharedLoader = Arc<dyn ImageLoader>;

/// One-shot completion handle for a single `ImageLoader::get` call.
pub struct Completion {
    generation: u64,
    dimension: Option<Dimension>,
    kind: LoadKind,
    debug: bool,
    guard: Arc<LoadGuard>,
    poster: UiPoster,
}

impl Completion {
    pub(crate) fn new(
        generation: u64,
        dimension: Option<Dimension>,
        kind: LoadKind,
        debug: bool,
        guard: Arc<LoadGuard>,
        poster: UiPoster,
    ) -> Self {
        Self {
            generation,
            dimension,
            kind,
            debug,
            guard,
            poster,
        }
    }

    /// True once the view has moved on to another load. Loaders may check
    /// this to skip work nobody will see.
    pub fn is_stale(&self) -> bool {
        !self.guard.is_current(self.generation)
    }

    pub fn dimension(&self) -> Option<Dimension> {
        self.dimension
    }

    pub fn kind(&self) -> LoadKind {
        self.kind
    }

    /// Hand the loaded bitmap back to the view. Safe to call from any
    /// thread; the install itself happens on the view's UI thread.
    pub fn deliver(self, source: impl Into<String>, bitmap: Bitmap) {
        let source = source.into();
        if !self.guard.admits(self.generation, &source) {
            if self.debug {
                debug!(
                    "view source changed since load started, not setting {} to view",
                    source
                );
            }
            return;
        }
        let delivered = self.poster.post(Delivery {
            generation: self.generation,
            source,
            dimension: self.dimension,
            kind: self.kind,
            bitmap,
        });
        if !delivered && self.debug {
            debug!("view dropped before its load completed");
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("generation", &self.generation)
            .field("dimension", &self.dimension)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
