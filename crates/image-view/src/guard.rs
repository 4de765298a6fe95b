//! Stale-result guard shared between a view and its outstanding completions.
//!
//! Every `ImageView::set_image_url` and every dispatched load bumps the
//! generation. A completion carries the generation it was issued under and is
//! admitted only while that generation is still current and, when a
//! `last_source` has been published, the completed source matches it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct LoadGuard {
    generation: AtomicU64,
    last_source: RwLock<Option<Arc<str>>>,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every outstanding load without starting a new one.
    /// Returns the new generation.
    pub fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Publish `source` as the most recently dispatched load and return the
    /// generation the load must carry.
    pub fn begin(&self, source: &str) -> u64 {
        *self
            .last_source
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::from(source));
        self.supersede()
    }

    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    pub fn last_source(&self) -> Option<Arc<str>> {
        self.last_source
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a completion of `source` issued under `generation` may be
    /// applied.
    pub fn admits(&self, generation: u64, source: &str) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        match self.last_source() {
            Some(last) => &*last == source,
            None => true,
        }
    }
}
