//! Synthetic image loader — stands in for a real network/decode pipeline.
//!
//! Each request sleeps for a random latency on the tokio runtime, then paints
//! a gradient derived from the source string at the requested size. Requests
//! whose view has moved on are skipped before any pixels are produced.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image_view::{Bitmap, Completion, Dimension, ImageLoader, FALLBACK_SOURCE};
use rand::Rng;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::LoaderConfig;

/// Size painted when the view asks for an unconstrained image.
const NATIVE_SIZE: u32 = 256;
const CHECKER_CELL: u32 = 4;

#[derive(Debug, Default)]
pub struct LoaderStats {
    pub requested: AtomicU64,
    pub skipped: AtomicU64,
    pub delivered: AtomicU64,
    pub failed: AtomicU64,
}

impl LoaderStats {
    pub fn snapshot(&self) -> (u64, u64, u64, u64) {
        (
            self.requested.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed),
            self.delivered.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

pub struct SyntheticLoader {
    config: LoaderConfig,
    stats: Arc<LoaderStats>,
    runtime: Handle,
}

impl SyntheticLoader {
    /// Must be called from within a tokio runtime.
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            stats: Arc::new(LoaderStats::default()),
            runtime: Handle::current(),
        }
    }

    pub fn stats(&self) -> Arc<LoaderStats> {
        Arc::clone(&self.stats)
    }

    fn latency(&self) -> Duration {
        let min = self.config.min_latency_ms;
        let max = self.config.max_latency_ms.max(min);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    fn should_fail(&self) -> bool {
        rand::thread_rng().gen_bool(self.config.failure_rate.clamp(0.0, 1.0))
    }
}

impl ImageLoader for SyntheticLoader {
    fn get(&self, source: &str, dimension: Option<Dimension>, completion: Completion) {
        self.stats.requested.fetch_add(1, Ordering::Relaxed);
        let delay = self.latency();
        let fail = source != FALLBACK_SOURCE && self.should_fail();
        let source = source.to_string();
        let stats = Arc::clone(&self.stats);
        let size = target_size(dimension);

        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            if completion.is_stale() {
                stats.skipped.fetch_add(1, Ordering::Relaxed);
                debug!("skipping {}: view moved on", source);
                return;
            }

            let bitmap = if source == FALLBACK_SOURCE {
                checkerboard(size)
            } else if fail {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!("load of {} failed, delivering fallback", source);
                checkerboard(size)
            } else {
                match gradient(&source, size) {
                    Ok(b) => b,
                    Err(e) => {
                        warn!("could not paint {}: {}", source, e);
                        return;
                    }
                }
            };

            stats.delivered.fetch_add(1, Ordering::Relaxed);
            completion.deliver(source, bitmap);
        });
    }

    fn is_debug_enabled(&self) -> bool {
        self.config.debug
    }
}

fn target_size(dimension: Option<Dimension>) -> Dimension {
    match dimension {
        Some(d) if !d.is_zero() => Dimension::new(d.width.max(1), d.height.max(1)),
        _ => Dimension::new(NATIVE_SIZE, NATIVE_SIZE),
    }
}

fn source_hue(source: &str) -> [u8; 3] {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    let h = hasher.finish().to_le_bytes();
    [h[0], h[1], h[2]]
}

/// Diagonal blend between two colours picked from the source's hash.
fn gradient(source: &str, size: Dimension) -> Result<Bitmap, image_view::ViewError> {
    let [r, g, b] = source_hue(source);
    let (w, h) = (size.width, size.height);
    let span = (w + h).saturating_sub(2).max(1);
    let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);
    for y in 0..h {
        for x in 0..w {
            let t = (x + y) * 255 / span;
            let mix = |a: u8| ((u32::from(a) * (255 - t) + (255 - u32::from(a)) * t) / 255) as u8;
            pixels.extend_from_slice(&[mix(r), mix(g), mix(b), 255]);
        }
    }
    Bitmap::from_rgba(w, h, pixels)
}

fn checkerboard(size: Dimension) -> Bitmap {
    let (w, h) = (size.width, size.height);
    let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);
    for y in 0..h {
        for x in 0..w {
            let light = ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0;
            let v = if light { 90 } else { 40 };
            pixels.extend_from_slice(&[v, v, v + 16, 255]);
        }
    }
    Bitmap::from_rgba(w, h, pixels).unwrap_or_else(|_| Bitmap::solid(w, h, [40, 40, 56, 255]))
}
