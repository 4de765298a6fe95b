//! image-view — a ratatui image widget that resolves its bitmap asynchronously.
//!
//! Architecture:
//! - `ImageView` owns its source, a shared `ImageLoader`, an optional
//!   `LoadingView` placeholder and its measured size.
//! - Loads are deferred until the host reports a non-zero size, then handed
//!   to the loader together with a `Completion`.
//! - A `Completion` can be delivered from any thread. It consults the shared
//!   `LoadGuard` and posts admitted results onto the view's UI queue.
//! - The host drains that queue on its UI thread via
//!   `ImageView::process_pending`, woken by the view's `Notify`.

pub mod bitmap;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod loader;
pub mod placeholder;
pub mod render;
pub mod view;

pub use bitmap::{Bitmap, Dimension};
pub use config::ViewConfig;
pub use dispatch::{Delivery, LoadKind, UiDispatcher, UiPoster};
pub use error::ViewError;
pub use guard::LoadGuard;
pub use loader::{Completion, ImageLoader, SharedLoader, FALLBACK_SOURCE};
pub use placeholder::{LoadingView, Visibility};
pub use view::ImageView;
