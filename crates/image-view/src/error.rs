//! Error type for the image view.
//!
//! Only programmer errors surface here. Deferred loads, blank sources, stale
//! results and loader failures are absorbed by the view.

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// `show_fallback` was called before any loader was set.
    #[error("cannot load the fallback image until an image loader has been set via set_image_url()")]
    LoaderMissing,

    #[error("bitmap pixel buffer has {actual} bytes, expected {expected} (width * height * 4)")]
    InvalidBitmap { expected: usize, actual: usize },

    #[error("invalid view config: {0}")]
    Config(#[from] toml::de::Error),
}
