use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Per-view behaviour flags, loadable from a `[view]` TOML table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Ask the loader to decode at the view's measured size.
    #[serde(default = "default_fit_view")]
    pub fit_view: bool,
    /// Request layout and redraw after each installed bitmap.
    #[serde(default)]
    pub invalidate_on_load: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fit_view: default_fit_view(),
            invalidate_on_load: false,
        }
    }
}

fn default_fit_view() -> bool {
    true
}

impl ViewConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ViewError> {
        Ok(toml::from_str(content)?)
    }
}
