use image_view::ViewConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

/// Behaviour of the synthetic loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_min_latency_ms")]
    pub min_latency_ms: u64,
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: u64,
    /// Fraction of loads (0.0..=1.0) that fail and deliver the fallback image.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    /// Turns on the views' diagnostic logging.
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_columns")]
    pub columns: u16,
    /// Tile height in terminal rows, border included.
    #[serde(default = "default_tile_height")]
    pub tile_height: u16,
    #[serde(default = "default_count")]
    pub count: usize,
    /// Every n-th entry has a blank source (0 disables blanks).
    #[serde(default = "default_blank_every")]
    pub blank_every: usize,
    #[serde(default = "default_placeholder")]
    pub placeholder: bool,
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: default_min_latency_ms(),
            max_latency_ms: default_max_latency_ms(),
            failure_rate: default_failure_rate(),
            debug: false,
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            tile_height: default_tile_height(),
            count: default_count(),
            blank_every: default_blank_every(),
            placeholder: default_placeholder(),
            source_prefix: default_source_prefix(),
        }
    }
}

fn default_min_latency_ms() -> u64 {
    150
}

fn default_max_latency_ms() -> u64 {
    1200
}

fn default_failure_rate() -> f64 {
    0.05
}

fn default_columns() -> u16 {
    4
}

fn default_tile_height() -> u16 {
    8
}

fn default_count() -> usize {
    120
}

fn default_blank_every() -> usize {
    7
}

fn default_placeholder() -> bool {
    true
}

fn default_source_prefix() -> String {
    "https://covers.example/art/".to_string()
}

impl GalleryConfig {
    /// The gallery's source list; blank entries exercise the fallback path.
    pub fn sources(&self) -> Vec<String> {
        (0..self.count)
            .map(|i| {
                if self.blank_every > 0 && i % self.blank_every == self.blank_every - 1 {
                    String::new()
                } else {
                    format!("{}{:04}.png", self.source_prefix, i)
                }
            })
            .collect()
    }
}

impl Config {
    /// Load from `path`, or the default location. A missing file is created
    /// with defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if !config_path.exists() {
            let config = Self::default();
            config.save(&config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("imgview")
            .join("config.toml")
    }
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("imgview")
}
