use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Scrolling gallery of asynchronously loaded image tiles.
#[derive(Debug, Parser)]
#[command(name = "imgview", version)]
pub struct Cli {
    /// Config file (default: <config dir>/imgview/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable the views' diagnostic logging and debug-level log output
    #[arg(long)]
    pub debug: bool,

    /// Request unconstrained images instead of fitting each tile
    #[arg(long)]
    pub no_fit: bool,

    /// Do not show loading placeholders
    #[arg(long)]
    pub no_placeholder: bool,

    #[arg(long)]
    pub min_latency_ms: Option<u64>,

    #[arg(long)]
    pub max_latency_ms: Option<u64>,

    /// Fraction of loads that fail (0.0..=1.0)
    #[arg(long)]
    pub failure_rate: Option<f64>,

    #[arg(long)]
    pub columns: Option<u16>,
}

impl Cli {
    /// Overlay command-line flags on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if self.debug {
            config.loader.debug = true;
        }
        if self.no_fit {
            config.view.fit_view = false;
        }
        if self.no_placeholder {
            config.gallery.placeholder = false;
        }
        if let Some(ms) = self.min_latency_ms {
            config.loader.min_latency_ms = ms;
        }
        if let Some(ms) = self.max_latency_ms {
            config.loader.max_latency_ms = ms;
        }
        if let Some(rate) = self.failure_rate {
            config.loader.failure_rate = rate.clamp(0.0, 1.0);
        }
        if let Some(columns) = self.columns {
            config.gallery.columns = columns.max(1);
        }
    }
}
