//! Gallery — a scrolling grid of recycled image tiles.
//!
//! The tile pool is sized to what fits on screen. Scrolling does not create
//! views; it rebinds the existing ones to new sources, so loads started for
//! the previous binding are still in flight when the next one begins.

use std::sync::Arc;

use image_view::{ImageView, LoadingView, SharedLoader, ViewConfig};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    widgets::{Block, Borders},
    Frame,
};
use tokio::sync::Notify;
use tracing::debug;

use crate::config::GalleryConfig;
use crate::theme::{style_secondary, style_tile_border};

struct Tile {
    view: ImageView,
    placeholder: LoadingView,
    bound: Option<usize>,
}

impl Tile {
    fn new(config: &ViewConfig, waker: Arc<Notify>, placeholders: bool) -> Self {
        let placeholder = LoadingView::default();
        let mut view = ImageView::from_config(config, waker);
        if placeholders {
            view.set_loading_view(Some(placeholder.clone()));
        }
        Self {
            view,
            placeholder,
            bound: None,
        }
    }
}

pub struct Gallery {
    sources: Vec<String>,
    tiles: Vec<Tile>,
    first_row: usize,
    columns: usize,
    tile_height: u16,
    visible_rows: usize,
    view_config: ViewConfig,
    placeholders: bool,
    loader: SharedLoader,
    waker: Arc<Notify>,
    applied: u64,
}

impl Gallery {
    pub fn new(
        config: &GalleryConfig,
        view_config: ViewConfig,
        loader: SharedLoader,
        waker: Arc<Notify>,
    ) -> Self {
        Self {
            sources: config.sources(),
            tiles: Vec::new(),
            first_row: 0,
            columns: usize::from(config.columns.max(1)),
            tile_height: config.tile_height.max(3),
            visible_rows: 1,
            view_config,
            placeholders: config.placeholder,
            loader,
            waker,
            applied: 0,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.sources.len().div_ceil(self.columns)
    }

    fn max_first_row(&self) -> usize {
        self.total_rows().saturating_sub(self.visible_rows)
    }

    /// Scroll by `delta` rows. Returns whether the viewport moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let target = self
            .first_row
            .saturating_add_signed(delta)
            .min(self.max_first_row());
        if target == self.first_row {
            return false;
        }
        self.first_row = target;
        true
    }

    pub fn page(&self) -> isize {
        self.visible_rows.max(1) as isize
    }

    /// Rebind every tile on the next draw, issuing fresh loads.
    pub fn reload(&mut self) {
        for tile in &mut self.tiles {
            tile.bound = None;
        }
    }

    pub fn fit_view(&self) -> bool {
        self.view_config.fit_view
    }

    pub fn toggle_fit_view(&mut self) {
        self.view_config.fit_view = !self.view_config.fit_view;
        for tile in &mut self.tiles {
            tile.view.set_fit_view(self.view_config.fit_view);
        }
        self.reload();
    }

    pub fn placeholders(&self) -> bool {
        self.placeholders
    }

    pub fn toggle_placeholders(&mut self) {
        self.placeholders = !self.placeholders;
        for tile in &mut self.tiles {
            let placeholder = self.placeholders.then(|| tile.placeholder.clone());
            tile.view.set_loading_view(placeholder);
        }
    }

    /// Apply completed loads on the UI thread. Returns whether any tile
    /// changed.
    pub fn process_pending(&mut self) -> bool {
        let mut changed = false;
        for tile in &mut self.tiles {
            if tile.view.process_pending() {
                self.applied += 1;
                changed = true;
            }
            changed |= tile.view.take_layout_request();
            changed |= tile.view.take_redraw_request();
        }
        changed
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn loading(&self) -> usize {
        self.tiles.iter().filter(|t| !t.view.is_visible()).count()
    }

    /// (first visible row, last visible row, total rows), 1-based.
    pub fn viewport(&self) -> (usize, usize, usize) {
        let total = self.total_rows();
        let last = (self.first_row + self.visible_rows).min(total);
        (self.first_row + 1, last, total)
    }

    fn ensure_tiles(&mut self, count: usize) {
        if self.tiles.len() > count {
            debug!("gallery: shrinking tile pool {} -> {}", self.tiles.len(), count);
            self.tiles.truncate(count);
        }
        while self.tiles.len() < count {
            let tile = Tile::new(&self.view_config, Arc::clone(&self.waker), self.placeholders);
            self.tiles.push(tile);
        }
    }

    /// Lay out, bind, measure and render the visible tiles.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.visible_rows = usize::from((area.height / self.tile_height).max(1));
        self.first_row = self.first_row.min(self.max_first_row());
        self.ensure_tiles(self.visible_rows * self.columns);

        let rows = Layout::vertical(vec![Constraint::Length(self.tile_height); self.visible_rows])
            .split(area);
        let row_constraints = vec![Constraint::Ratio(1, self.columns as u32); self.columns];

        for (r, row_area) in rows.iter().enumerate() {
            let cells = Layout::horizontal(row_constraints.clone()).split(*row_area);
            for (c, cell) in cells.iter().enumerate() {
                let slot = r * self.columns + c;
                let index = (self.first_row + r) * self.columns + c;
                let Some(source) = self.sources.get(index) else {
                    continue;
                };
                let tile = &mut self.tiles[slot];

                if tile.bound != Some(index) {
                    tile.view.set_image_url(Arc::clone(&self.loader), source.clone());
                    tile.bound = Some(index);
                }

                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(style_tile_border(!tile.view.is_visible()))
                    .title(tile_label(index, source))
                    .title_style(style_secondary());
                let inner = block.inner(*cell);
                frame.render_widget(block, *cell);

                tile.view.measure_area(inner);
                frame.render_widget(&tile.view, inner);
                frame.render_widget(&tile.placeholder, inner);
            }
        }
    }
}

fn tile_label(index: usize, source: &str) -> String {
    if source.trim().is_empty() {
        return format!(" {} · (no source) ", index);
    }
    let name = source.rsplit('/').next().unwrap_or(source);
    format!(" {} · {} ", index, name)
}
