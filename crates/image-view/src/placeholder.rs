//! Companion "loading" view shown while an image view is waiting on its
//! loader.
//!
//! The host owns the placeholder and decides where to draw it. The image
//! view holds a clone of the handle and only ever toggles its visibility.

use std::cell::Cell;
use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

const C_LOADING: Color = Color::Rgb(115, 115, 138);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Shared handle to a placeholder. Clones refer to the same placeholder.
#[derive(Debug, Clone)]
pub struct LoadingView {
    visibility: Rc<Cell<Visibility>>,
    label: Rc<str>,
}

impl LoadingView {
    /// A hidden placeholder showing `label` when visible.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            visibility: Rc::new(Cell::new(Visibility::Hidden)),
            label: Rc::from(label.into()),
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.get().is_visible()
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.visibility.set(visibility);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether two handles refer to the same placeholder.
    pub fn same_as(&self, other: &LoadingView) -> bool {
        Rc::ptr_eq(&self.visibility, &other.visibility)
    }
}

impl Default for LoadingView {
    fn default() -> Self {
        Self::new("loading…")
    }
}

impl Widget for &LoadingView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_visible() || area.width == 0 || area.height == 0 {
            return;
        }
        let text = format!("⣾ {}", self.label);
        let w = (text.width() as u16).min(area.width);
        let x = area.x + (area.width - w) / 2;
        let y = area.y + area.height / 2;
        buf.set_stringn(x, y, &text, w as usize, Style::default().fg(C_LOADING));
    }
}
