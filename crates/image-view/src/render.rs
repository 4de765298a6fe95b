//! Half-block bitmap rendering.
//!
//! Each terminal cell shows two vertically stacked pixels: `▀` with the upper
//! pixel as foreground and the lower one as background. A cell area of
//! `w × h` therefore measures `w × 2h` pixels.

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::bitmap::{Bitmap, Dimension};

const UPPER_HALF: &str = "▀";

/// Pixel size of a cell area.
pub fn measure(area: Rect) -> Dimension {
    Dimension::new(u32::from(area.width), u32::from(area.height) * 2)
}

/// Draw `bitmap` stretched over `area` with nearest-neighbour sampling.
pub fn draw_bitmap(bitmap: &Bitmap, area: Rect, buf: &mut Buffer) {
    if bitmap.is_empty() || area.width == 0 || area.height == 0 {
        return;
    }
    let target = measure(area);
    for row in 0..area.height {
        for col in 0..area.width {
            let top = sample(bitmap, target, u32::from(col), u32::from(row) * 2);
            let bottom = sample(bitmap, target, u32::from(col), u32::from(row) * 2 + 1);
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol(UPPER_HALF).set_fg(top).set_bg(bottom);
            }
        }
    }
}

fn sample(bitmap: &Bitmap, target: Dimension, x: u32, y: u32) -> Color {
    let sx = (u64::from(x) * u64::from(bitmap.width()) / u64::from(target.width)) as u32;
    let sy = (u64::from(y) * u64::from(bitmap.height()) / u64::from(target.height)) as u32;
    match bitmap.pixel(sx, sy) {
        Some([_, _, _, 0]) | None => Color::Reset,
        Some([r, g, b, _]) => Color::Rgb(r, g, b),
    }
}
