//! App — gallery event loop.
//!
//! - A blocking task reads terminal events and forwards them over mpsc.
//! - Image completions wake the loop through the views' shared `Notify`;
//!   the loop then drains them on this (UI) task.
//! - A 100ms tick refreshes the status bar counters.
//! - Frames are drawn only when something changed.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tokio::sync::{mpsc, Notify};
use tracing::{debug, info};

use crate::gallery::Gallery;
use crate::loader::LoaderStats;
use crate::theme::{
    style_default, style_muted, style_secondary, style_title, C_BADGE_PENDING, C_BG, C_PLAYING,
};

#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
}

pub struct App {
    gallery: Gallery,
    stats: Arc<LoaderStats>,
    waker: Arc<Notify>,
    should_quit: bool,
}

impl App {
    pub fn new(gallery: Gallery, stats: Arc<LoaderStats>, waker: Arc<Notify>) -> Self {
        Self {
            gallery,
            stats,
            waker,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let waker = Arc::clone(&self.waker);
        let mut needs_redraw = true;
        let mut last_stats = self.stats.snapshot();
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                _ = waker.notified() => {
                    needs_redraw = self.gallery.process_pending();
                }

                _ = ui_tick.tick() => {
                    let stats = self.stats.snapshot();
                    needs_redraw = stats != last_stats;
                    last_stats = stats;
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("imgview exiting, {} images applied", self.gallery.applied());

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key)
            }
            AppMessage::Event(Event::Resize(w, h)) => {
                debug!("terminal resized to {}x{}", w, h);
                true
            }
            AppMessage::Event(_) => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('j') | KeyCode::Down => self.gallery.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.gallery.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                let page = self.gallery.page();
                self.gallery.scroll_by(page)
            }
            KeyCode::PageUp => {
                let page = self.gallery.page();
                self.gallery.scroll_by(-page)
            }
            KeyCode::Char('r') => {
                info!("reloading all tiles");
                self.gallery.reload();
                true
            }
            KeyCode::Char('f') => {
                self.gallery.toggle_fit_view();
                info!("fit view {}", on_off(self.gallery.fit_view()));
                true
            }
            KeyCode::Char('p') => {
                self.gallery.toggle_placeholders();
                info!("placeholders {}", on_off(self.gallery.placeholders()));
                true
            }
            _ => false,
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" imgview ", style_title()),
                Span::styled(
                    "j/k scroll · space page · r reload · f fit · p placeholder · q quit",
                    style_muted(),
                ),
            ])),
            header,
        );
        self.gallery.draw(frame, body);
        self.draw_status(frame, status);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let (requested, skipped, delivered, failed) = self.stats.snapshot();
        let (first, last, total) = self.gallery.viewport();
        let flag = |on: bool| {
            Span::styled(
                on_off(on),
                if on {
                    Style::default().fg(C_PLAYING)
                } else {
                    style_muted()
                },
            )
        };
        let line = Line::from(vec![
            Span::styled(format!(" rows {}-{} of {} ", first, last, total), style_default()),
            Span::styled("│ requested ", style_secondary()),
            Span::styled(requested.to_string(), style_default()),
            Span::styled(" skipped ", style_secondary()),
            Span::styled(skipped.to_string(), style_default()),
            Span::styled(" delivered ", style_secondary()),
            Span::styled(delivered.to_string(), style_default()),
            Span::styled(" failed ", style_secondary()),
            Span::styled(failed.to_string(), style_default()),
            Span::styled(" applied ", style_secondary()),
            Span::styled(self.gallery.applied().to_string(), style_default()),
            Span::styled(" loading ", style_secondary()),
            Span::styled(
                self.gallery.loading().to_string(),
                Style::default().fg(C_BADGE_PENDING),
            ),
            Span::styled(" │ fit ", style_secondary()),
            flag(self.gallery.fit_view()),
            Span::styled(" placeholder ", style_secondary()),
            flag(self.gallery.placeholders()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
