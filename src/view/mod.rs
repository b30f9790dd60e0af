//! View module - UI rendering
//!
//! State is first turned into view-model nodes (`nodes`), which the ratatui
//! painters then lay out:
//!
//! - `nodes`: Pure view-models (song cards, stars, picker, export panel)
//! - `utils`: Shared helpers (truncation, focus styles)
//! - `layout`: Filter form and export panel
//! - `content`: Results list
//! - `overlays`: Alerts and the help popup

pub mod nodes;
mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{AppState, Focus, HitMap};

pub use content::CARD_HEIGHT;
pub use layout::picker_value_at;

pub struct AppView;

impl AppView {
    /// Draw one frame and report where the mouse-sensitive regions landed.
    pub fn render(frame: &mut Frame, state: &AppState) -> HitMap {
        let mut hits = HitMap::default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title bar
                Constraint::Min(0),    // Filters + results/export
                Constraint::Length(1), // Key hints
            ])
            .split(frame.area());

        render_title_bar(frame, chunks[0], state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        hits.picker = layout::render_filters(frame, main_chunks[0], state);

        if state.results_visible {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(0),                               // Results
                    Constraint::Length(layout::EXPORT_PANEL_HEIGHT), // Export
                ])
                .split(main_chunks[1]);
            let (area, offset) = content::render_results(frame, right[0], state);
            hits.results = Some(area);
            hits.results_offset = offset;
            if state.export_visible {
                layout::render_export_panel(frame, right[1], state);
            }
        } else {
            content::render_placeholder(frame, main_chunks[1]);
        }

        render_hints(frame, chunks[2], state);

        if !state.alerts.is_empty() {
            overlays::render_alerts(frame, state.alerts.alerts());
        }

        if state.show_help {
            overlays::render_help_popup(frame);
        }

        hits
    }
}

fn render_title_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &AppState) {
    let mut spans = vec![Span::styled(
        "Music Export",
        Style::default().fg(Color::Cyan),
    )];
    if state.is_searching() {
        spans.push(Span::styled("  ⟳ searching", Style::default().fg(Color::Yellow)));
    }
    if state.is_exporting() {
        spans.push(Span::styled("  ⟳ exporting", Style::default().fg(Color::Yellow)));
    }
    if state.is_downloading() {
        spans.push(Span::styled("  ⟳ downloading", Style::default().fg(Color::Yellow)));
    }

    let title = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Library "));
    frame.render_widget(title, area);
}

fn render_hints(frame: &mut Frame, area: ratatui::layout::Rect, state: &AppState) {
    let hints = match state.focus {
        Focus::Filters => "↑↓ field  ←→ rating  Enter search  Space toggle  Tab panel  F1 help  Ctrl+Q quit",
        Focus::Results => "↑↓ move  Space select  A all  N none  Tab panel  H help  Q quit",
        Focus::Export => "↑↓ option  Space toggle  Enter export/download  Tab panel  H help  Q quit",
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
