//! Overlay rendering (alerts, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{Alert, AlertKind};
use super::utils::centered_rect;

const ALERT_WIDTH: u16 = 46;

fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Info => Color::Cyan,
        AlertKind::Success => Color::Green,
        AlertKind::Error => Color::Red,
    }
}

/// Stack alerts in the top-right corner, oldest first.
pub fn render_alerts(frame: &mut Frame, alerts: &[Alert]) {
    let area = frame.area();
    let width = ALERT_WIDTH.min(area.width);
    let inner_width = usize::from(width.saturating_sub(4)).max(1);
    let mut y = area.y;

    for alert in alerts {
        let text = format!("{} {}", alert.kind.icon(), alert.message);
        let lines = text.chars().count().div_ceil(inner_width) as u16;
        let height = lines.max(1) + 2;
        if y + height > area.bottom() {
            break;
        }

        let popup = Rect {
            x: area.right().saturating_sub(width),
            y,
            width,
            height,
        };
        frame.render_widget(Clear, popup);

        let color = alert_color(alert.kind);
        let mut style = Style::default().fg(color);
        if alert.removing {
            style = style.add_modifier(Modifier::DIM);
        }

        let widget = Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .style(Style::default().bg(Color::Black)),
            );
        frame.render_widget(widget, popup);
        y += height;
    }
}

pub fn render_help_popup(frame: &mut Frame) {
    let keybindings = vec![
        ("", "── Filters ──"),
        ("↑ / ↓", "Move between fields"),
        ("← / →", "Preview rating"),
        ("Enter / Space", "Commit rating / toggle randomize"),
        ("Enter", "Search"),
        ("F5", "Search from anywhere"),
        ("", ""),
        ("", "── Results ──"),
        ("↑ / ↓", "Move cursor"),
        ("Space / Enter", "Select / deselect song"),
        ("A", "Select all"),
        ("N", "Deselect all"),
        ("Mouse click", "Select / deselect song"),
        ("", ""),
        ("", "── Export ──"),
        ("← / → / Space", "Change format / toggle option"),
        ("Enter", "Export or download"),
        ("X", "Export selected songs"),
        ("D", "Download last archive"),
        ("", ""),
        ("", "── General ──"),
        ("Tab / Shift+Tab", "Cycle panels"),
        ("Esc", "Dismiss alerts"),
        ("H / F1", "Toggle this help"),
        ("Q / Ctrl+Q", "Quit"),
    ];

    let area = frame.area();
    let popup_area = centered_rect(area, 62, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
