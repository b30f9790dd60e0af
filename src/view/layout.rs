//! Filter form and export panel rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{css_color, AppState, ExportField, ExportFormat, FilterField, Focus, PICKER_VALUES};
use super::nodes::{render_export_panel as export_panel_view, render_rating_picker, PickerView};
use super::utils::{border_style, row_style, truncate_string};

/// Width of the label column in the filter form
pub const LABEL_WIDTH: u16 = 16;
/// Columns between the clear icon and the first star
const PICKER_CLEAR_GAP: u16 = 3;
const PICKER_WIDTH: u16 = PICKER_CLEAR_GAP + 2 * 5 - 1;

pub const EXPORT_PANEL_HEIGHT: u16 = 9;

/// Picker value under a column, counted from the first picker icon.
/// Gaps between icons map to nothing.
pub fn picker_value_at(column: u16) -> Option<u8> {
    if column == 0 {
        return Some(PICKER_VALUES[0]);
    }
    let offset = column.checked_sub(PICKER_CLEAR_GAP)?;
    if offset % 2 != 0 {
        return None;
    }
    PICKER_VALUES.get(1 + usize::from(offset / 2)).copied()
}

fn picker_spans(view: &PickerView, theme_color: Color) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, picker_icon) in view.icons().enumerate() {
        match i {
            0 => {}
            1 => spans.push(Span::raw(" ".repeat(usize::from(PICKER_CLEAR_GAP) - 1))),
            _ => spans.push(Span::raw(" ")),
        }
        let color = css_color(&picker_icon.icon.color).unwrap_or(theme_color);
        let mut style = Style::default().fg(color);
        if i == 0 {
            style = style.add_modifier(Modifier::DIM);
        }
        if picker_icon.value == view.committed && view.committed > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(picker_icon.icon.glyph(), style));
    }

    let value = if view.previewing {
        format!("  {} → {}", view.committed, view.preview)
    } else {
        format!("  {}", view.committed)
    };
    spans.push(Span::styled(value, Style::default().fg(Color::DarkGray)));
    spans
}

/// Render the filter form. Returns the picker row as (x, y, width).
pub fn render_filters(frame: &mut Frame, area: Rect, state: &AppState) -> Option<(u16, u16, u16)> {
    let focused = state.focus == Focus::Filters;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Filters ")
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints: Vec<Constraint> = FilterField::ALL.iter().map(|_| Constraint::Length(2)).collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let theme_color = state.theme.on_surface();
    let mut picker_hit = None;

    for (field, row) in FilterField::ALL.iter().zip(rows.iter()) {
        let active = focused && state.filter_field == *field;
        let label = Span::styled(
            format!("{:<width$}", field.label(), width = usize::from(LABEL_WIDTH)),
            row_style(active),
        );

        let mut spans = vec![label];
        match field {
            FilterField::Rating => {
                let view = render_rating_picker(&state.picker, &state.theme);
                spans.extend(picker_spans(&view, theme_color));
                picker_hit = Some((row.x + LABEL_WIDTH, row.y, PICKER_WIDTH));
            }
            FilterField::Randomize => {
                let mark = if state.filters.randomize { "[x]" } else { "[ ]" };
                spans.push(Span::styled(mark, row_style(active)));
            }
            FilterField::SearchButton => {
                spans.clear();
                let icon = if state.is_searching() { "⟳" } else { "⌕" };
                spans.push(Span::styled(
                    format!("[ {} {} ]", icon, state.search_label()),
                    if state.is_searching() {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        row_style(active).add_modifier(Modifier::BOLD)
                    },
                ));
            }
            _ => {
                let value = state.filters.text(*field).unwrap_or_default();
                let width = usize::from(row.width.saturating_sub(LABEL_WIDTH + 1));
                let shown = if value.is_empty() && *field == FilterField::AddedBefore {
                    Span::styled("YYYY-MM-DD", Style::default().fg(Color::DarkGray))
                } else {
                    Span::styled(truncate_string(value, width).trim_end().to_string(), row_style(active))
                };
                spans.push(shown);
                if active {
                    spans.push(Span::styled("▏", Style::default().fg(Color::Green)));
                }
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), *row);
    }

    picker_hit
}

pub fn render_export_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Export;
    let view = export_panel_view(state);
    let is_active = |field: ExportField| focused && state.export_field == field;

    let mut lines = Vec::new();

    let radio = |format: ExportFormat| {
        if view.format == format { "(•)" } else { "( )" }
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{:<width$}", "Format", width = usize::from(LABEL_WIDTH)),
            row_style(is_active(ExportField::Format)),
        ),
        Span::raw(format!("{} {}   ", radio(ExportFormat::Zip), ExportFormat::Zip.label())),
        Span::raw(format!("{} {}", radio(ExportFormat::Folder), ExportFormat::Folder.label())),
    ]));

    for option in &view.options {
        let mark = if option.checked { "[x]" } else { "[ ]" };
        lines.push(Line::from(Span::styled(
            format!("{} {}", mark, option.label),
            row_style(is_active(option.field)),
        )));
    }

    let icon = if view.busy { "⟳" } else { "⬇" };
    lines.push(Line::from(Span::styled(
        format!("[ {} {} ]", icon, view.button_label),
        if view.busy {
            Style::default().fg(Color::DarkGray)
        } else {
            row_style(is_active(ExportField::ExportButton)).add_modifier(Modifier::BOLD)
        },
    )));

    if let Some(link) = &view.download_link {
        lines.push(Line::from(vec![
            Span::styled(
                format!("⬇ {}", crate::model::DownloadLink::LABEL),
                row_style(is_active(ExportField::DownloadLink))
                    .fg(Color::Green)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled(format!("  {}", link.href), Style::default().fg(Color::DarkGray)),
        ]));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Export ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(focused)),
    );
    frame.render_widget(panel, area);
}
