//! Results list rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::{css_color, AppState, Focus};
use super::nodes::{render_song_list, SongCard, CARD_STAR_COLOR};
use super::utils::{border_style, truncate_string};

/// Each song card takes this many terminal rows
pub const CARD_HEIGHT: u16 = 3;

pub fn render_placeholder(frame: &mut Frame, area: Rect) {
    let content = Paragraph::new(
        "Set your filters and press Enter to search the library\n\n\
         Use Tab to move between panels\n\
         Press F1 for all key bindings",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Results ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(content, area);
}

fn card_item(card: &SongCard, width: usize) -> ListItem<'static> {
    let star_color = css_color(CARD_STAR_COLOR).unwrap_or(Color::Magenta);
    let marker = if card.selected {
        Span::styled("● ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("○ ", Style::default().fg(Color::DarkGray))
    };
    let cover = if card.has_cover {
        Span::styled("▣ ", Style::default().fg(Color::Cyan))
    } else {
        Span::styled("▢ ", Style::default().fg(Color::DarkGray))
    };

    let stars = card.stars_text();
    let title_width = width.saturating_sub(4 + stars.chars().count() + 2);
    let title_style = if card.selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let first = Line::from(vec![
        marker,
        cover,
        Span::styled(truncate_string(&card.title, title_width), title_style),
        Span::raw("  "),
        Span::styled(stars, Style::default().fg(star_color)),
    ]);
    let second = Line::from(Span::styled(
        format!("    {}", truncate_string(&card.details(), width.saturating_sub(4)).trim_end()),
        Style::default().fg(Color::Gray),
    ));

    let third = Line::from(Span::styled(
        format!("    Cover: {}", truncate_string(&card.cover_src, width.saturating_sub(11)).trim_end()),
        Style::default().fg(Color::DarkGray),
    ));

    ListItem::new(Text::from(vec![first, second, third]))
}

/// Render the song cards. Returns the list's inner area and the index of the
/// first visible card.
pub fn render_results(frame: &mut Frame, area: Rect, state: &AppState) -> ((u16, u16, u16, u16), usize) {
    let focused = state.focus == Focus::Results;
    let view = render_song_list(state.songs(), state.selection());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " Results · {} · {} ",
            view.stats.total_text(),
            view.stats.selected_text()
        ))
        .border_style(border_style(focused));
    let inner = block.inner(area);

    let width = usize::from(inner.width);
    let items: Vec<ListItem> = view.cards.iter().map(|c| card_item(c, width)).collect();

    let highlight = if focused {
        Style::default().bg(Color::Rgb(0x30, 0x30, 0x40))
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);

    let mut list_state = ListState::default();
    if !view.cards.is_empty() {
        list_state.select(Some(state.cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);

    ((inner.x, inner.y, inner.width, inner.height), list_state.offset())
}
