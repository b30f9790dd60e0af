//! Key and mouse event handling

use anyhow::Result;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::model::{AppState, ExportField, FilterField, Focus, LibraryApi};
use crate::view::{picker_value_at, CARD_HEIGHT};
use super::AppController;

/// Request a key or click asks for, started once the state lock is released
enum Action {
    None,
    Search,
    Export,
    Download,
}

impl<A: LibraryApi> AppController<A> {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let action = {
            let mut state = self.state.lock().await;
            handle_key(&mut state, key)
        };
        self.dispatch(action);
        Ok(())
    }

    pub async fn handle_mouse_event(&self, mouse: MouseEvent) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.show_help {
            handle_mouse(&mut state, mouse);
        }
        Ok(())
    }

    /// Requests run in the background; their begin step refuses a second
    /// request of the same kind while one is in flight.
    fn dispatch(&self, action: Action) {
        match action {
            Action::None => {}
            Action::Search => self.spawn_search(),
            Action::Export => self.spawn_export(),
            Action::Download => self.spawn_download(),
        }
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('c')) {
        state.should_quit = true;
        return Action::None;
    }

    // Help popup swallows everything else
    if state.show_help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('h') | KeyCode::Char('H')
        ) {
            state.show_help = false;
        }
        return Action::None;
    }

    let typing = state.focus == Focus::Filters && state.filter_field.is_text();

    match key.code {
        KeyCode::F(1) => {
            state.show_help = true;
            return Action::None;
        }
        KeyCode::F(5) => return Action::Search,
        KeyCode::Esc => {
            state.alerts.dismiss_all();
            return Action::None;
        }
        KeyCode::Tab => {
            state.cycle_focus(true);
            return Action::None;
        }
        KeyCode::BackTab => {
            state.cycle_focus(false);
            return Action::None;
        }
        KeyCode::Char('q') | KeyCode::Char('Q') if !typing => {
            state.should_quit = true;
            return Action::None;
        }
        KeyCode::Char('h') | KeyCode::Char('H') if !typing => {
            state.show_help = true;
            return Action::None;
        }
        _ => {}
    }

    match state.focus {
        Focus::Filters => handle_filters_key(state, key),
        Focus::Results => handle_results_key(state, key),
        Focus::Export => handle_export_key(state, key),
    }
}

fn handle_filters_key(state: &mut AppState, key: KeyEvent) -> Action {
    let field = state.filter_field;
    match key.code {
        KeyCode::Up => state.move_filter_field(false),
        KeyCode::Down => state.move_filter_field(true),
        KeyCode::Left if field == FilterField::Rating => state.picker.step_preview(false),
        KeyCode::Right if field == FilterField::Rating => state.picker.step_preview(true),
        KeyCode::Enter | KeyCode::Char(' ') if field == FilterField::Rating => {
            let value = state.picker.preview();
            state.commit_rating(value);
        }
        KeyCode::Enter | KeyCode::Char(' ') if field == FilterField::Randomize => {
            state.filters.randomize = !state.filters.randomize;
        }
        KeyCode::Enter => return Action::Search,
        KeyCode::Backspace => {
            if let Some(text) = state.filters.text_mut(field) {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = state.filters.text_mut(field) {
                text.push(c);
            }
        }
        _ => {}
    }
    Action::None
}

fn handle_results_key(state: &mut AppState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => state.move_cursor(false),
        KeyCode::Down => state.move_cursor(true),
        KeyCode::Char(' ') | KeyCode::Enter => {
            let cursor = state.cursor;
            state.toggle_selection(cursor);
        }
        KeyCode::Char('a') | KeyCode::Char('A') => state.select_all(),
        KeyCode::Char('n') | KeyCode::Char('N') => state.deselect_all(),
        KeyCode::Char('x') | KeyCode::Char('X') => return Action::Export,
        _ => {}
    }
    Action::None
}

fn handle_export_key(state: &mut AppState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => state.move_export_field(false),
        KeyCode::Down => state.move_export_field(true),
        KeyCode::Char('x') | KeyCode::Char('X') => return Action::Export,
        KeyCode::Char('d') | KeyCode::Char('D') => return Action::Download,
        KeyCode::Left | KeyCode::Right if state.export_field == ExportField::Format => {
            let format = state.export_options.format.toggle();
            state.set_export_format(format);
        }
        KeyCode::Enter | KeyCode::Char(' ') => match state.export_field {
            ExportField::Format => {
                let format = state.export_options.format.toggle();
                state.set_export_format(format);
            }
            ExportField::EmbedCovers => {
                state.export_options.embed_covers = !state.export_options.embed_covers;
            }
            ExportField::RenameFiles => {
                state.export_options.rename_files = !state.export_options.rename_files;
            }
            ExportField::SyncFolder => {
                state.export_options.sync_folder = !state.export_options.sync_folder;
            }
            ExportField::ExportButton => return Action::Export,
            ExportField::DownloadLink => return Action::Download,
        },
        _ => {}
    }
    Action::None
}

fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    // Some(None) is a gap between picker icons
    let picker_hit = state.hit_map.picker.and_then(|(x, y, width)| {
        let inside = mouse.row == y && mouse.column >= x && mouse.column < x + width;
        inside.then(|| picker_value_at(mouse.column - x))
    });

    match mouse.kind {
        MouseEventKind::Moved => match picker_hit {
            Some(Some(value)) => {
                state.pointer_in_picker = true;
                state.picker.hover(value);
            }
            Some(None) => {}
            None if state.pointer_in_picker => {
                state.pointer_in_picker = false;
                state.picker.leave();
            }
            None => {}
        },
        MouseEventKind::Down(MouseButton::Left) => match picker_hit {
            Some(Some(value)) => state.commit_rating(value),
            Some(None) => {}
            None => {
                if let Some(index) = results_row_at(state, mouse.column, mouse.row) {
                    state.focus = Focus::Results;
                    state.cursor = index;
                    state.toggle_selection(index);
                }
            }
        },
        _ => {}
    }
}

fn results_row_at(state: &AppState, column: u16, row: u16) -> Option<usize> {
    let (x, y, width, height) = state.hit_map.results?;
    if column < x || column >= x + width || row < y || row >= y + height {
        return None;
    }
    let index = state.hit_map.results_offset + usize::from((row - y) / CARD_HEIGHT);
    (index < state.songs().len()).then_some(index)
}
