//! Application state owned by the controller
//!
//! The current song list and the selection set are the only data shared
//! between the search, selection and export flows. Both live here, next to
//! the form state, alerts and in-flight request bookkeeping.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use super::alerts::AlertQueue;
use super::api_client::{ApiError, ExportRequest, ExportResult, QueryResult};
use super::content::{DownloadLink, Song};
use super::filters::FilterForm;
use super::rating::RatingPicker;
use super::types::{
    AlertKind, ExportField, ExportFormat, ExportOptions, FilterField, Focus, Theme,
};

pub const SEARCH_LABEL: &str = "Search Songs";
pub const SEARCHING_LABEL: &str = "Searching...";
pub const EXPORT_LABEL: &str = "Export Selected Songs";
pub const EXPORTING_LABEL: &str = "Exporting...";
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one song to export.";

/// Identifies one issued request. Only the latest token of each kind may
/// apply its response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Clone, Copy, Debug)]
struct PendingExport {
    token: RequestToken,
    format: ExportFormat,
    song_count: usize,
}

/// Screen regions of the last drawn frame, used to route mouse events
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitMap {
    /// Picker row: (x, y, width)
    pub picker: Option<(u16, u16, u16)>,
    /// Results list inner area: (x, y, width, height) and first visible row
    pub results: Option<(u16, u16, u16, u16)>,
    pub results_offset: usize,
}

pub struct AppState {
    songs: Vec<Song>,
    selected: BTreeSet<usize>,
    /// Selected rows in the order they were selected
    selection_order: Vec<usize>,
    pub cursor: usize,

    pub focus: Focus,
    pub filter_field: FilterField,
    pub filters: FilterForm,
    pub picker: RatingPicker,
    pub pointer_in_picker: bool,

    pub export_options: ExportOptions,
    pub export_field: ExportField,
    pub download_link: Option<DownloadLink>,

    pub alerts: AlertQueue,
    pub theme: Theme,
    pub hit_map: HitMap,
    pub results_visible: bool,
    pub export_visible: bool,
    pub show_help: bool,
    pub should_quit: bool,

    request_seq: u64,
    pending_search: Option<RequestToken>,
    pending_export: Option<PendingExport>,
    download_in_flight: bool,
}

impl AppState {
    pub fn new(filters: FilterForm, export_options: ExportOptions, theme: Theme) -> Self {
        let rating = super::filters::parse_int_prefix(&filters.rating)
            .unwrap_or(0)
            .clamp(0, 100) as u8;
        Self {
            songs: Vec::new(),
            selected: BTreeSet::new(),
            selection_order: Vec::new(),
            cursor: 0,
            focus: Focus::Filters,
            filter_field: FilterField::Rating,
            filters,
            picker: RatingPicker::new(rating),
            pointer_in_picker: false,
            export_options,
            export_field: ExportField::Format,
            download_link: None,
            alerts: AlertQueue::new(),
            theme,
            hit_map: HitMap::default(),
            results_visible: false,
            export_visible: false,
            show_help: false,
            should_quit: false,
            request_seq: 0,
            pending_search: None,
            pending_export: None,
            download_in_flight: false,
        }
    }

    // ========================================================================
    // Songs & Selection
    // ========================================================================

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Replace the song list. The selection is cleared first so it never
    /// points into the new list.
    pub fn replace_songs(&mut self, songs: Vec<Song>) {
        self.deselect_all();
        self.songs = songs;
        self.cursor = 0;
    }

    /// Toggle a row. Returns the new membership, or `None` for an index
    /// outside the current list.
    pub fn toggle_selection(&mut self, index: usize) -> Option<bool> {
        if index >= self.songs.len() {
            return None;
        }
        if self.selected.remove(&index) {
            self.selection_order.retain(|i| *i != index);
            Some(false)
        } else {
            self.selected.insert(index);
            self.selection_order.push(index);
            Some(true)
        }
    }

    pub fn select_all(&mut self) {
        self.selection_order = (0..self.songs.len()).collect();
        self.selected = self.selection_order.iter().copied().collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
        self.selection_order.clear();
    }

    /// Selected song records in the order they were selected.
    pub fn selected_songs(&self) -> Vec<Song> {
        self.selection_order
            .iter()
            .filter_map(|i| self.songs.get(*i).cloned())
            .collect()
    }

    pub fn move_cursor(&mut self, down: bool) {
        if down {
            if self.cursor < self.songs.len().saturating_sub(1) {
                self.cursor += 1;
            }
        } else if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    // ========================================================================
    // Rating picker
    // ========================================================================

    /// Commit a picker value and write it to the backing rating field.
    pub fn commit_rating(&mut self, value: u8) {
        self.picker.click(value);
        self.filters.rating = self.picker.committed().to_string();
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    pub fn show_alert(&mut self, message: impl Into<String>, kind: AlertKind) {
        self.alerts.push(message, kind, Instant::now());
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn search_label(&self) -> &'static str {
        if self.is_searching() { SEARCHING_LABEL } else { SEARCH_LABEL }
    }

    fn next_token(&mut self) -> RequestToken {
        self.request_seq += 1;
        RequestToken(self.request_seq)
    }

    /// Start a search from the current form. `None` while one is in flight.
    pub fn begin_search(&mut self) -> Option<(RequestToken, super::api_client::QueryRequest)> {
        if self.is_searching() {
            return None;
        }
        let token = self.next_token();
        self.pending_search = Some(token);
        Some((token, self.filters.to_query_request()))
    }

    /// Apply a search response, if it belongs to the latest search.
    pub fn finish_search(&mut self, token: RequestToken, result: Result<QueryResult, ApiError>) {
        if self.pending_search != Some(token) {
            tracing::debug!(?token, "Ignoring stale search response");
            return;
        }

        match result {
            Ok(QueryResult { songs, count }) => {
                tracing::info!(count, "Search completed successfully");
                self.replace_songs(songs);
                self.results_visible = true;
                self.export_visible = true;
                self.show_alert(format!("Found {} songs!", count), AlertKind::Success);
            }
            Err(ApiError::Application(message)) => {
                tracing::error!(error = %message, "Search rejected by server");
                self.show_alert(format!("Error: {}", message), AlertKind::Error);
            }
            Err(e) => {
                tracing::error!(error = %e, "Search failed");
                self.show_alert(format!("Network error: {}", e), AlertKind::Error);
            }
        }
        self.pending_search = None;
    }

    // ========================================================================
    // Export
    // ========================================================================

    pub fn is_exporting(&self) -> bool {
        self.pending_export.is_some()
    }

    pub fn export_label(&self) -> &'static str {
        if self.is_exporting() { EXPORTING_LABEL } else { EXPORT_LABEL }
    }

    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export_options.format = format;
        let visible = self.export_options.visible_fields(self.download_link.is_some());
        if !visible.contains(&self.export_field) {
            self.export_field = ExportField::Format;
        }
    }

    /// Start an export of the selected songs.
    ///
    /// An empty selection shows an error and sends nothing. Any previous
    /// download link is removed before the request goes out.
    pub fn begin_export(&mut self) -> Option<(RequestToken, ExportRequest)> {
        if self.selected.is_empty() {
            self.show_alert(EMPTY_SELECTION_MESSAGE, AlertKind::Error);
            return None;
        }
        if self.is_exporting() {
            return None;
        }

        self.download_link = None;
        if self.export_field == ExportField::DownloadLink {
            self.export_field = ExportField::ExportButton;
        }

        let songs = self.selected_songs();
        let options = self.export_options;
        let token = self.next_token();
        self.pending_export = Some(PendingExport {
            token,
            format: options.format,
            song_count: songs.len(),
        });

        Some((
            token,
            ExportRequest {
                songs,
                format: options.format,
                embed_covers: options.embed_covers,
                rename_files: options.rename_files,
                sync_folder: options.sync_folder,
            },
        ))
    }

    pub fn finish_export(&mut self, token: RequestToken, result: Result<ExportResult, ApiError>) {
        let pending = match self.pending_export {
            Some(p) if p.token == token => p,
            _ => {
                tracing::debug!(?token, "Ignoring stale export response");
                return;
            }
        };

        match result {
            Ok(ExportResult { export_path }) => {
                tracing::info!(songs = pending.song_count, path = %export_path, "Export completed");
                self.show_alert(
                    format!("Successfully exported {} songs!", pending.song_count),
                    AlertKind::Success,
                );
                if pending.format == ExportFormat::Zip {
                    self.download_link = Some(DownloadLink::from_export_path(&export_path));
                }
            }
            Err(ApiError::Application(message)) => {
                tracing::error!(error = %message, "Export rejected by server");
                self.show_alert(format!("Export error: {}", message), AlertKind::Error);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                self.show_alert(format!("Network error: {}", e), AlertKind::Error);
            }
        }
        self.pending_export = None;
    }

    // ========================================================================
    // Download
    // ========================================================================

    pub fn is_downloading(&self) -> bool {
        self.download_in_flight
    }

    /// Filename to fetch, if a link is present and no download is running.
    pub fn begin_download(&mut self) -> Option<String> {
        if self.download_in_flight {
            return None;
        }
        let filename = self.download_link.as_ref()?.filename.clone();
        self.download_in_flight = true;
        self.show_alert(format!("Downloading {}...", filename), AlertKind::Info);
        Some(filename)
    }

    pub fn finish_download(&mut self, result: Result<PathBuf, ApiError>) {
        self.download_in_flight = false;
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Archive downloaded");
                self.show_alert(format!("Downloaded {}", path.display()), AlertKind::Success);
            }
            Err(e) => {
                tracing::error!(error = %e, "Download failed");
                self.show_alert(format!("Download error: {}", e), AlertKind::Error);
            }
        }
    }

    // ========================================================================
    // Focus
    // ========================================================================

    fn panels_visible(&self) -> bool {
        self.results_visible && self.export_visible
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        self.leave_picker_field();
        let visible = self.panels_visible();
        self.focus = if forward { self.focus.next(visible) } else { self.focus.prev(visible) };
    }

    pub fn move_filter_field(&mut self, down: bool) {
        self.leave_picker_field();
        self.filter_field = if down { self.filter_field.next() } else { self.filter_field.prev() };
    }

    /// Keyboard focus leaving the rating row counts as the pointer leaving
    /// the picker.
    fn leave_picker_field(&mut self) {
        if self.focus == Focus::Filters && self.filter_field == FilterField::Rating {
            self.picker.leave();
        }
    }

    pub fn move_export_field(&mut self, down: bool) {
        let fields = self.export_options.visible_fields(self.download_link.is_some());
        let index = fields.iter().position(|f| *f == self.export_field).unwrap_or(0);
        let next = if down {
            (index + 1).min(fields.len() - 1)
        } else {
            index.saturating_sub(1)
        };
        self.export_field = fields[next];
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FilterForm::default(), ExportOptions::default(), Theme::default())
    }
}
