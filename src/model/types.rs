//! Core type definitions for the application

use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Which panel of the UI currently has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Filters,
    Results,
    Export,
}

impl Focus {
    /// Next panel, skipping panels that are not visible yet.
    pub fn next(self, panels_visible: bool) -> Self {
        match (self, panels_visible) {
            (_, false) => Focus::Filters,
            (Focus::Filters, true) => Focus::Results,
            (Focus::Results, true) => Focus::Export,
            (Focus::Export, true) => Focus::Filters,
        }
    }

    pub fn prev(self, panels_visible: bool) -> Self {
        match (self, panels_visible) {
            (_, false) => Focus::Filters,
            (Focus::Filters, true) => Focus::Export,
            (Focus::Results, true) => Focus::Filters,
            (Focus::Export, true) => Focus::Results,
        }
    }
}

/// Rows of the filter form, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Rating,
    Limit,
    ExcludeGenres,
    DynPsVal,
    AlbumLimit,
    Randomize,
    AddedBefore,
    SearchButton,
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        FilterField::Rating,
        FilterField::Limit,
        FilterField::ExcludeGenres,
        FilterField::DynPsVal,
        FilterField::AlbumLimit,
        FilterField::Randomize,
        FilterField::AddedBefore,
        FilterField::SearchButton,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Rating => "Min rating",
            FilterField::Limit => "Limit",
            FilterField::ExcludeGenres => "Exclude genres",
            FilterField::DynPsVal => "Dyn. counter >",
            FilterField::AlbumLimit => "Per album",
            FilterField::Randomize => "Randomize",
            FilterField::AddedBefore => "Added before",
            FilterField::SearchButton => "",
        }
    }

    /// Whether the field takes typed characters.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FilterField::Limit
                | FilterField::ExcludeGenres
                | FilterField::DynPsVal
                | FilterField::AlbumLimit
                | FilterField::AddedBefore
        )
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1).min(Self::ALL.len() - 1)]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[index.saturating_sub(1)]
    }
}

/// Archive or folder export, serialized as the backend's format id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Zip,
    #[default]
    Folder,
}

impl ExportFormat {
    pub fn toggle(self) -> Self {
        match self {
            ExportFormat::Zip => ExportFormat::Folder,
            ExportFormat::Folder => ExportFormat::Zip,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Zip => "ZIP archive",
            ExportFormat::Folder => "Folder",
        }
    }
}

/// Rows of the export panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExportField {
    #[default]
    Format,
    EmbedCovers,
    RenameFiles,
    SyncFolder,
    ExportButton,
    DownloadLink,
}

/// Export options as chosen in the export panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub embed_covers: bool,
    pub rename_files: bool,
    pub sync_folder: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            embed_covers: true,
            rename_files: true,
            sync_folder: false,
        }
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Embed-covers and sync-folder only apply to folder exports. They are
    /// hidden for archives but keep their values.
    pub fn folder_options_visible(&self) -> bool {
        self.format == ExportFormat::Folder
    }

    /// Export panel rows in display order, hidden rows left out.
    pub fn visible_fields(&self, has_download_link: bool) -> Vec<ExportField> {
        let mut fields = vec![ExportField::Format];
        if self.folder_options_visible() {
            fields.push(ExportField::EmbedCovers);
        }
        fields.push(ExportField::RenameFiles);
        if self.folder_options_visible() {
            fields.push(ExportField::SyncFolder);
        }
        fields.push(ExportField::ExportButton);
        if has_download_link {
            fields.push(ExportField::DownloadLink);
        }
        fields
    }
}

/// Severity of a user-facing alert
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Success,
    Error,
}

impl AlertKind {
    pub fn icon(self) -> &'static str {
        match self {
            AlertKind::Info => "ℹ",
            AlertKind::Success => "✔",
            AlertKind::Error => "✖",
        }
    }
}

const FALLBACK_ON_SURFACE: &str = "#111111";

/// Theme colors, resolved each time something is drawn
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub on_surface: Option<String>,
}

impl Theme {
    /// Configured `on_surface` color as CSS text, or the literal fallback.
    pub fn on_surface_css(&self) -> &str {
        self.on_surface
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(FALLBACK_ON_SURFACE)
    }

    pub fn on_surface(&self) -> Color {
        css_color(self.on_surface_css()).unwrap_or(Color::Rgb(0x11, 0x11, 0x11))
    }
}

/// Parse `#rgb`, `#rrggbb` or a named color.
pub fn css_color(raw: &str) -> Option<Color> {
    let hex = raw.trim().strip_prefix('#');
    match hex {
        Some(h) if h.len() == 3 && h.chars().all(|c| c.is_ascii_hexdigit()) => {
            let mut channels = h
                .chars()
                .filter_map(|c| c.to_digit(16))
                .map(|d| (d * 17) as u8);
            Some(Color::Rgb(channels.next()?, channels.next()?, channels.next()?))
        }
        _ => Color::from_str(raw.trim()).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_stays_on_filters_until_panels_are_revealed() {
        assert_eq!(Focus::Filters.next(false), Focus::Filters);
        assert_eq!(Focus::Filters.next(true), Focus::Results);
        assert_eq!(Focus::Export.next(true), Focus::Filters);
        assert_eq!(Focus::Filters.prev(true), Focus::Export);
    }

    #[test]
    fn folder_only_options_hidden_for_zip() {
        let zip = ExportOptions::new(ExportFormat::Zip);
        assert!(!zip.folder_options_visible());
        assert_eq!(
            zip.visible_fields(false),
            vec![ExportField::Format, ExportField::RenameFiles, ExportField::ExportButton]
        );

        let folder = ExportOptions::new(ExportFormat::Folder);
        assert!(folder.folder_options_visible());
        assert!(folder.visible_fields(true).contains(&ExportField::SyncFolder));
        assert_eq!(folder.visible_fields(true).last(), Some(&ExportField::DownloadLink));
    }

    #[test]
    fn export_format_uses_backend_ids() {
        assert_eq!(serde_json::to_string(&ExportFormat::Zip).unwrap(), "\"zip\"");
        assert_eq!(serde_json::to_string(&ExportFormat::Folder).unwrap(), "\"folder\"");
    }

    #[test]
    fn theme_falls_back_when_unset() {
        let theme = Theme::default();
        assert_eq!(theme.on_surface_css(), "#111111");
        assert_eq!(theme.on_surface(), Color::Rgb(0x11, 0x11, 0x11));

        let themed = Theme { on_surface: Some(" #fff ".to_string()) };
        assert_eq!(themed.on_surface_css(), "#fff");
        assert_eq!(themed.on_surface(), Color::Rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn filter_fields_walk_in_order() {
        assert_eq!(FilterField::Rating.prev(), FilterField::Rating);
        assert_eq!(FilterField::Rating.next(), FilterField::Limit);
        assert_eq!(FilterField::SearchButton.next(), FilterField::SearchButton);
        assert!(FilterField::AddedBefore.is_text());
        assert!(!FilterField::Randomize.is_text());
    }
}
