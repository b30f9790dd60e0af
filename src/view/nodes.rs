//! View-model nodes
//!
//! Everything the screen shows is first turned into plain data here, from
//! state passed in by reference. The ratatui painters only lay these nodes
//! out, so the rendering rules can be tested without a terminal.

use std::collections::BTreeSet;

use crate::model::{
    star_pattern, AppState, DownloadLink, ExportField, ExportFormat, RatingPicker, Song,
    StarState, Theme, PICKER_VALUES,
};

pub const DEFAULT_COVER: &str = "/static/default-cover.png";
/// Fill color of the stars on song cards
pub const CARD_STAR_COLOR: &str = "#6200ee";

/// One star glyph
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarIcon {
    pub state: StarState,
    pub color: String,
}

impl StarIcon {
    fn new(state: StarState, color: &str) -> Self {
        Self {
            state,
            color: color.to_string(),
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self.state {
            StarState::Full => "★",
            StarState::Half => "⯪",
            StarState::Empty => "☆",
        }
    }
}

/// A rendered song row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongCard {
    pub cover_src: String,
    pub has_cover: bool,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub dynamic_counter: Option<String>,
    pub stars: Vec<StarIcon>,
    pub selected: bool,
}

impl SongCard {
    pub fn details(&self) -> String {
        let mut details = format!(
            "Artist: {} | Album: {} | Genre: {}",
            self.artist, self.album, self.genre
        );
        if let Some(counter) = &self.dynamic_counter {
            details.push_str(&format!(" | Dynamic Counter: {}", counter));
        }
        details
    }

    pub fn stars_text(&self) -> String {
        self.stars.iter().map(StarIcon::glyph).collect::<Vec<_>>().join(" ")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsNode {
    pub total: usize,
    pub selected: usize,
}

impl StatsNode {
    pub fn total_text(&self) -> String {
        format!("Total: {}", self.total)
    }

    pub fn selected_text(&self) -> String {
        format!("Selected: {}", self.selected)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongListView {
    pub cards: Vec<SongCard>,
    pub stats: StatsNode,
}

fn or_unknown(value: Option<String>, what: &str) -> String {
    value.unwrap_or_else(|| format!("Unknown {}", what))
}

/// Cover URL, or the default cover when it is blank or cannot be loaded.
fn cover_source(cover_url: Option<String>) -> (String, bool) {
    match cover_url {
        Some(url) if url.starts_with('/') || reqwest::Url::parse(&url).is_ok() => (url, true),
        _ => (DEFAULT_COVER.to_string(), false),
    }
}

/// Build the whole song list from scratch.
pub fn render_song_list(songs: &[Song], selected: &BTreeSet<usize>) -> SongListView {
    let cards = songs
        .iter()
        .enumerate()
        .map(|(index, song)| {
            let (cover_src, has_cover) = cover_source(song.cover_url());
            let stars = star_pattern(song.rating())
                .iter()
                .map(|state| StarIcon::new(*state, CARD_STAR_COLOR))
                .collect();
            SongCard {
                cover_src,
                has_cover,
                title: or_unknown(song.title(), "Title"),
                artist: or_unknown(song.artist(), "Artist"),
                album: or_unknown(song.album(), "Album"),
                genre: or_unknown(song.genre(), "Genre"),
                dynamic_counter: song.dynamic_counter(),
                stars,
                selected: selected.contains(&index),
            }
        })
        .collect();

    SongListView {
        cards,
        stats: StatsNode {
            total: songs.len(),
            selected: selected.len(),
        },
    }
}

/// One clickable picker icon
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerIcon {
    pub value: u8,
    pub icon: StarIcon,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerView {
    /// The "no rating" icon, value 0, always drawn as an outline
    pub clear: PickerIcon,
    pub stars: Vec<PickerIcon>,
    pub committed: u8,
    pub preview: u8,
    pub previewing: bool,
}

impl PickerView {
    pub fn icons(&self) -> impl Iterator<Item = &PickerIcon> {
        std::iter::once(&self.clear).chain(self.stars.iter())
    }
}

/// Build the picker for its current preview value. The color is looked up
/// from the theme on every call.
pub fn render_rating_picker(picker: &RatingPicker, theme: &Theme) -> PickerView {
    let color = theme.on_surface_css();
    let stars = picker
        .stars()
        .iter()
        .zip(PICKER_VALUES.iter().skip(1))
        .map(|(state, value)| PickerIcon {
            value: *value,
            icon: StarIcon::new(*state, color),
        })
        .collect();

    PickerView {
        clear: PickerIcon {
            value: 0,
            icon: StarIcon::new(StarState::Empty, color),
        },
        stars,
        committed: picker.committed(),
        preview: picker.preview(),
        previewing: picker.is_previewing(),
    }
}

/// A checkbox row of the export panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRow {
    pub field: ExportField,
    pub label: &'static str,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportPanelView {
    pub format: ExportFormat,
    pub options: Vec<OptionRow>,
    pub button_label: &'static str,
    pub busy: bool,
    pub download_link: Option<DownloadLink>,
}

/// Export panel, honoring the folder-only visibility rule.
pub fn render_export_panel(state: &AppState) -> ExportPanelView {
    let options = state.export_options;
    let rows = options
        .visible_fields(false)
        .into_iter()
        .filter_map(|field| {
            let (label, checked) = match field {
                ExportField::EmbedCovers => ("Embed covers", options.embed_covers),
                ExportField::RenameFiles => ("Rename files (Artist - Title)", options.rename_files),
                ExportField::SyncFolder => ("Sync folder", options.sync_folder),
                _ => return None,
            };
            Some(OptionRow { field, label, checked })
        })
        .collect();

    ExportPanelView {
        format: options.format,
        options: rows,
        button_label: state.export_label(),
        busy: state.is_exporting(),
        download_link: state.download_link.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExportOptions, FilterForm, QueryResult};
    use serde_json::json;

    fn songs_from(value: serde_json::Value) -> Vec<Song> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn single_song_scenario() {
        let mut state = AppState::default();
        let (token, _) = state.begin_search().unwrap();
        let songs = songs_from(json!([{"title": "A", "rating": 50, "dyn_ps_val": null}]));
        state.finish_search(token, Ok(QueryResult { songs, count: 1 }));

        let view = render_song_list(state.songs(), state.selection());
        assert_eq!(view.cards.len(), 1);
        let states: Vec<_> = view.cards[0].stars.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![StarState::Full, StarState::Full, StarState::Half, StarState::Empty, StarState::Empty]
        );
        assert_eq!(view.stats.total_text(), "Total: 1");
        assert_eq!(view.stats.selected_text(), "Selected: 0");
    }

    #[test]
    fn missing_fields_use_unknown_fallbacks() {
        let songs = songs_from(json!([{"title": "", "artist": null}]));
        let card = &render_song_list(&songs, &BTreeSet::new()).cards[0];
        assert_eq!(card.title, "Unknown Title");
        assert_eq!(card.artist, "Unknown Artist");
        assert_eq!(card.album, "Unknown Album");
        assert_eq!(card.genre, "Unknown Genre");
        assert_eq!(card.details(), "Artist: Unknown Artist | Album: Unknown Album | Genre: Unknown Genre");
    }

    #[test]
    fn dynamic_counter_only_when_non_zero() {
        let songs = songs_from(json!([
            {"title": "a", "dyn_ps_val": 0},
            {"title": "b", "dyn_ps_val": null},
            {"title": "c", "dyn_ps_val": 12}
        ]));
        let view = render_song_list(&songs, &BTreeSet::new());
        assert!(!view.cards[0].details().contains("Dynamic Counter"));
        assert!(!view.cards[1].details().contains("Dynamic Counter"));
        assert!(view.cards[2].details().ends_with("| Dynamic Counter: 12"));
    }

    #[test]
    fn cover_falls_back_for_blank_or_malformed_urls() {
        let songs = songs_from(json!([
            {"cover_url": "/api/cover?path=/music/a.flac"},
            {"cover_url": "http://host/cover.jpg"},
            {"cover_url": ""},
            {"cover_url": "not a url"},
            {}
        ]));
        let view = render_song_list(&songs, &BTreeSet::new());
        assert!(view.cards[0].has_cover);
        assert!(view.cards[1].has_cover);
        for card in &view.cards[2..] {
            assert!(!card.has_cover);
            assert_eq!(card.cover_src, DEFAULT_COVER);
        }
    }

    #[test]
    fn selected_rows_are_marked() {
        let songs = songs_from(json!([{}, {}, {}]));
        let selected: BTreeSet<usize> = [0, 2].into_iter().collect();
        let view = render_song_list(&songs, &selected);
        let marks: Vec<_> = view.cards.iter().map(|c| c.selected).collect();
        assert_eq!(marks, vec![true, false, true]);
        assert_eq!(view.stats.selected, 2);
    }

    #[test]
    fn values_are_shown_as_sent() {
        let songs = songs_from(json!([
            {"title": "  ", "artist": " Miles Davis ", "album": 0, "genre": 1959, "rating": 50.0},
            {"title": "ok", "rating": 40}
        ]));
        let view = render_song_list(&songs, &BTreeSet::new());
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].title, "  ");
        assert_eq!(view.cards[0].artist, " Miles Davis ");
        assert_eq!(view.cards[0].album, "Unknown Album");
        assert_eq!(view.cards[0].genre, "1959");
        assert_eq!(view.cards[0].stars_text(), "★ ★ ⯪ ☆ ☆");
    }

    #[test]
    fn picker_has_clear_icon_and_five_stars() {
        let mut picker = RatingPicker::new(40);
        picker.hover(70);
        let view = render_rating_picker(&picker, &Theme::default());

        let values: Vec<_> = view.icons().map(|i| i.value).collect();
        assert_eq!(values, vec![0, 20, 40, 60, 80, 100]);
        assert_eq!(view.clear.icon.state, StarState::Empty);
        assert_eq!(view.stars[3].icon.state, StarState::Half);
        assert_eq!(view.stars[0].icon.color, "#111111");
        assert_eq!((view.committed, view.preview), (40, 70));
        assert!(view.previewing);
    }

    #[test]
    fn picker_color_follows_theme() {
        let theme = Theme { on_surface: Some("#e0e0e0".to_string()) };
        let view = render_rating_picker(&RatingPicker::new(20), &theme);
        assert!(view.icons().all(|i| i.icon.color == "#e0e0e0"));
    }

    #[test]
    fn export_panel_hides_folder_options_for_zip() {
        let mut state = AppState::new(
            FilterForm::default(),
            ExportOptions::new(ExportFormat::Zip),
            Theme::default(),
        );
        let labels: Vec<_> = render_export_panel(&state).options.iter().map(|o| o.field).collect();
        assert_eq!(labels, vec![ExportField::RenameFiles]);

        state.set_export_format(ExportFormat::Folder);
        let fields: Vec<_> = render_export_panel(&state).options.iter().map(|o| o.field).collect();
        assert_eq!(
            fields,
            vec![ExportField::EmbedCovers, ExportField::RenameFiles, ExportField::SyncFolder]
        );
    }
}
