//! Song records returned by the library and the export download link

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A song as sent by the query endpoint.
///
/// The record is kept exactly as received so it can be handed back to the
/// export endpoint unchanged. Displayed fields are read leniently: a value
/// of an unexpected type shows as missing instead of failing the whole
/// result list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Song {
    raw: Value,
}

impl From<Value> for Song {
    fn from(raw: Value) -> Self {
        Self { raw }
    }
}

impl Song {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Display text of a field. Missing, null, empty and zero values count
    /// as absent.
    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }

    /// Numeric value of a field; numeric strings are accepted.
    fn number(&self, key: &str) -> Option<f64> {
        let value = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    pub fn title(&self) -> Option<String> {
        self.text("title")
    }

    pub fn artist(&self) -> Option<String> {
        self.text("artist")
    }

    pub fn album(&self) -> Option<String> {
        self.text("album")
    }

    pub fn genre(&self) -> Option<String> {
        self.text("genre")
    }

    pub fn cover_url(&self) -> Option<String> {
        self.text("cover_url")
    }

    /// Rating on the 0..=100 scale, rounded down. Absent or non-numeric
    /// ratings read as 0.
    pub fn rating(&self) -> i64 {
        self.number("rating").map(|r| r.floor() as i64).unwrap_or(0)
    }

    /// Dynamic counter as shown, when it is set and non-zero.
    pub fn dynamic_counter(&self) -> Option<String> {
        match self.get("dyn_ps_val")? {
            Value::Null => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Link to a finished archive export
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadLink {
    pub filename: String,
    pub href: String,
}

impl DownloadLink {
    pub const LABEL: &'static str = "Download Export";

    /// Build the link from the server-side export path. The filename is the
    /// last `/`-separated segment, used verbatim.
    pub fn from_export_path(export_path: &str) -> Self {
        let filename = export_path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            href: format!("/api/download/{}", filename),
            filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_is_echoed_back_unchanged() {
        let raw = json!({
            "title": "A",
            "rating": 50.0,
            "dyn_ps_val": null,
            "url": "/music/a.flac",
            "filename": "a.flac"
        });
        let song: Song = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(song.title().as_deref(), Some("A"));
        assert_eq!(song.get("url"), Some(&json!("/music/a.flac")));
        assert_eq!(serde_json::to_value(&song).unwrap(), raw);
    }

    #[test]
    fn missing_fields_read_as_absent() {
        let song = Song::from(json!({}));
        assert_eq!(song.rating(), 0);
        assert_eq!(song.dynamic_counter(), None);
        assert_eq!(song.title(), None);
    }

    #[test]
    fn mixed_types_are_read_leniently() {
        let song = Song::from(json!({
            "title": 1999,
            "artist": "",
            "album": {"name": "x"},
            "genre": " Jazz ",
            "rating": "75",
            "dyn_ps_val": 2.5
        }));
        assert_eq!(song.title().as_deref(), Some("1999"));
        assert_eq!(song.artist(), None);
        assert_eq!(song.album(), None);
        assert_eq!(song.genre().as_deref(), Some(" Jazz "));
        assert_eq!(song.rating(), 75);
        assert_eq!(song.dynamic_counter().as_deref(), Some("2.5"));

        assert_eq!(Song::from(json!({"rating": 59.5})).rating(), 59);
        assert_eq!(Song::from(json!({"rating": [1]})).rating(), 0);
        assert_eq!(Song::from(json!("not an object")).title(), None);
    }

    #[test]
    fn zero_dynamic_counter_is_hidden() {
        assert_eq!(Song::from(json!({"dyn_ps_val": 0})).dynamic_counter(), None);
        assert_eq!(Song::from(json!({"dyn_ps_val": 0.0})).dynamic_counter(), None);
        assert_eq!(Song::from(json!({"dyn_ps_val": 7})).dynamic_counter().as_deref(), Some("7"));
    }

    #[test]
    fn download_link_uses_last_path_segment() {
        let link = DownloadLink::from_export_path("/tmp/x/export_123.zip");
        assert_eq!(link.filename, "export_123.zip");
        assert_eq!(link.href, "/api/download/export_123.zip");

        let bare = DownloadLink::from_export_path("music_export.zip");
        assert_eq!(bare.filename, "music_export.zip");
    }
}
