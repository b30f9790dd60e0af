//! Filter form state and its coercion into a query request

use chrono::{Duration, Local, NaiveDate, TimeZone};

use super::api_client::QueryRequest;
use super::types::FilterField;

/// Raw filter form, exactly as typed.
///
/// Nothing is validated here; fields are coerced only when a search is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterForm {
    /// Backing value of the rating picker
    pub rating: String,
    pub limit: String,
    pub exclude_genres: String,
    pub dyn_ps_val: String,
    pub album_limit: String,
    pub randomize: bool,
    pub added_before: String,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self {
            rating: "40".to_string(),
            limit: "50".to_string(),
            exclude_genres: String::new(),
            dyn_ps_val: "0".to_string(),
            album_limit: "0".to_string(),
            randomize: false,
            added_before: String::new(),
        }
    }
}

impl FilterForm {
    pub fn text(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Limit => Some(&self.limit),
            FilterField::ExcludeGenres => Some(&self.exclude_genres),
            FilterField::DynPsVal => Some(&self.dyn_ps_val),
            FilterField::AlbumLimit => Some(&self.album_limit),
            FilterField::AddedBefore => Some(&self.added_before),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, field: FilterField) -> Option<&mut String> {
        match field {
            FilterField::Limit => Some(&mut self.limit),
            FilterField::ExcludeGenres => Some(&mut self.exclude_genres),
            FilterField::DynPsVal => Some(&mut self.dyn_ps_val),
            FilterField::AlbumLimit => Some(&mut self.album_limit),
            FilterField::AddedBefore => Some(&mut self.added_before),
            _ => None,
        }
    }

    /// Coerce the form into the body of `POST /api/query`.
    pub fn to_query_request(&self) -> QueryRequest {
        QueryRequest {
            rating: parse_int_prefix(&self.rating),
            limit: parse_int_prefix(&self.limit),
            exclude_genres: split_genres(&self.exclude_genres),
            dyn_ps_val: zero_as_unset(parse_int_prefix(&self.dyn_ps_val)),
            album_limit: zero_as_unset(parse_int_prefix(&self.album_limit)),
            randomize: self.randomize,
            added_before: local_midnight_timestamp(&self.added_before),
        }
    }
}

/// Leading-integer parse: skips leading whitespace, accepts an optional sign
/// and as many digits as follow. Anything without digits is `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    rest[..digits_end].parse::<i64>().ok().map(|v| v * sign)
}

fn zero_as_unset(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

/// Comma separated genres, trimmed, empties dropped.
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unix timestamp (whole seconds) of local midnight on a `YYYY-MM-DD` date.
///
/// Blank or unparseable input yields `None`. When midnight does not exist
/// locally (DST gap) the first valid instant an hour later is used.
pub fn local_midnight_timestamp(date: &str) -> Option<i64> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;

    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_follows_leading_digits() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  12abc"), Some(12));
        assert_eq!(parse_int_prefix("-7"), Some(-7));
        assert_eq!(parse_int_prefix("+3"), Some(3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn genres_are_trimmed_and_empties_dropped() {
        assert_eq!(
            split_genres(" Rock, ,Jazz ,, Spoken Word "),
            vec!["Rock", "Jazz", "Spoken Word"]
        );
        assert!(split_genres("").is_empty());
    }

    #[test]
    fn zero_thresholds_are_sent_as_null() {
        let form = FilterForm {
            dyn_ps_val: "0".to_string(),
            album_limit: "0".to_string(),
            ..FilterForm::default()
        };
        let request = form.to_query_request();
        assert_eq!(request.dyn_ps_val, None);
        assert_eq!(request.album_limit, None);

        let form = FilterForm {
            dyn_ps_val: "5".to_string(),
            album_limit: "2".to_string(),
            ..FilterForm::default()
        };
        let request = form.to_query_request();
        assert_eq!(request.dyn_ps_val, Some(5));
        assert_eq!(request.album_limit, Some(2));
    }

    #[test]
    fn request_serializes_with_backend_field_names() {
        let form = FilterForm {
            exclude_genres: "Podcast".to_string(),
            randomize: true,
            ..FilterForm::default()
        };
        let body = serde_json::to_value(form.to_query_request()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "rating": 40,
                "limit": 50,
                "exclude_genres": ["Podcast"],
                "dyn_ps_val": null,
                "album_limit": null,
                "randomize": true,
                "added_before": null
            })
        );
    }

    #[test]
    fn non_numeric_limit_goes_out_as_null() {
        let form = FilterForm {
            limit: "lots".to_string(),
            ..FilterForm::default()
        };
        assert_eq!(form.to_query_request().limit, None);
    }

    #[test]
    fn added_before_is_local_midnight() {
        let expected = Local
            .with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
            .earliest()
            .unwrap()
            .timestamp();
        assert_eq!(local_midnight_timestamp("2024-01-15"), Some(expected));
    }

    #[test]
    fn blank_or_invalid_date_is_unset() {
        assert_eq!(local_midnight_timestamp(""), None);
        assert_eq!(local_midnight_timestamp("   "), None);
        assert_eq!(local_midnight_timestamp("15/01/2024"), None);
        assert_eq!(local_midnight_timestamp("2024-02-30"), None);
    }
}
