//! Model module - Application state and data types
//!
//! - `types`: Focus, form fields, export options, alert kinds, theme
//! - `content`: Song records and the export download link
//! - `rating`: Star display rule and the rating picker
//! - `filters`: Filter form and its coercion into a query
//! - `alerts`: Auto-expiring alert queue
//! - `api_client`: Backend HTTP client
//! - `app_model`: The application state the controller owns

mod types;
mod content;
mod rating;
mod filters;
mod alerts;
mod api_client;
mod app_model;

pub use types::{
    css_color, AlertKind, ExportField, ExportFormat, ExportOptions, FilterField, Focus, Theme,
};

pub use content::{DownloadLink, Song};

pub use rating::{star_pattern, RatingPicker, StarState, PICKER_VALUES};

pub use filters::FilterForm;

pub use alerts::Alert;

pub use api_client::{ApiError, HttpLibraryApi, LibraryApi};

#[cfg(test)]
pub use api_client::{ExportRequest, ExportResult, QueryRequest, QueryResult};

pub use app_model::{AppState, HitMap};
