//! HTTP client for the music export backend
//!
//! The backend answers every call with a JSON envelope carrying `success`
//! and either the payload or an `error` message. Envelopes with
//! `success: false` become [`ApiError::Application`]; anything that never
//! produced a readable envelope becomes [`ApiError::Transport`].

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::content::Song;
use super::types::ExportFormat;
use crate::{log_api_request, log_api_result};

/// Backend client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Application(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archive name '{0}'")]
    InvalidFilename(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// Body of `POST /api/query`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub rating: Option<i64>,
    pub limit: Option<i64>,
    pub exclude_genres: Vec<String>,
    pub dyn_ps_val: Option<i64>,
    pub album_limit: Option<i64>,
    pub randomize: bool,
    pub added_before: Option<i64>,
}

/// Body of `POST /api/export`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportRequest {
    pub songs: Vec<Song>,
    pub format: ExportFormat,
    pub embed_covers: bool,
    pub rename_files: bool,
    pub sync_folder: bool,
}

/// Successful query payload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    pub songs: Vec<Song>,
    pub count: usize,
}

/// Successful export payload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportResult {
    pub export_path: String,
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    success: bool,
    #[serde(default)]
    songs: Vec<Song>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportEnvelope {
    success: bool,
    #[serde(default)]
    export_path: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

const UNKNOWN_ERROR: &str = "Unknown error";

impl QueryEnvelope {
    fn into_result(self) -> Result<QueryResult, ApiError> {
        if !self.success {
            return Err(ApiError::Application(
                self.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }
        let count = self.count.unwrap_or(self.songs.len());
        Ok(QueryResult {
            songs: self.songs,
            count,
        })
    }
}

impl ExportEnvelope {
    fn into_result(self) -> Result<ExportResult, ApiError> {
        if !self.success {
            return Err(ApiError::Application(
                self.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }
        Ok(ExportResult {
            export_path: self.export_path.unwrap_or_default(),
        })
    }
}

/// Operations the UI needs from the backend
pub trait LibraryApi: Send + Sync + 'static {
    fn query(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResult, ApiError>> + Send;

    fn export(
        &self,
        request: &ExportRequest,
    ) -> impl Future<Output = Result<ExportResult, ApiError>> + Send;

    /// Fetch the archive behind a download link.
    fn download(&self, filename: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

/// reqwest-backed implementation of [`LibraryApi`]
#[derive(Clone)]
pub struct HttpLibraryApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLibraryApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and decode the envelope, whatever the status code.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        serde_json::from_slice::<R>(&bytes).map_err(|e| {
            tracing::debug!(path, %status, error = %e, "Undecodable response body");
            ApiError::Transport(format!("Invalid response from server (HTTP {}): {}", status, e))
        })
    }

    async fn fetch_archive(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/download/{}", filename)))
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(ApiError::Application(message));
        }
        Ok(bytes.to_vec())
    }
}

impl LibraryApi for HttpLibraryApi {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResult, ApiError> {
        log_api_request!(
            "query",
            rating = ?request.rating,
            limit = ?request.limit,
            randomize = request.randomize
        );
        let result = self
            .post_json::<_, QueryEnvelope>("/api/query", request)
            .await
            .and_then(QueryEnvelope::into_result);
        log_api_result!("query", result);
        result
    }

    async fn export(&self, request: &ExportRequest) -> Result<ExportResult, ApiError> {
        log_api_request!(
            "export",
            songs = request.songs.len(),
            format = ?request.format
        );
        let result = self
            .post_json::<_, ExportEnvelope>("/api/export", request)
            .await
            .and_then(ExportEnvelope::into_result);
        log_api_result!("export", result);
        result
    }

    async fn download(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        log_api_request!("download", filename);
        let result = self.fetch_archive(filename).await;
        log_api_result!("download", result);
        result
    }
}
