//! Export flow: selection -> `POST /api/export` -> optional download link

use std::path::{Path, PathBuf};

use crate::model::{ApiError, LibraryApi};
use super::AppController;

impl<A: LibraryApi> AppController<A> {
    /// Export the current selection. An empty selection only raises an
    /// alert and sends nothing.
    pub async fn perform_export(&self) {
        let begun = self.state.lock().await.begin_export();
        let Some((token, request)) = begun else {
            return;
        };

        tracing::debug!(
            ?token,
            songs = request.songs.len(),
            format = ?request.format,
            "Performing export"
        );
        let result = self.api.export(&request).await;
        self.state.lock().await.finish_export(token, result);
    }

    pub fn spawn_export(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.perform_export().await;
        });
    }

    /// Fetch the archive behind the download link into the download
    /// directory.
    pub async fn perform_download(&self) {
        let begun = self.state.lock().await.begin_download();
        let Some(filename) = begun else {
            return;
        };

        let result = self.save_archive(&filename).await;
        self.state.lock().await.finish_download(result);
    }

    pub fn spawn_download(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.perform_download().await;
        });
    }

    async fn save_archive(&self, filename: &str) -> Result<PathBuf, ApiError> {
        let path = archive_path(&self.download_dir, filename)?;
        let bytes = self.api.download(filename).await?;
        tokio::fs::create_dir_all(&self.download_dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Archive written");
        Ok(path)
    }
}

/// Target of a downloaded archive. The name must be a single plain path
/// component so the file always lands inside `download_dir`.
fn archive_path(download_dir: &Path, filename: &str) -> Result<PathBuf, ApiError> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
        && Path::new(filename).components().count() == 1;
    if !plain {
        return Err(ApiError::InvalidFilename(filename.to_string()));
    }
    Ok(download_dir.join(filename))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use serde_json::json;
    use tokio::sync::Mutex;

    use crate::controller::testing::FakeApi;
    use crate::controller::AppController;
    use crate::model::{
        AlertKind, ApiError, AppState, DownloadLink, ExportFormat, ExportResult, QueryResult,
        Song,
    };

    fn songs() -> Vec<Song> {
        serde_json::from_value(json!([
            {"title": "A", "rating": 20, "file_path": "/music/a.mp3"},
            {"title": "B", "rating": 80, "file_path": "/music/b.mp3"}
        ]))
        .unwrap()
    }

    async fn loaded(api: FakeApi, download_dir: std::path::PathBuf) -> AppController<FakeApi> {
        api.query_responses
            .lock()
            .unwrap()
            .push_back(Ok(QueryResult { songs: songs(), count: 2 }));
        let ctrl = AppController::new(
            Arc::new(Mutex::new(AppState::default())),
            Arc::new(api),
            download_dir,
        );
        ctrl.perform_search().await;
        ctrl
    }

    fn temp_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("music-export-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn empty_selection_issues_no_request() {
        let ctrl = loaded(FakeApi::default(), temp_dir("empty")).await;

        ctrl.perform_export().await;

        assert_eq!(ctrl.api.export_calls(), 0);
        let state = ctrl.state.lock().await;
        let alert = state.alerts.last().unwrap();
        assert_eq!(alert.message, "Please select at least one song to export.");
        assert_eq!(alert.kind, AlertKind::Error);
    }

    #[tokio::test]
    async fn zip_export_echoes_records_and_offers_download() {
        let api = FakeApi::default();
        api.push_export(Ok(ExportResult {
            export_path: "/srv/exports/export_20240101.zip".into(),
        }));
        let ctrl = loaded(api, temp_dir("zip")).await;
        {
            let mut state = ctrl.state.lock().await;
            state.toggle_selection(1);
            state.set_export_format(ExportFormat::Zip);
        }

        ctrl.perform_export().await;

        let sent = ctrl.api.exports.lock().unwrap()[0].clone();
        assert_eq!(sent.songs.len(), 1);
        assert_eq!(sent.songs[0].title().as_deref(), Some("B"));
        assert_eq!(sent.songs[0].get("file_path"), Some(&json!("/music/b.mp3")));
        assert_eq!(sent.format, ExportFormat::Zip);

        let state = ctrl.state.lock().await;
        assert_eq!(
            state.download_link,
            Some(DownloadLink::from_export_path("export_20240101.zip"))
        );
        assert_eq!(
            state.alerts.last().unwrap().message,
            "Successfully exported 1 songs!"
        );
    }

    #[tokio::test]
    async fn rejected_export_shows_server_message() {
        let api = FakeApi::default();
        api.push_export(Err(ApiError::Application("Export directory not writable".into())));
        let ctrl = loaded(api, temp_dir("rejected")).await;
        ctrl.state.lock().await.select_all();

        ctrl.perform_export().await;

        let state = ctrl.state.lock().await;
        assert!(state.download_link.is_none());
        assert!(!state.is_exporting());
        assert_eq!(
            state.alerts.last().unwrap().message,
            "Export error: Export directory not writable"
        );
    }

    #[tokio::test]
    async fn download_writes_archive_to_download_dir() {
        let dir = temp_dir("download");
        let api = FakeApi {
            archive: b"PK\x03\x04".to_vec(),
            ..FakeApi::default()
        };
        let ctrl = AppController::new(
            Arc::new(Mutex::new(AppState::default())),
            Arc::new(api),
            dir.clone(),
        );
        ctrl.state.lock().await.download_link =
            Some(DownloadLink::from_export_path("/exports/export_1.zip"));

        ctrl.perform_download().await;

        assert_eq!(ctrl.api.downloads.load(Ordering::SeqCst), 1);
        let written = tokio::fs::read(dir.join("export_1.zip")).await.unwrap();
        assert_eq!(written, b"PK\x03\x04");
        assert_eq!(ctrl.state.lock().await.alerts.last().unwrap().kind, AlertKind::Success);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn unsafe_archive_names_are_refused() {
        let dir = temp_dir("unsafe");
        for export_path in ["/exports/..", "C:\\exports\\..\\evil.zip", "/exports/"] {
            let ctrl = AppController::new(
                Arc::new(Mutex::new(AppState::default())),
                Arc::new(FakeApi::default()),
                dir.clone(),
            );
            ctrl.state.lock().await.download_link = Some(DownloadLink::from_export_path(export_path));

            ctrl.perform_download().await;

            assert_eq!(ctrl.api.downloads.load(Ordering::SeqCst), 0);
            let state = ctrl.state.lock().await;
            let alert = state.alerts.last().unwrap();
            assert_eq!(alert.kind, AlertKind::Error);
            assert!(alert.message.starts_with("Download error: invalid archive name"));
            assert!(!state.is_downloading());
        }
    }

    #[test]
    fn archive_path_stays_in_download_dir() {
        let dir = std::path::Path::new("/downloads");
        assert_eq!(
            super::archive_path(dir, "export_1.zip").unwrap(),
            dir.join("export_1.zip")
        );
        for name in ["", ".", "..", "a/b.zip", "a\\b.zip"] {
            assert!(super::archive_path(dir, name).is_err(), "{name:?} accepted");
        }
    }

    #[tokio::test]
    async fn download_without_link_does_nothing() {
        let ctrl = AppController::new(
            Arc::new(Mutex::new(AppState::default())),
            Arc::new(FakeApi::default()),
            temp_dir("nolink"),
        );

        ctrl.perform_download().await;

        assert_eq!(ctrl.api.downloads.load(Ordering::SeqCst), 0);
        assert!(ctrl.state.lock().await.alerts.is_empty());
    }
}
