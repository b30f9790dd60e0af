//! Search flow: form -> `POST /api/query` -> song list

use crate::model::LibraryApi;
use super::AppController;

impl<A: LibraryApi> AppController<A> {
    /// Run a search from the current form to completion. The state lock is
    /// not held while the request is in flight.
    pub async fn perform_search(&self) {
        let begun = self.state.lock().await.begin_search();
        let Some((token, request)) = begun else {
            tracing::debug!("Search already in flight");
            return;
        };

        tracing::debug!(?token, ?request, "Performing search");
        let result = self.api.query(&request).await;
        self.state.lock().await.finish_search(token, result);
    }

    /// Start a search in the background so the UI keeps drawing.
    pub fn spawn_search(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.perform_search().await;
        });
    }
}
