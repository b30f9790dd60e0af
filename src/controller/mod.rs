//! Controller module - Application logic and event handling
//!
//! The controller owns the application state and the backend client, and
//! is the only place state changes in response to input or responses.
//!
//! - `input`: Key and mouse event handling
//! - `search`: Query flow
//! - `export`: Export and download flows

mod input;
mod search;
mod export;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{AppState, LibraryApi};

pub struct AppController<A: LibraryApi> {
    pub(crate) state: Arc<Mutex<AppState>>,
    pub(crate) api: Arc<A>,
    download_dir: PathBuf,
}

impl<A: LibraryApi> Clone for AppController<A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
            download_dir: self.download_dir.clone(),
        }
    }
}

impl<A: LibraryApi> AppController<A> {
    pub fn new(state: Arc<Mutex<AppState>>, api: Arc<A>, download_dir: PathBuf) -> Self {
        Self {
            state,
            api,
            download_dir,
        }
    }
}
