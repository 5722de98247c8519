//! Shared application state for all routes. Built once at startup and injected into the router.

use crate::config::Settings;
use crate::error::AppError;
use crate::github::GithubClient;
use crate::store::SharedStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub github: GithubClient,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: SharedStore, settings: Settings) -> Result<Self, AppError> {
        Ok(AppState {
            store,
            github: GithubClient::new(&settings)?,
            settings: Arc::new(settings),
        })
    }
}
