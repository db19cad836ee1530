// Event Service Library

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::config::Settings;
use crate::services::notify::Notifier;
use crate::store::{EventStore, UserStore};

pub use error::{ApiError, Result};

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub events: Arc<EventStore>,
    pub notifier: Notifier,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings, notifier: Notifier) -> Self {
        Self {
            users: Arc::new(UserStore::new()),
            events: Arc::new(EventStore::new()),
            notifier,
            settings: Arc::new(settings),
        }
    }
}
