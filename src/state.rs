//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Instant;

use crate::application::services::{LinkService, RedirectDispatcher};
use crate::domain::repositories::LinkRepository;

/// Handles to the services, all sharing one store.
///
/// The store is the only shared mutable resource; everything else here is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub redirect_dispatcher: Arc<RedirectDispatcher<dyn LinkRepository>>,
    pub repository: Arc<dyn LinkRepository>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(repository: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository.clone(), base_url)),
            redirect_dispatcher: Arc::new(RedirectDispatcher::new(repository.clone())),
            repository,
            started_at: Instant::now(),
        }
    }
}
