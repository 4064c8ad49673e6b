#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use tinylink::domain::repositories::LinkRepository;
use tinylink::infrastructure::persistence::MemoryLinkRepository;
use tinylink::routes::build_router;
use tinylink::state::AppState;

pub const BASE_URL: &str = "http://sho.rt";

pub fn create_test_state() -> AppState {
    create_state_with(Arc::new(MemoryLinkRepository::new()))
}

pub fn create_state_with(repository: Arc<dyn LinkRepository>) -> AppState {
    AppState::new(repository, BASE_URL)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

pub async fn create_test_link(state: &AppState, code: &str, url: &str) {
    state
        .link_service
        .create_link(url, Some(code))
        .await
        .unwrap();
}
