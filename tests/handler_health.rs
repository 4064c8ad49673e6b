mod common;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tinylink::domain::entities::{Link, LinkFilter, NewLink};
use tinylink::domain::errors::StoreError;
use tinylink::domain::repositories::LinkRepository;

/// Store whose every call fails, as if the database were down.
struct UnreachableRepository;

fn unreachable() -> StoreError {
    StoreError::backend(std::io::Error::other("connection refused"))
}

#[async_trait]
impl LinkRepository for UnreachableRepository {
    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, StoreError> {
        Err(unreachable())
    }

    async fn create(&self, _new_link: NewLink) -> Result<Link, StoreError> {
        Err(unreachable())
    }

    async fn increment_clicks_and_stamp(
        &self,
        _code: &str,
        _now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Err(unreachable())
    }

    async fn delete_by_code(&self, _code: &str) -> Result<bool, StoreError> {
        Err(unreachable())
    }

    async fn list(&self, _filter: &LinkFilter) -> Result<Vec<Link>, StoreError> {
        Err(unreachable())
    }

    async fn count(&self, _filter: &LinkFilter) -> Result<i64, StoreError> {
        Err(unreachable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable())
    }
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = common::create_test_server(common::create_test_state());

    let response = server.get("/healthz").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["uptime_seconds"].is_u64());
    assert_eq!(json["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let state = common::create_state_with(Arc::new(UnreachableRepository));
    let server = common::create_test_server(state);

    let response = server.get("/healthz").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

#[tokio::test]
async fn test_store_failures_do_not_leak_details() {
    let state = common::create_state_with(Arc::new(UnreachableRepository));
    let server = common::create_test_server(state);

    let response = server.get("/abc123").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Link not found"
    );

    let response = server.get("/api/links/abc123").await;
    assert_eq!(response.status_code(), 500);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(json["error"]["message"], "Database error");
    assert!(!json.to_string().contains("connection refused"));
}
