//! Repository trait for short link data access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Link, LinkFilter, NewLink};
use crate::domain::errors::StoreError;

/// Repository interface for managing short links.
///
/// Every method is a potential suspension point. Callers never hold an
/// in-process lock across these calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Point lookup by short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on storage failures.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Inserts a new link with `clicks = 0` and no `last_clicked`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConstraintViolation`] if the code already exists.
    /// This must fail loudly: it is the final arbiter of code uniqueness.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Atomically sets `clicks = clicks + 1` and `last_clicked = now`.
    ///
    /// Returns `Ok(false)` when no link has this code.
    async fn increment_clicks_and_stamp(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Hard-deletes a link. Returns `Ok(false)` when no link has this code.
    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError>;

    /// Lists links newest first, applying the filter's search and pagination.
    async fn list(&self, filter: &LinkFilter) -> Result<Vec<Link>, StoreError>;

    /// Counts links matching the filter's search, ignoring pagination.
    async fn count(&self, filter: &LinkFilter) -> Result<i64, StoreError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), StoreError>;
}
