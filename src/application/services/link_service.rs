//! Link creation, lookup, listing and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::application::services::CodeAllocator;
use crate::domain::entities::{Link, LinkFilter, NewLink};
use crate::domain::errors::AllocationError;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_target_url;

/// Maximum number of create attempts when the store rejects a generated code.
pub const MAX_COMMIT_ATTEMPTS: usize = 3;

/// One page of links plus the total number of matches.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub items: Vec<Link>,
    pub total: i64,
}

/// Service for creating and managing shortened links.
///
/// Creation validates the target URL, asks the [`CodeAllocator`] for a code and
/// commits it once. The store's unique constraint is the final word on
/// collisions: a rejected generated code is retried with a fresh candidate, a
/// rejected requested code is reported as a conflict.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    allocator: CodeAllocator<L>,
    base_url: String,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public prefix for short URLs; a trailing slash is ignored.
    pub fn new(link_repository: Arc<L>, base_url: impl Into<String>) -> Self {
        let allocator = CodeAllocator::new(link_repository.clone());
        Self::with_allocator(link_repository, allocator, base_url)
    }

    /// Creates a service around an existing allocator.
    pub fn with_allocator(
        link_repository: Arc<L>,
        allocator: CodeAllocator<L>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            allocator,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link.
    ///
    /// An empty `requested_code` counts as no code requested.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - the URL is missing, malformed or not `http`/`https`
    /// - the requested code breaks the format contract
    ///
    /// Returns [`AppError::Conflict`] if the requested code already exists.
    ///
    /// Returns [`AppError::Unavailable`] if no free code could be generated.
    pub async fn create_link(
        &self,
        target_url: &str,
        requested_code: Option<&str>,
    ) -> Result<Link, AppError> {
        validate_target_url(target_url)?;

        let requested_code = requested_code.filter(|c| !c.is_empty());

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let code = self.allocator.allocate(requested_code).await?;

            let new_link = NewLink {
                code: code.clone(),
                target_url: target_url.to_string(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    metrics::counter!("links_created_total").increment(1);
                    info!(code = %link.code, id = link.id, "Link created");
                    return Ok(link);
                }
                Err(e) if !e.is_constraint_violation() => return Err(e.into()),
                Err(_) if requested_code.is_some() => {
                    return Err(AllocationError::CodeConflict { code }.into());
                }
                Err(_) => {
                    metrics::counter!("code_collisions_total").increment(1);
                    warn!(code = %code, attempt, "Generated code lost a concurrent insert, retrying");
                }
            }
        }

        Err(AllocationError::AllocationExhausted {
            attempts: MAX_COMMIT_ATTEMPTS,
        }
        .into())
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(AppError::link_not_found)
    }

    /// Lists links newest first with optional search.
    pub async fn list_links(&self, filter: LinkFilter) -> Result<LinkPage, AppError> {
        let items = self.link_repository.list(&filter).await?;
        let total = self.link_repository.count(&filter).await?;

        Ok(LinkPage { items, total })
    }

    /// Permanently deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !self.link_repository.delete_by_code(code).await? {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "code": code }),
            ));
        }

        info!(code, "Link deleted");
        Ok(())
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
