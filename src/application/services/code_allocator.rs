//! Short code allocation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::errors::AllocationError;
use crate::domain::repositories::LinkRepository;
use crate::utils::code_generator::{generate_code, is_valid_code};

/// Maximum number of generated candidates checked before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Produces a code that is free at the moment of the check.
///
/// The lookup is an optimistic pre-check. Two concurrent requests can both see
/// the same code as free; the store's unique constraint decides which commit
/// wins (see [`crate::application::services::LinkService::create_link`]).
pub struct CodeAllocator<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    generator: fn() -> String,
}

impl<L: LinkRepository + ?Sized> CodeAllocator<L> {
    /// Creates an allocator that draws random candidates from [`generate_code`].
    pub fn new(repository: Arc<L>) -> Self {
        Self::with_generator(repository, generate_code)
    }

    /// Creates an allocator with a custom candidate generator.
    pub fn with_generator(repository: Arc<L>, generator: fn() -> String) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Validates a requested code or generates a fresh one.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidFormat`] if `requested` fails the format contract
    /// - [`AllocationError::CodeConflict`] if `requested` is already taken
    /// - [`AllocationError::AllocationExhausted`] if every generated candidate collided
    /// - [`AllocationError::Store`] if a lookup fails
    pub async fn allocate(&self, requested: Option<&str>) -> Result<String, AllocationError> {
        match requested {
            Some(code) => self.claim_requested(code).await,
            None => self.generate_unique().await,
        }
    }

    async fn claim_requested(&self, code: &str) -> Result<String, AllocationError> {
        if !is_valid_code(code) {
            return Err(AllocationError::InvalidFormat {
                code: code.to_string(),
            });
        }

        if self.repository.find_by_code(code).await?.is_some() {
            return Err(AllocationError::CodeConflict {
                code: code.to_string(),
            });
        }

        Ok(code.to_string())
    }

    async fn generate_unique(&self) -> Result<String, AllocationError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let candidate = (self.generator)();

            if self.repository.find_by_code(&candidate).await?.is_none() {
                debug!(code = %candidate, attempt, "Allocated generated code");
                return Ok(candidate);
            }

            metrics::counter!("code_collisions_total").increment(1);
            warn!(code = %candidate, attempt, "Generated code already taken");
        }

        Err(AllocationError::AllocationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}
