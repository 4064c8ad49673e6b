//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::entities::{Link, LinkFilter, NewLink};
use crate::domain::errors::StoreError;
use crate::domain::repositories::LinkRepository;

#[derive(Default)]
struct MemoryState {
    links: HashMap<String, Link>,
    next_id: i64,
}

/// Process-local link store.
///
/// Each operation runs as one critical section under a mutex, which gives the
/// same guarantees the PostgreSQL store gets from its unique constraint and
/// in-place increment. The lock is never held across an `.await`.
#[derive(Default)]
pub struct MemoryLinkRepository {
    state: Mutex<MemoryState>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> Result<T, StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::backend(std::io::Error::other("memory store lock poisoned")))?;

        Ok(f(&mut state))
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        self.with_state(|state| state.links.get(code).cloned())
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        self.with_state(|state| {
            if state.links.contains_key(&new_link.code) {
                return Err(StoreError::ConstraintViolation {
                    constraint: Some("links_code_key".to_string()),
                });
            }

            state.next_id += 1;
            let link = Link::new(
                state.next_id,
                new_link.code,
                new_link.target_url,
                0,
                None,
                Utc::now(),
            );
            state.links.insert(link.code.clone(), link.clone());

            Ok(link)
        })?
    }

    async fn increment_clicks_and_stamp(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        self.with_state(|state| match state.links.get_mut(code) {
            Some(link) => {
                link.clicks += 1;
                link.last_clicked = Some(now);
                true
            }
            None => false,
        })
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        self.with_state(|state| state.links.remove(code).is_some())
    }

    async fn list(&self, filter: &LinkFilter) -> Result<Vec<Link>, StoreError> {
        let mut matching = self.with_state(|state| {
            state
                .links
                .values()
                .filter(|link| filter.matches(link))
                .cloned()
                .collect::<Vec<_>>()
        })?;

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let offset = usize::try_from(filter.offset).unwrap_or(0);
        let limit = usize::try_from(filter.limit).unwrap_or(0);

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &LinkFilter) -> Result<i64, StoreError> {
        self.with_state(|state| {
            state.links.values().filter(|link| filter.matches(link)).count() as i64
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.with_state(|_| ())
    }
}
