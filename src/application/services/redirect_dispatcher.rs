//! Visit resolution and click accounting.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use crate::domain::errors::{DispatchError, RecordingFailure};
use crate::domain::repositories::LinkRepository;
use crate::utils::url_validator::validate_target_url;

/// Resolves a code to its target URL and records the visit.
///
/// Each call starts from scratch: look the code up, apply one atomic
/// `clicks + 1` / `last_clicked = now` mutation in the store, and hand the
/// target back for redirecting. A visit that cannot be recorded is an error,
/// never a silent redirect.
pub struct RedirectDispatcher<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> RedirectDispatcher<L> {
    pub fn new(repository: Arc<L>) -> Self {
        Self { repository }
    }

    /// Returns the target URL for `code` after recording one visit.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::NotFound`] if no link has this code; nothing is recorded
    /// - [`DispatchError::UnusableTarget`] if the stored target could not be sent
    ///   as a redirect; nothing is recorded
    /// - [`DispatchError::RecordingFailed`] if the lookup or the increment fails,
    ///   or the link is deleted between the two
    pub async fn resolve_and_record(&self, code: &str) -> Result<String, DispatchError> {
        let link = self
            .repository
            .find_by_code(code)
            .await
            .map_err(|e| self.recording_failed(code, e.into()))?
            .ok_or_else(|| {
                debug!(code, "Visit to unknown code");
                DispatchError::NotFound {
                    code: code.to_string(),
                }
            })?;

        if let Err(reason) = validate_target_url(&link.target_url) {
            metrics::counter!("link_visit_failures_total").increment(1);
            error!(code, error = %reason, "Stored target is not redirectable");
            return Err(DispatchError::UnusableTarget {
                code: code.to_string(),
            });
        }

        let recorded = self
            .repository
            .increment_clicks_and_stamp(code, Utc::now())
            .await
            .map_err(|e| self.recording_failed(code, e.into()))?;

        if !recorded {
            return Err(self.recording_failed(code, RecordingFailure::Vanished));
        }

        metrics::counter!("link_visits_total").increment(1);
        debug!(code, target = %link.target_url, "Visit recorded");

        Ok(link.target_url)
    }

    fn recording_failed(&self, code: &str, reason: RecordingFailure) -> DispatchError {
        metrics::counter!("link_visit_failures_total").increment(1);
        error!(code, error = %reason, "Failed to record visit");

        DispatchError::RecordingFailed {
            code: code.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::errors::StoreError;
    use crate::domain::repositories::MockLinkRepository;

    fn link(code: &str, clicks: i64) -> Link {
        Link::new(
            1,
            code.to_string(),
            "https://example.com/target".to_string(),
            clicks,
            None,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_resolves_and_records() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Ok(Some(link(code, 5))));
        repo.expect_increment_clicks_and_stamp()
            .withf(|code, _| code == "abc123")
            .times(1)
            .returning(|_, _| Ok(true));

        let dispatcher = RedirectDispatcher::new(Arc::new(repo));

        let target = dispatcher.resolve_and_record("abc123").await.unwrap();
        assert_eq!(target, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_stamps_current_time() {
        let before = Utc::now();

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, 0))));
        repo.expect_increment_clicks_and_stamp()
            .withf(move |_, now| *now >= before && *now <= Utc::now())
            .times(1)
            .returning(|_, _| Ok(true));

        let dispatcher = RedirectDispatcher::new(Arc::new(repo));

        assert!(dispatcher.resolve_and_record("abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_code_records_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(3).returning(|_| Ok(None));
        repo.expect_increment_clicks_and_stamp().times(0);
        repo.expect_create().times(0);

        let dispatcher = RedirectDispatcher::new(Arc::new(repo));

        for _ in 0..3 {
            let err = dispatcher.resolve_and_record("nope42").await.unwrap_err();
            assert!(matches!(err, DispatchError::NotFound { code } if code == "nope42"));
        }
    }

    #[tokio::test]
    async fn test_link_deleted_between_lookup_and_increment() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, 1))));
        repo.expect_increment_clicks_and_stamp()
            .times(1)
            .returning(|_, _| Ok(false));

        let dispatcher = RedirectDispatcher::new(Arc::new(repo));

        let err = dispatcher.resolve_and_record("abc123").await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::RecordingFailed {
                reason: RecordingFailure::Vanished,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_increment_failure_is_recording_failed() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, 1))));
        repo.expect_increment_clicks_and_stamp()
            .times(1)
            .returning(|_, _| Err(StoreError::backend(std::io::Error::other("timeout"))));

        let dispatcher = RedirectDispatcher::new(Arc::new(repo));

        let err = dispatcher.resolve_and_record("abc123").await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::RecordingFailed {
                reason: RecordingFailure::Store(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_recording_failed() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Err(StoreError::backend(std::io::Error::other("refused"))));
        repo.expect_increment_clicks_and_stamp().times(0);

        let dispatcher = RedirectDispatcher::new(Arc::new(repo));

        let err = dispatcher.resolve_and_record("abc123").await.unwrap_err();
        assert!(matches!(err, DispatchError::RecordingFailed { .. }));
    }

    #[tokio::test]
    async fn test_unusable_target_records_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|code| {
            Ok(Some(Link::new(
                1,
                code.to_string(),
                "https://example.com/a\nb".to_string(),
                0,
                None,
                Utc::now(),
            )))
        });
        repo.expect_increment_clicks_and_stamp().times(0);

        let dispatcher = RedirectDispatcher::new(Arc::new(repo));

        let err = dispatcher.resolve_and_record("ctrl01").await.unwrap_err();
        assert!(matches!(err, DispatchError::UnusableTarget { code } if code == "ctrl01"));
    }
}
