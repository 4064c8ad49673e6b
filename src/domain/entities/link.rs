//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short code bound to a target URL, with its click statistics.
///
/// `code`, `target_url` and `created_at` never change after creation.
/// `clicks` and `last_clicked` are only touched by the store's atomic
/// increment, so `last_clicked.is_some()` implies `clicks >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        target_url: String,
        clicks: i64,
        last_clicked: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            target_url,
            clicks,
            last_clicked,
            created_at,
        }
    }

    /// Returns true once at least one visit has been recorded.
    pub fn has_visits(&self) -> bool {
        self.clicks > 0
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
}

/// Listing options: optional search text plus offset pagination.
///
/// `search` matches case-insensitively as a substring of either the code or
/// the target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFilter {
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            search: None,
            offset: 0,
            limit: 25,
        }
    }
}

impl LinkFilter {
    /// Returns true when `link` satisfies the search part of the filter.
    pub fn matches(&self, link: &Link) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                link.code.to_lowercase().contains(&query)
                    || link.target_url.to_lowercase().contains(&query)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link() -> Link {
        Link::new(
            1,
            "abc123".to_string(),
            "https://Example.com/Docs".to_string(),
            0,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            7,
            "xyZ789".to_string(),
            "https://rust-lang.org".to_string(),
            0,
            None,
            now,
        );

        assert_eq!(link.id, 7);
        assert_eq!(link.code, "xyZ789");
        assert_eq!(link.target_url, "https://rust-lang.org");
        assert_eq!(link.created_at, now);
        assert!(link.last_clicked.is_none());
        assert!(!link.has_visits());
    }

    #[test]
    fn test_link_has_visits() {
        let mut link = sample_link();
        link.clicks = 3;
        link.last_clicked = Some(Utc::now());
        assert!(link.has_visits());
    }

    #[test]
    fn test_filter_without_search_matches_everything() {
        assert!(LinkFilter::default().matches(&sample_link()));

        let empty = LinkFilter {
            search: Some(String::new()),
            ..LinkFilter::default()
        };
        assert!(empty.matches(&sample_link()));
    }

    #[test]
    fn test_filter_matches_code_case_insensitively() {
        let filter = LinkFilter {
            search: Some("ABC".to_string()),
            ..LinkFilter::default()
        };
        assert!(filter.matches(&sample_link()));
    }

    #[test]
    fn test_filter_matches_target_url() {
        let filter = LinkFilter {
            search: Some("example.com/docs".to_string()),
            ..LinkFilter::default()
        };
        assert!(filter.matches(&sample_link()));
    }

    #[test]
    fn test_filter_rejects_unrelated_text() {
        let filter = LinkFilter {
            search: Some("github".to_string()),
            ..LinkFilter::default()
        };
        assert!(!filter.matches(&sample_link()));
    }
}
