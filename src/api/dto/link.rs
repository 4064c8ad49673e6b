//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::Link;
use crate::utils::url_validator::{UrlValidationError, validate_target_url};

/// Request to create a short link.
///
/// ```json
/// { "targetUrl": "https://example.com", "code": "abc123" }
/// ```
///
/// `code` is optional; omitted, `null` and `""` all ask for a generated code.
/// Its format is checked by the code allocator, not here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_http_url"))]
    pub target_url: String,

    #[serde(default)]
    pub code: Option<String>,
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    validate_target_url(value).map_err(|e| {
        let (code, message) = match e {
            UrlValidationError::Missing => ("required", "targetUrl is required"),
            _ => (
                "url",
                "Invalid URL format. Must be http:// or https://",
            ),
        };
        ValidationError::new(code).with_message(message.into())
    })
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            target_url: link.target_url,
            short_url,
            clicks: link.clicks,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
        }
    }
}
