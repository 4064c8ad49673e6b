//! Target URL validation.
//!
//! A target must parse as an absolute URL whose scheme is exactly `http` or
//! `https`, and must be usable verbatim as a `Location` header. The URL is
//! stored as submitted; nothing is normalized.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("targetUrl is required")]
    Missing,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    /// Control characters or surrounding whitespace. `Url::parse` would
    /// silently strip or escape them, but the stored string is sent as-is.
    #[error("URL contains control characters or surrounding whitespace")]
    UnsafeCharacters,
}

/// Checks that `input` is an absolute `http`/`https` URL.
///
/// Rejects dangerous schemes such as `javascript:`, `data:` and `file:`.
///
/// # Errors
///
/// Returns [`UrlValidationError::Missing`] for empty or whitespace-only input,
/// [`UrlValidationError::InvalidFormat`] if the URL does not parse,
/// [`UrlValidationError::UnsupportedProtocol`] for any other scheme, and
/// [`UrlValidationError::UnsafeCharacters`] if it could not be sent back
/// verbatim in a redirect.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Missing);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedProtocol);
    }

    if input.trim() != input || input.chars().any(char::is_control) {
        return Err(UrlValidationError::UnsafeCharacters);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_target_url("http://example.com").is_ok());
        assert!(validate_target_url("https://example.com/path?q=1#frag").is_ok());
        assert!(validate_target_url("HTTPS://EXAMPLE.COM").is_ok());
        assert!(validate_target_url("https://localhost:8080").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_target_url(""), Err(UrlValidationError::Missing));
        assert_eq!(validate_target_url("   "), Err(UrlValidationError::Missing));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_target_url("/relative/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url("example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in [
            "ftp://example.com",
            "javascript:alert(1)",
            "data:text/html,hi",
            "file:///etc/passwd",
            "mailto:someone@example.com",
        ] {
            assert_eq!(
                validate_target_url(input),
                Err(UrlValidationError::UnsupportedProtocol),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_control_characters() {
        for input in [
            "https://example.com/a\nb",
            "https://example.com/a\r\nSet-Cookie: x=1",
            "https://example.com/\tpath",
            "https://example.com/\u{0}",
            "https://example.com/\u{7f}",
        ] {
            assert_eq!(
                validate_target_url(input),
                Err(UrlValidationError::UnsafeCharacters),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_surrounding_whitespace() {
        assert_eq!(
            validate_target_url(" https://example.com"),
            Err(UrlValidationError::UnsafeCharacters)
        );
        assert_eq!(
            validate_target_url("https://example.com\n"),
            Err(UrlValidationError::UnsafeCharacters)
        );
    }

    #[test]
    fn test_accepts_non_ascii_path() {
        assert!(validate_target_url("https://example.com/caf\u{e9}").is_ok());
    }
}
