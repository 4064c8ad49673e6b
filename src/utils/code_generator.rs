//! Short code generation and format validation.
//!
//! Codes are 6 to 8 characters drawn from `[A-Za-z0-9]`, which gives at least
//! 62^6 (about 56 billion) distinct values.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Alphabet for generated codes: 26 upper, 26 lower, 10 digits.
pub const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const MIN_CODE_LEN: usize = 6;
pub const MAX_CODE_LEN: usize = 8;

/// Format contract for every code, requested or generated.
pub static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("code pattern is a valid regex")
});

/// Returns true if `code` satisfies the code format contract.
///
/// ```ignore
/// assert!(is_valid_code("abc123"));
/// assert!(!is_valid_code("ab"));
/// assert!(!is_valid_code("abc-123"));
/// ```
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Generates a random candidate code with the thread-local RNG.
pub fn generate_code() -> String {
    generate_code_with(&mut rand::rng())
}

/// Generates a random candidate code from the given RNG.
///
/// Length is uniform over 6..=8 and every character is drawn independently
/// and uniformly from [`CODE_CHARSET`].
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(MIN_CODE_LEN..=MAX_CODE_LEN);

    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}
