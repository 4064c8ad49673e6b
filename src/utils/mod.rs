//! Helper functions shared across layers.
//!
//! - [`code_generator`] - Short code format contract and random generation
//! - [`url_validator`] - Target URL validation

pub mod code_generator;
pub mod url_validator;
