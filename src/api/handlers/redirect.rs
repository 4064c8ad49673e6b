//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::HeaderValue,
    response::{IntoResponse, Redirect},
};
use tracing::{debug, error};

use crate::domain::errors::DispatchError;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look the code up in the store
/// 2. Record the visit (`clicks + 1`, `last_clicked = now`) in one store mutation
/// 3. Return 307 Temporary Redirect
///
/// The visit is recorded before the response is sent. If recording fails the
/// client gets the same 404 as for an unknown code, so a redirect never
/// escapes without being counted.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown, the visit could not be
/// recorded, or the stored target cannot be sent as a `Location` header.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    match state.redirect_dispatcher.resolve_and_record(&code).await {
        Ok(target_url) if HeaderValue::from_str(&target_url).is_ok() => {
            Ok(Redirect::temporary(&target_url))
        }
        Ok(_) => {
            error!(code = %code, "Target URL is not a valid Location header");
            Err(AppError::link_not_found())
        }
        Err(err @ DispatchError::NotFound { .. }) => {
            debug!(code = %code, "Redirect miss");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
