//! Handlers for link management endpoints (create, list, show, delete).

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse};
use crate::api::dto::pagination::{ListLinksQuery, PaginationMeta};
use crate::error::AppError;
use crate::state::AppState;

/// Paginated list of links.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub pagination: PaginationMeta,
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "targetUrl": "https://example.com/some/long/path",
///   "code": "promo24"   // optional, 6-8 alphanumeric characters
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is not JSON of the expected shape, or the URL or the
///   requested code is malformed
/// - 409 if the requested code is taken
/// - 503 if no free code could be generated
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&payload.target_url, payload.code.as_deref())
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?q=&page=&page_size=`
pub async fn list_links_handler(
    State(state): State<AppState>,
    query: Result<Query<ListLinksQuery>, QueryRejection>,
) -> Result<Json<LinkListResponse>, AppError> {
    let Query(query) = query?;
    let (filter, page, page_size) = query
        .to_filter()
        .map_err(|message| AppError::bad_request(message, json!({})))?;

    let result = state.link_service.list_links(filter).await?;

    let items = result
        .items
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.code);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        items,
        pagination: PaginationMeta {
            page,
            page_size,
            total: result.total,
        },
    }))
}

/// Returns one link with its visit statistics.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Deletes a link permanently.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// Returns 204 No Content on success, 404 if no link has this code.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
