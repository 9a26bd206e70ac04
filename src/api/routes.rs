//! API route configuration.

use crate::api::handlers::{
    create_short_url_handler, delete_short_url_handler, get_clicks_handler, get_short_url_handler,
    list_short_urls_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Short URL management routes, mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `POST   /shorturls`                - Create a short URL
/// - `GET    /shorturls`                - List short URLs
/// - `GET    /shorturls/{slug}`         - Get one short URL
/// - `DELETE /shorturls/{slug}`         - Delete a short URL and its clicks
/// - `GET    /shorturls/{slug}/clicks`  - Click count over a time window
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shorturls",
            get(list_short_urls_handler).post(create_short_url_handler),
        )
        .route(
            "/shorturls/{slug}",
            get(get_short_url_handler).delete(delete_short_url_handler),
        )
        .route("/shorturls/{slug}/clicks", get(get_clicks_handler))
}
