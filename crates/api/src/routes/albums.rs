//! Route definitions for album template management.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::albums;
use crate::state::AppState;

/// Album routes mounted at `/albums`.
///
/// ```text
/// GET    /                -> list_albums
/// POST   /                -> create_album
/// POST   /batch           -> batch_create_album (multipart)
/// PUT    /{id}            -> update_album
/// DELETE /{id}            -> delete_album
/// PATCH  /{id}/weight     -> set_sort_weight
/// PATCH  /{id}/published  -> set_published
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(albums::list_albums).post(albums::create_album))
        .route("/batch", post(albums::batch_create_album))
        .route(
            "/{id}",
            put(albums::update_album).delete(albums::delete_album),
        )
        .route("/{id}/weight", patch(albums::set_sort_weight))
        .route("/{id}/published", patch(albums::set_published))
}
