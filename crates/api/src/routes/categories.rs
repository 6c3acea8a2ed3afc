//! Route definitions for category taxonomy management.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes mounted at `/categories`.
///
/// ```text
/// GET   /              -> list_categories
/// POST  /              -> create_category
/// PUT   /{id}          -> update_category
/// PATCH /{id}/active   -> set_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/{id}", put(categories::update_category))
        .route("/{id}/active", patch(categories::set_active))
}
