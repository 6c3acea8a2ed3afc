//! Route definitions for the batch creation wizard.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Wizard session routes mounted at `/workflow`.
///
/// ```text
/// POST   /sessions                          -> create_session
/// GET    /sessions/{id}                     -> get_session
/// DELETE /sessions/{id}                     -> delete_session
/// POST   /sessions/{id}/images              -> upload_image (multipart)
/// DELETE /sessions/{id}/images/{index}      -> remove_target_image
/// POST   /sessions/{id}/generate            -> generate
/// POST   /sessions/{id}/back                -> step_back
/// PUT    /sessions/{id}/items/{index}       -> edit_item
/// POST   /sessions/{id}/items/{index}/cover -> regenerate_cover
/// POST   /sessions/{id}/commit              -> commit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(workflow::create_session))
        .route(
            "/sessions/{id}",
            get(workflow::get_session).delete(workflow::delete_session),
        )
        .route("/sessions/{id}/images", post(workflow::upload_image))
        .route(
            "/sessions/{id}/images/{index}",
            delete(workflow::remove_target_image),
        )
        .route("/sessions/{id}/generate", post(workflow::generate))
        .route("/sessions/{id}/back", post(workflow::step_back))
        .route("/sessions/{id}/items/{index}", put(workflow::edit_item))
        .route(
            "/sessions/{id}/items/{index}/cover",
            post(workflow::regenerate_cover),
        )
        .route("/sessions/{id}/commit", post(workflow::commit))
}
