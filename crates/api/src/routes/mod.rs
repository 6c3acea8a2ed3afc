pub mod albums;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod workflow;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /albums                          list (GET), create (POST)
/// /albums/batch                    create from batch form (POST, multipart)
/// /albums/{id}                     update (PUT), delete (DELETE)
/// /albums/{id}/weight              set sort weight (PATCH)
/// /albums/{id}/published           toggle publish state (PATCH)
///
/// /categories                      list (GET), create (POST)
/// /categories/{id}                 update (PUT)
/// /categories/{id}/active          toggle active flag (PATCH)
///
/// /dashboard/overview              usage overview (GET)
///
/// /workflow/sessions               create session (POST)
/// /workflow/sessions/{id}          session view (GET), discard (DELETE)
/// /workflow/sessions/{id}/images   upload image (POST, multipart)
/// /workflow/sessions/{id}/images/{index}        remove target image (DELETE)
/// /workflow/sessions/{id}/generate              run all stages (POST)
/// /workflow/sessions/{id}/back                  step back (POST)
/// /workflow/sessions/{id}/items/{index}         edit draft (PUT)
/// /workflow/sessions/{id}/items/{index}/cover   regenerate cover (POST)
/// /workflow/sessions/{id}/commit                create albums (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/albums", albums::router())
        .nest("/categories", categories::router())
        .nest("/dashboard", dashboard::router())
        .nest("/workflow", workflow::router())
}
