//! Route definitions for the analytics dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes mounted at `/dashboard`.
///
/// ```text
/// GET /overview -> usage_overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/overview", get(dashboard::usage_overview))
}
