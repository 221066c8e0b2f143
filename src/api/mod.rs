pub mod dashboard;
pub mod health;
pub mod results;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(health::router())
        .merge(results::router())
}
