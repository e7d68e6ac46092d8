pub mod handlers;

pub use handlers::{health_check, match_lines, MatchRequest, MatchResponse};

use crate::matching::LineMatcher;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建路由
pub fn router(matcher: Arc<LineMatcher>) -> Router {
    let match_routes = Router::new()
        .route("/api/match", post(handlers::match_lines))
        .with_state(matcher);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(match_routes)
}
