use axum::{
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::app_state::AppState;

/// Build the full HTTP router for the news API.
pub fn create_news_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handlers::get_endpoints))
        .route("/api/health", get(handlers::health_check))
        .route(
            "/api/topics",
            get(handlers::get_topics).post(handlers::post_topic),
        )
        .route(
            "/api/articles",
            get(handlers::get_articles).post(handlers::post_article),
        )
        .route(
            "/api/articles/{article_id}",
            get(handlers::get_article)
                .patch(handlers::patch_article_votes)
                .delete(handlers::delete_article),
        )
        .route(
            "/api/articles/{article_id}/comments",
            get(handlers::get_article_comments).post(handlers::post_comment),
        )
        .route(
            "/api/comments/{comment_id}",
            patch(handlers::patch_comment_votes).delete(handlers::delete_comment),
        )
        .route("/api/users", get(handlers::get_users))
        .route("/api/users/{username}", get(handlers::get_user))
        .fallback(handlers::handle_unmatched_path)
        .method_not_allowed_fallback(handlers::handle_unmatched_path)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
