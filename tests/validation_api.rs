mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    http::{Method, StatusCode},
    Router,
};
use serde_json::json;

use common::{get, send};
use news_api::{
    api::create_news_router,
    app_state::AppState,
    config::Config,
    core::{
        error_classifier::{INVALID_COMMENT_MSG, INVALID_QUERY_MSG, INVALID_VOTE_MSG},
        ArticleListing, Dialect, PageRequest, Resource,
    },
    data_seeder::SeedData,
    infrastructure::NewsStore,
    models::{
        Article, ArticleSummary, Comment, NewArticle, NewComment, NewTopic, Topic, User,
    },
    AppError, AppResult,
};

/// Store that records every call and holds no data.
#[derive(Default)]
struct CountingStore {
    calls: AtomicUsize,
}

impl CountingStore {
    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsStore for CountingStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn initialize(&self) -> AppResult<()> {
        self.record();
        Ok(())
    }

    async fn reset(&self) -> AppResult<()> {
        self.record();
        Ok(())
    }

    async fn seed(&self, _data: &SeedData) -> AppResult<()> {
        self.record();
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.record();
        Ok(())
    }

    async fn fetch_topics(&self) -> AppResult<Vec<Topic>> {
        self.record();
        Ok(Vec::new())
    }

    async fn fetch_topic(&self, _slug: &str) -> AppResult<Topic> {
        self.record();
        Err(AppError::not_found(Resource::Topic))
    }

    async fn add_topic(&self, _topic: NewTopic) -> AppResult<Topic> {
        self.record();
        Err(AppError::invalid(Resource::Topic))
    }

    async fn fetch_articles(&self, _listing: &ArticleListing) -> AppResult<Vec<ArticleSummary>> {
        self.record();
        Ok(Vec::new())
    }

    async fn count_articles(&self, _listing: &ArticleListing) -> AppResult<i64> {
        self.record();
        Ok(0)
    }

    async fn fetch_article(&self, _article_id: i64) -> AppResult<Article> {
        self.record();
        Err(AppError::not_found(Resource::Article))
    }

    async fn add_article(&self, _article: NewArticle) -> AppResult<Article> {
        self.record();
        Err(AppError::invalid(Resource::Article))
    }

    async fn update_article_votes(&self, _article_id: i64, _inc_votes: i64) -> AppResult<Article> {
        self.record();
        Err(AppError::not_found(Resource::Article))
    }

    async fn remove_article(&self, _article_id: i64) -> AppResult<()> {
        self.record();
        Err(AppError::not_found(Resource::Article))
    }

    async fn fetch_article_comments(
        &self,
        _article_id: i64,
        _page: PageRequest,
    ) -> AppResult<Vec<Comment>> {
        self.record();
        Ok(Vec::new())
    }

    async fn add_comment(&self, _article_id: i64, _comment: NewComment) -> AppResult<Comment> {
        self.record();
        Err(AppError::invalid(Resource::Comment))
    }

    async fn update_comment_votes(&self, _comment_id: i64, _inc_votes: i64) -> AppResult<Comment> {
        self.record();
        Err(AppError::not_found(Resource::Comment))
    }

    async fn remove_comment(&self, _comment_id: i64) -> AppResult<()> {
        self.record();
        Err(AppError::not_found(Resource::Comment))
    }

    async fn fetch_users(&self) -> AppResult<Vec<User>> {
        self.record();
        Ok(Vec::new())
    }

    async fn fetch_user(&self, _username: &str) -> AppResult<User> {
        self.record();
        Err(AppError::not_found(Resource::User))
    }
}

fn counting_app() -> (Arc<CountingStore>, Router) {
    let store = Arc::new(CountingStore::default());
    let app = create_news_router(AppState::with_store(store.clone(), Config::default()));
    (store, app)
}

#[tokio::test]
async fn test_counting_store_sees_valid_listing() {
    let (store, app) = counting_app();

    let (status, body) = get(&app, "/api/articles?limit=50&sort_by=votes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 0);
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_rejected_listing_queries_never_reach_the_store() {
    let (store, app) = counting_app();

    for query in ["limit=51", "limit=0", "limit=abc", "page=0", "sort_by=body", "order=up"] {
        let (status, body) = get(&app, &format!("/api/articles?{}", query)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
        assert_eq!(body["msg"], INVALID_QUERY_MSG);
    }

    let (status, _) = get(&app, "/api/articles/1/comments?limit=51").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_rejected_comment_bodies_never_reach_the_store() {
    let (store, app) = counting_app();

    for payload in [
        json!({}),
        json!({ "username": 1, "body": "numbers are not people" }),
        json!({ "username": "lurker", "body": false }),
    ] {
        let (status, body) =
            send(&app, Method::POST, "/api/articles/1/comments", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", payload);
        assert_eq!(body["msg"], INVALID_COMMENT_MSG);
    }

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_rejected_votes_and_ids_never_reach_the_store() {
    let (store, app) = counting_app();

    for payload in [json!({}), json!({ "inc_votes": "1" }), json!({ "inc_votes": i64::MAX })] {
        let (status, body) = send(&app, Method::PATCH, "/api/comments/1", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], INVALID_VOTE_MSG);
    }

    let (status, _) = get(&app, "/api/articles/banana").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.calls(), 0);
}
