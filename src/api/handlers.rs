use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    app_state::AppState,
    core::{ArticleListQuery, ArticleListing, PageQuery, Resource},
    error::{AppError, AppResult},
    models::{NewArticle, NewComment, NewTopic, VoteIncrement},
};

const ENDPOINTS_JSON: &str = include_str!("../../endpoints.json");

/// Numeric path segment, or 400 "Invalid path!".
pub fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::invalid(Resource::Path))
}

fn json_body(body: Result<Json<Value>, JsonRejection>, resource: Resource) -> AppResult<Value> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!("Unreadable {} body: {}", resource, rejection);
            Err(AppError::invalid(resource))
        }
    }
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|_| AppError::invalid(Resource::Query))
}

pub async fn get_endpoints() -> AppResult<Json<Value>> {
    let endpoints: Value = serde_json::from_str(ENDPOINTS_JSON)
        .map_err(|e| AppError::Internal(format!("endpoints.json is malformed: {}", e)))?;
    Ok(Json(json!({ "endpoints": endpoints })))
}

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.store.health_check().await?;
    Ok(Json(json!({ "status": "healthy" })))
}

// Topics

pub async fn get_topics(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let topics = state.store.fetch_topics().await?;
    Ok(Json(json!({ "topics": topics })))
}

pub async fn post_topic(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let topic = NewTopic::from_json(json_body(body, Resource::Topic)?)?;
    info!("Creating topic: {}", topic.slug);
    let topic = state.store.add_topic(topic).await?;
    Ok(Json(json!({ "topic": topic })))
}

// Articles

pub async fn get_articles(
    State(state): State<AppState>,
    query: Result<Query<ArticleListQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let listing = ArticleListing::from_query(&query_params(query)?)?;
    info!(
        sort_by = ?listing.sort_by,
        order = ?listing.order,
        topic = ?listing.topic,
        limit = listing.page.limit(),
        page = listing.page.page(),
        "Listing articles"
    );

    let articles = state.store.fetch_articles(&listing).await?;
    let total_count = state.store.count_articles(&listing).await?;

    // An empty filtered listing is only a 404 when the topic itself is unknown.
    if total_count == 0 {
        if let Some(topic) = &listing.topic {
            state.store.fetch_topic(topic).await?;
        }
    }

    Ok(Json(json!({
        "articles": articles,
        "total_count": total_count,
    })))
}

pub async fn post_article(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let article = NewArticle::from_json(json_body(body, Resource::Article)?)?;
    info!("Creating article '{}' by {}", article.title, article.author);
    let article = state.store.add_article(article).await?;
    Ok(Json(json!({ "article": article })))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> AppResult<Json<Value>> {
    let article_id = parse_id(&article_id)?;
    info!("Getting article with id: {}", article_id);
    let article = state.store.fetch_article(article_id).await?;
    Ok(Json(json!({ "article": article })))
}

pub async fn patch_article_votes(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let article_id = parse_id(&article_id)?;
    let vote = VoteIncrement::from_json(json_body(body, Resource::Vote)?)?;
    info!("Voting {} on article {}", vote.inc_votes, article_id);
    let article = state
        .store
        .update_article_votes(article_id, vote.inc_votes)
        .await?;
    Ok(Json(json!({ "article": article })))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> AppResult<StatusCode> {
    let article_id = parse_id(&article_id)?;
    info!("Deleting article: {}", article_id);
    state.store.remove_article(article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Comments

pub async fn get_article_comments(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let article_id = parse_id(&article_id)?;
    let page = query_params(query)?.validate()?;
    info!(
        article_id,
        limit = page.limit(),
        page = page.page(),
        "Listing comments"
    );

    state.store.fetch_article(article_id).await?;
    let comments = state.store.fetch_article_comments(article_id, page).await?;
    Ok(Json(json!({ "comments": comments })))
}

pub async fn post_comment(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let article_id = parse_id(&article_id)?;
    let comment = NewComment::from_json(json_body(body, Resource::Comment)?)?;
    info!("Adding comment by {} to article {}", comment.username, article_id);
    let comment = state.store.add_comment(article_id, comment).await?;
    Ok((StatusCode::CREATED, Json(json!({ "comment": comment }))))
}

pub async fn patch_comment_votes(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let comment_id = parse_id(&comment_id)?;
    let vote = VoteIncrement::from_json(json_body(body, Resource::Vote)?)?;
    info!("Voting {} on comment {}", vote.inc_votes, comment_id);
    let comment = state
        .store
        .update_comment_votes(comment_id, vote.inc_votes)
        .await?;
    Ok(Json(json!({ "comment": comment })))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<StatusCode> {
    let comment_id = parse_id(&comment_id)?;
    info!("Deleting comment: {}", comment_id);
    state.store.remove_comment(comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Users

pub async fn get_users(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let users = state.store.fetch_users().await?;
    Ok(Json(json!({ "users": users })))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Value>> {
    let user = state.store.fetch_user(&username).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn handle_unmatched_path() -> AppError {
    AppError::unmatched_path()
}
