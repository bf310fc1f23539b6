#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use news_api::{
    api::create_news_router,
    app_state::AppState,
    config::Config,
    data_seeder::{seed_data_into_store, SeedData},
    infrastructure::SqliteStore,
};

pub async fn seeded_store() -> SqliteStore {
    let store = SqliteStore::new_in_memory().await.unwrap();
    seed_data_into_store(&store, &SeedData::sample()).await.unwrap();
    store
}

pub async fn test_app() -> Router {
    let store = seeded_store().await;
    create_news_router(AppState::with_store(Arc::new(store), Config::default()))
}

/// Send one request through the router and decode the JSON body (Null when empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}
