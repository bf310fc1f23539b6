mod common;

use common::seeded_store;
use news_api::{
    config::DatabaseConfig,
    core::{ArticleListing, PageRequest, SortBy, SortOrder},
    data_seeder::{seed_data_into_store, SeedData},
    infrastructure::{connect_store, NewsStore, SqliteStore},
    models::{NewComment, NewTopic},
    AppError,
};

#[tokio::test]
async fn test_seeded_counts() {
    let store = seeded_store().await;
    let listing = ArticleListing::default();

    assert_eq!(store.count_articles(&listing).await.unwrap(), 13);
    assert_eq!(store.fetch_topics().await.unwrap().len(), 3);
    assert_eq!(store.fetch_users().await.unwrap().len(), 4);

    let shadow = store.fetch_article(1).await.unwrap();
    assert_eq!(shadow.comment_count, Some(11));
}

#[tokio::test]
async fn test_comment_counts_match_comment_rows() {
    let store = seeded_store().await;
    let listing = ArticleListing {
        page: PageRequest::new(50, 1).unwrap(),
        ..ArticleListing::default()
    };

    for summary in store.fetch_articles(&listing).await.unwrap() {
        let comments = store
            .fetch_article_comments(summary.article_id, PageRequest::new(50, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(summary.comment_count, comments.len() as i64, "{}", summary.title);
    }
}

#[tokio::test]
async fn test_listing_with_votes_order() {
    let store = seeded_store().await;
    let listing = ArticleListing {
        sort_by: SortBy::Votes,
        order: SortOrder::Desc,
        topic: Some("mitch".to_string()),
        page: PageRequest::new(3, 1).unwrap(),
    };

    let articles = store.fetch_articles(&listing).await.unwrap();
    let votes: Vec<i64> = articles.iter().map(|a| a.votes).collect();
    assert_eq!(votes, vec![100, 7, 5]);
    assert_eq!(store.count_articles(&listing).await.unwrap(), 12);
}

#[tokio::test]
async fn test_missing_rows_are_not_found() {
    let store = seeded_store().await;

    assert!(matches!(store.fetch_article(404).await, Err(AppError::NotFound(_))));
    assert!(matches!(store.fetch_topic("dogs").await, Err(AppError::NotFound(_))));
    assert!(matches!(store.fetch_user("nobody").await, Err(AppError::NotFound(_))));
    assert!(matches!(store.update_article_votes(404, 1).await, Err(AppError::NotFound(_))));
    assert!(matches!(store.update_comment_votes(404, 1).await, Err(AppError::NotFound(_))));
    assert!(matches!(store.remove_article(404).await, Err(AppError::NotFound(_))));
    assert!(matches!(store.remove_comment(404).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_constraint_violations_are_bad_requests() {
    let store = seeded_store().await;

    let duplicate = NewTopic {
        slug: "cats".to_string(),
        description: "again".to_string(),
        img_url: None,
    };
    let err = store.add_topic(duplicate).await.unwrap_err();
    assert!(matches!(err, AppError::Constraint(_)));
    assert_eq!(err.message(), "Invalid topic!");

    let stranger = NewComment {
        username: "nobody".to_string(),
        body: "hi".to_string(),
    };
    let err = store.add_comment(1, stranger).await.unwrap_err();
    assert!(matches!(err, AppError::Constraint(_)));
    assert_eq!(err.message(), "Keep invalid comments to yourself");
}

#[tokio::test]
async fn test_vote_overflow_is_rejected_and_rolled_back() {
    let store = seeded_store().await;

    let err = store.update_article_votes(1, i64::MAX).await.unwrap_err();
    assert!(matches!(err, AppError::Constraint(_)));
    assert_eq!(
        err.message(),
        "The sent vote obj was invalid. Did someone say election interference?"
    );
    assert_eq!(store.fetch_article(1).await.unwrap().votes, 100);

    let err = store.update_comment_votes(1, i64::MAX).await.unwrap_err();
    assert!(matches!(err, AppError::Constraint(_)));

    let listing = ArticleListing {
        sort_by: SortBy::Votes,
        page: PageRequest::new(50, 1).unwrap(),
        ..ArticleListing::default()
    };
    assert_eq!(store.fetch_articles(&listing).await.unwrap().len(), 13);
    let comments = store
        .fetch_article_comments(9, PageRequest::new(50, 1).unwrap())
        .await
        .unwrap();
    assert!(comments.iter().any(|c| c.comment_id == 1 && c.votes == 16));
}

#[tokio::test]
async fn test_reseeding_restores_the_sample_data() {
    let store = seeded_store().await;
    store.remove_article(1).await.unwrap();
    store.update_comment_votes(1, 50).await.unwrap();

    seed_data_into_store(&store, &SeedData::sample()).await.unwrap();

    let shadow = store.fetch_article(1).await.unwrap();
    assert_eq!(shadow.votes, 100);
    assert_eq!(shadow.comment_count, Some(11));
    assert_eq!(store.count_articles(&ArticleListing::default()).await.unwrap(), 13);
}

#[tokio::test]
async fn test_file_backed_store_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("news.db");
    let config = DatabaseConfig {
        url: format!("sqlite:{}", path.display()),
        max_connections: 2,
    };

    {
        let store = connect_store(&config).await.unwrap();
        seed_data_into_store(store.as_ref(), &SeedData::sample()).await.unwrap();
        store.update_article_votes(2, 3).await.unwrap();
    }

    let store = SqliteStore::connect(&config.url, 2).await.unwrap();
    store.health_check().await.unwrap();
    assert_eq!(store.fetch_article(2).await.unwrap().votes, 3);
    assert_eq!(store.fetch_users().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_unsupported_database_url() {
    let config = DatabaseConfig {
        url: "mysql://localhost/news".to_string(),
        max_connections: 1,
    };
    assert!(matches!(
        connect_store(&config).await,
        Err(AppError::ConfigurationError(_))
    ));
}
