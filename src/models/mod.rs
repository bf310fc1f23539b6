// Records returned by the store accessors

pub mod payloads;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

pub use payloads::{NewArticle, NewComment, NewTopic, VoteIncrement};

pub const DEFAULT_ARTICLE_IMG_URL: &str =
    "https://images.pexels.com/photos/97050/pexels-photo-97050.jpeg?w=700&h=700";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Topic {
    pub slug: String,
    pub description: String,
    pub img_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Listing row: everything but the body, plus the aggregated comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ArticleSummary {
    pub author: String,
    pub title: String,
    pub article_id: i64,
    pub topic: String,
    pub created_at: NaiveDateTime,
    pub votes: i64,
    pub article_img_url: String,
    #[serde(serialize_with = "count_as_string")]
    pub comment_count: i64,
}

/// Full article row. `comment_count` is only present when the statement joined it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Article {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub votes: i64,
    pub article_img_url: String,
    #[sqlx(default)]
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_count_as_string"
    )]
    pub comment_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i64,
    pub article_id: i64,
    pub body: String,
    pub votes: i64,
    pub author: String,
    pub created_at: NaiveDateTime,
}

fn count_as_string<S: Serializer>(count: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(count)
}

fn optional_count_as_string<S: Serializer>(
    count: &Option<i64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match count {
        Some(count) => serializer.collect_str(count),
        None => serializer.serialize_none(),
    }
}
