// Request payload validation
//
// Bodies arrive as loose JSON and are checked here before any statement is issued.
// A payload that fails shape or type checks is rejected with its resource's wording.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::core::error_classifier::Resource;
use crate::error::{AppError, AppResult};

pub const MAX_SLUG_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 100;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern compiles"));

fn decode<T: DeserializeOwned>(value: Value, resource: Resource) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Rejected {} payload: {}", resource, e);
        AppError::invalid(resource)
    })
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTopic {
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub img_url: Option<String>,
}

impl NewTopic {
    pub fn from_json(value: Value) -> AppResult<Self> {
        let topic: Self = decode(value, Resource::Topic)?;
        if topic.slug.len() > MAX_SLUG_LEN
            || !SLUG_PATTERN.is_match(&topic.slug)
            || is_blank(&topic.description)
            || topic.description.chars().count() > MAX_DESCRIPTION_LEN
        {
            return Err(AppError::invalid(Resource::Topic));
        }
        Ok(topic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewArticle {
    pub author: String,
    pub title: String,
    pub body: String,
    pub topic: String,
    #[serde(default)]
    pub article_img_url: Option<String>,
}

impl NewArticle {
    pub fn from_json(value: Value) -> AppResult<Self> {
        let article: Self = decode(value, Resource::Article)?;
        let required = [&article.author, &article.title, &article.body, &article.topic];
        if required.iter().any(|field| is_blank(field)) {
            return Err(AppError::invalid(Resource::Article));
        }
        if matches!(&article.article_img_url, Some(url) if is_blank(url)) {
            return Err(AppError::invalid(Resource::Article));
        }
        Ok(article)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewComment {
    pub username: String,
    pub body: String,
}

impl NewComment {
    pub fn from_json(value: Value) -> AppResult<Self> {
        let comment: Self = decode(value, Resource::Comment)?;
        if is_blank(&comment.username) || is_blank(&comment.body) {
            return Err(AppError::invalid(Resource::Comment));
        }
        Ok(comment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VoteIncrement {
    pub inc_votes: i64,
}

impl VoteIncrement {
    /// A single increment is limited to the `i32` range.
    pub fn from_json(value: Value) -> AppResult<Self> {
        let vote: Self = decode(value, Resource::Vote)?;
        if i32::try_from(vote.inc_votes).is_err() {
            return Err(AppError::invalid(Resource::Vote));
        }
        Ok(vote)
    }
}
