use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;

use crate::{
    error::{AppError, AppResult},
    infrastructure::NewsStore,
};

mod sample_data;

#[derive(Debug, Clone)]
pub struct SeedTopic {
    pub slug: &'static str,
    pub description: &'static str,
    pub img_url: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct SeedUser {
    pub username: &'static str,
    pub name: &'static str,
    pub avatar_url: Option<&'static str>,
}

/// Article fixture. `created_at` is epoch milliseconds.
#[derive(Debug, Clone)]
pub struct SeedArticle {
    pub title: &'static str,
    pub topic: &'static str,
    pub author: &'static str,
    pub body: &'static str,
    pub created_at: i64,
    pub votes: i64,
    pub article_img_url: &'static str,
}

/// Comment fixture, attached to its article by title.
#[derive(Debug, Clone)]
pub struct SeedComment {
    pub article_title: &'static str,
    pub body: &'static str,
    pub votes: i64,
    pub author: &'static str,
    pub created_at: i64,
}

/// Comment ready for insertion once article ids are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow<'a> {
    pub article_id: i64,
    pub body: &'a str,
    pub votes: i64,
    pub author: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct SeedData {
    pub topics: Vec<SeedTopic>,
    pub users: Vec<SeedUser>,
    pub articles: Vec<SeedArticle>,
    pub comments: Vec<SeedComment>,
}

impl SeedData {
    pub fn sample() -> Self {
        sample_data::sample()
    }

    /// Resolve every comment's article title against the ids the store handed back.
    pub fn comment_rows(&self, article_ids: &HashMap<String, i64>) -> AppResult<Vec<CommentRow<'_>>> {
        self.comments
            .iter()
            .map(|comment| {
                let article_id = article_ids.get(comment.article_title).copied().ok_or_else(|| {
                    AppError::Internal(format!(
                        "Seed comment references unknown article '{}'",
                        comment.article_title
                    ))
                })?;
                Ok(CommentRow {
                    article_id,
                    body: comment.body,
                    votes: comment.votes,
                    author: comment.author,
                    created_at: timestamp_from_millis(comment.created_at)?,
                })
            })
            .collect()
    }
}

pub fn timestamp_from_millis(millis: i64) -> AppResult<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| AppError::Internal(format!("Timestamp {} out of range", millis)))
}

/// Build a key -> value map from pairs; later duplicates win.
pub fn create_lookup<K, V, I>(pairs: I) -> HashMap<K, V>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().collect()
}

/// Drop and recreate the schema, then load `data`.
pub async fn seed_data_into_store(store: &dyn NewsStore, data: &SeedData) -> AppResult<()> {
    store.reset().await?;
    store.seed(data).await?;
    tracing::info!(
        topics = data.topics.len(),
        users = data.users.len(),
        articles = data.articles.len(),
        comments = data.comments.len(),
        "Seeded news store"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamp_from_millis() {
        let ts = timestamp_from_millis(1557572706232).unwrap();
        let expected = NaiveDate::from_ymd_opt(2019, 5, 11)
            .unwrap()
            .and_hms_milli_opt(11, 5, 6, 232)
            .unwrap();
        assert_eq!(ts, expected);
        assert!(timestamp_from_millis(i64::MAX).is_err());
    }

    #[test]
    fn test_create_lookup() {
        let empty: HashMap<String, i64> = create_lookup(Vec::new());
        assert!(empty.is_empty());

        let lookup = create_lookup(vec![("Rose", "dS8rJns"), ("Simon", "Pk34ABs"), ("Jim", "lk1ff8s")]);
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup["Rose"], "dS8rJns");
        assert_eq!(lookup["Jim"], "lk1ff8s");
    }

    #[test]
    fn test_sample_comments_resolve_against_article_titles() {
        let data = SeedData::sample();
        let ids = create_lookup(
            data.articles
                .iter()
                .enumerate()
                .map(|(i, a)| (a.title.to_string(), i as i64 + 1)),
        );
        let rows = data.comment_rows(&ids).unwrap();
        assert_eq!(rows.len(), data.comments.len());
        assert!(rows.iter().all(|row| row.article_id >= 1));
    }

    #[test]
    fn test_unknown_article_title_is_an_error() {
        let data = SeedData::sample();
        let err = data.comment_rows(&HashMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_sample_references_are_consistent() {
        let data = SeedData::sample();
        let topics: Vec<_> = data.topics.iter().map(|t| t.slug).collect();
        let users: Vec<_> = data.users.iter().map(|u| u.username).collect();
        for article in &data.articles {
            assert!(topics.contains(&article.topic), "{}", article.title);
            assert!(users.contains(&article.author), "{}", article.title);
        }
        for comment in &data.comments {
            assert!(users.contains(&comment.author));
        }
    }
}
