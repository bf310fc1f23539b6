use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::core::{ArticleListing, Dialect, PageRequest, Resource, SqlParam, Statement};
use crate::data_seeder::{timestamp_from_millis, SeedData};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{NewsStore, ARTICLE_WITH_COUNT_SQL};
use crate::models::{
    Article, ArticleSummary, Comment, NewArticle, NewComment, NewTopic, Topic, User,
    DEFAULT_ARTICLE_IMG_URL,
};

/// SQLite implementation of the news store, file backed or in memory
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::ConfigurationError(format!("Invalid SQLite URL {}: {}", url, e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own database, so the pool must hold
        // exactly one connection and never recycle it.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        if !in_memory {
            ensure_parent_dir(url)?;
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::ConfigurationError(format!("Failed to connect to SQLite: {}", e)))?;

        Ok(Self { pool })
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        let store = Self::connect("sqlite::memory:", 1).await?;
        store.initialize().await?;
        Ok(store)
    }
}

/// `create_if_missing` creates the file but not its directory.
fn ensure_parent_dir(url: &str) -> AppResult<()> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::ConfigurationError(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

#[async_trait]
impl NewsStore for SqliteStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                avatar_url TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS topics (
                slug TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                img_url TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                article_id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                topic TEXT NOT NULL REFERENCES topics(slug),
                author TEXT NOT NULL REFERENCES users(username),
                body TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                votes INTEGER NOT NULL DEFAULT 0 CHECK (typeof(votes) = 'integer'),
                article_img_url TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_id INTEGER NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
                body TEXT NOT NULL,
                votes INTEGER NOT NULL DEFAULT 0 CHECK (typeof(votes) = 'integer'),
                author TEXT NOT NULL REFERENCES users(username),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_article_id ON comments(article_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn reset(&self) -> AppResult<()> {
        for table in ["comments", "articles", "topics", "users"] {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(&self.pool)
                .await?;
        }
        self.initialize().await
    }

    async fn seed(&self, data: &SeedData) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for user in &data.users {
            sqlx::query("INSERT INTO users (username, name, avatar_url) VALUES (?, ?, ?)")
                .bind(user.username)
                .bind(user.name)
                .bind(user.avatar_url)
                .execute(&mut *tx)
                .await?;
        }

        for topic in &data.topics {
            sqlx::query("INSERT INTO topics (slug, description, img_url) VALUES (?, ?, ?)")
                .bind(topic.slug)
                .bind(topic.description)
                .bind(topic.img_url)
                .execute(&mut *tx)
                .await?;
        }

        let mut article_ids = HashMap::with_capacity(data.articles.len());
        for article in &data.articles {
            let article_id: i64 = sqlx::query_scalar(
                "INSERT INTO articles (title, topic, author, body, created_at, votes, article_img_url) \
                 VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING article_id",
            )
            .bind(article.title)
            .bind(article.topic)
            .bind(article.author)
            .bind(article.body)
            .bind(timestamp_from_millis(article.created_at)?)
            .bind(article.votes)
            .bind(article.article_img_url)
            .fetch_one(&mut *tx)
            .await?;
            article_ids.insert(article.title.to_string(), article_id);
        }

        for row in data.comment_rows(&article_ids)? {
            sqlx::query(
                "INSERT INTO comments (article_id, body, votes, author, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(row.article_id)
            .bind(row.body)
            .bind(row.votes)
            .bind(row.author)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn fetch_topics(&self) -> AppResult<Vec<Topic>> {
        let topics = sqlx::query_as::<_, Topic>("SELECT slug, description, img_url FROM topics ORDER BY slug")
            .fetch_all(&self.pool)
            .await?;
        Ok(topics)
    }

    async fn fetch_topic(&self, slug: &str) -> AppResult<Topic> {
        sqlx::query_as::<_, Topic>("SELECT slug, description, img_url FROM topics WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(Resource::Topic))
    }

    async fn add_topic(&self, topic: NewTopic) -> AppResult<Topic> {
        sqlx::query_as::<_, Topic>(
            "INSERT INTO topics (slug, description, img_url) VALUES (?, ?, ?) \
             RETURNING slug, description, img_url",
        )
        .bind(topic.slug)
        .bind(topic.description)
        .bind(topic.img_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Resource::Topic))
    }

    async fn fetch_articles(&self, listing: &ArticleListing) -> AppResult<Vec<ArticleSummary>> {
        let Statement { sql, params } = listing.select_statement(Dialect::Sqlite);
        let mut query = sqlx::query_as::<_, ArticleSummary>(&sql);
        for param in params {
            query = match param {
                SqlParam::Text(text) => query.bind(text),
                SqlParam::Int(n) => query.bind(n),
            };
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn count_articles(&self, listing: &ArticleListing) -> AppResult<i64> {
        let Statement { sql, params } = listing.count_statement(Dialect::Sqlite);
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for param in params {
            query = match param {
                SqlParam::Text(text) => query.bind(text),
                SqlParam::Int(n) => query.bind(n),
            };
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn fetch_article(&self, article_id: i64) -> AppResult<Article> {
        let sql = format!(
            "{} WHERE articles.article_id = ? GROUP BY articles.article_id",
            ARTICLE_WITH_COUNT_SQL
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(article_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(Resource::Article))
    }

    async fn add_article(&self, article: NewArticle) -> AppResult<Article> {
        let img_url = article
            .article_img_url
            .unwrap_or_else(|| DEFAULT_ARTICLE_IMG_URL.to_string());
        let mut created = sqlx::query_as::<_, Article>(
            "INSERT INTO articles (author, title, body, topic, article_img_url) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(article.author)
        .bind(article.title)
        .bind(article.body)
        .bind(article.topic)
        .bind(img_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Resource::Article))?;
        created.comment_count = Some(0);
        Ok(created)
    }

    async fn update_article_votes(&self, article_id: i64, inc_votes: i64) -> AppResult<Article> {
        sqlx::query_as::<_, Article>(
            "UPDATE articles SET votes = votes + ? WHERE article_id = ? RETURNING *",
        )
        .bind(inc_votes)
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Resource::Vote))?
        .ok_or_else(|| AppError::not_found(Resource::Article))
    }

    async fn remove_article(&self, article_id: i64) -> AppResult<()> {
        sqlx::query_scalar::<_, i64>("DELETE FROM articles WHERE article_id = ? RETURNING article_id")
            .bind(article_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(Resource::Article))
    }

    async fn fetch_article_comments(
        &self,
        article_id: i64,
        page: PageRequest,
    ) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT comment_id, article_id, body, votes, author, created_at FROM comments \
             WHERE article_id = ? ORDER BY created_at DESC, comment_id DESC LIMIT ? OFFSET ?",
        )
        .bind(article_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn add_comment(&self, article_id: i64, comment: NewComment) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (article_id, author, body) VALUES (?, ?, ?) \
             RETURNING comment_id, article_id, body, votes, author, created_at",
        )
        .bind(article_id)
        .bind(comment.username)
        .bind(comment.body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Resource::Comment))
    }

    async fn update_comment_votes(&self, comment_id: i64, inc_votes: i64) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET votes = votes + ? WHERE comment_id = ? \
             RETURNING comment_id, article_id, body, votes, author, created_at",
        )
        .bind(inc_votes)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Resource::Vote))?
        .ok_or_else(|| AppError::not_found(Resource::Comment))
    }

    async fn remove_comment(&self, comment_id: i64) -> AppResult<()> {
        sqlx::query_scalar::<_, i64>("DELETE FROM comments WHERE comment_id = ? RETURNING comment_id")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(Resource::Comment))
    }

    async fn fetch_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT username, name, avatar_url FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn fetch_user(&self, username: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT username, name, avatar_url FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(Resource::User))
    }
}
