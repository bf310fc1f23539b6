// Database Interface - store accessors for the news API
// Each accessor issues a single parameterized statement against the backing store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;

use crate::core::{ArticleListing, Dialect, PageRequest, Resource, SqlParam, Statement};
use crate::data_seeder::{timestamp_from_millis, SeedData};
use crate::error::{AppError, AppResult};
use crate::models::{
    Article, ArticleSummary, Comment, NewArticle, NewComment, NewTopic, Topic, User,
    DEFAULT_ARTICLE_IMG_URL,
};

/// Store interface injected into the request handlers.
///
/// Lookups and mutations by id that touch no row fail with a 404 for their
/// resource. Constraint violations on writes fail with a 400 for their resource.
#[async_trait]
pub trait NewsStore: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Create any missing tables.
    async fn initialize(&self) -> AppResult<()>;
    /// Drop every table and recreate the schema.
    async fn reset(&self) -> AppResult<()>;
    /// Load fixture data in a single transaction.
    async fn seed(&self, data: &SeedData) -> AppResult<()>;
    async fn health_check(&self) -> AppResult<()>;

    // Topics
    async fn fetch_topics(&self) -> AppResult<Vec<Topic>>;
    async fn fetch_topic(&self, slug: &str) -> AppResult<Topic>;
    async fn add_topic(&self, topic: NewTopic) -> AppResult<Topic>;

    // Articles
    async fn fetch_articles(&self, listing: &ArticleListing) -> AppResult<Vec<ArticleSummary>>;
    async fn count_articles(&self, listing: &ArticleListing) -> AppResult<i64>;
    async fn fetch_article(&self, article_id: i64) -> AppResult<Article>;
    async fn add_article(&self, article: NewArticle) -> AppResult<Article>;
    async fn update_article_votes(&self, article_id: i64, inc_votes: i64) -> AppResult<Article>;
    async fn remove_article(&self, article_id: i64) -> AppResult<()>;

    // Comments
    async fn fetch_article_comments(
        &self,
        article_id: i64,
        page: PageRequest,
    ) -> AppResult<Vec<Comment>>;
    async fn add_comment(&self, article_id: i64, comment: NewComment) -> AppResult<Comment>;
    async fn update_comment_votes(&self, comment_id: i64, inc_votes: i64) -> AppResult<Comment>;
    async fn remove_comment(&self, comment_id: i64) -> AppResult<()>;

    // Users
    async fn fetch_users(&self) -> AppResult<Vec<User>>;
    async fn fetch_user(&self, username: &str) -> AppResult<User>;
}

pub(crate) const ARTICLE_WITH_COUNT_SQL: &str = "SELECT articles.article_id, articles.title, \
     articles.topic, articles.author, articles.body, articles.created_at, articles.votes, \
     articles.article_img_url, COUNT(comments.comment_id) AS comment_count \
     FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id";

/// PostgreSQL implementation of the news store
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| AppError::ConfigurationError(format!("Failed to connect to PostgreSQL: {}", e)))?;
        Ok(Self::new(pool))
    }

    /// Get connection pool statistics
    pub fn pool_stats(&self) -> (u32, u32) {
        (self.pool.num_idle() as u32, self.pool.size())
    }
}

#[async_trait]
impl NewsStore for PostgresStore {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                username VARCHAR PRIMARY KEY,
                name VARCHAR(50) NOT NULL,
                avatar_url VARCHAR(1000)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS topics (
                slug VARCHAR(200) PRIMARY KEY,
                description VARCHAR(100) NOT NULL,
                img_url VARCHAR(1000)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                article_id BIGSERIAL PRIMARY KEY,
                title VARCHAR NOT NULL,
                topic VARCHAR NOT NULL REFERENCES topics(slug),
                author VARCHAR NOT NULL REFERENCES users(username),
                body TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                votes BIGINT NOT NULL DEFAULT 0,
                article_img_url VARCHAR(1000) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                comment_id BIGSERIAL PRIMARY KEY,
                article_id BIGINT NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
                body TEXT NOT NULL,
                votes BIGINT NOT NULL DEFAULT 0,
                author VARCHAR NOT NULL REFERENCES users(username),
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
            sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
                .execute(&self.pool)
                .await?;
        }
        self.initialize().await
    }

    async fn seed(&self, data: &SeedData) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for user in &data.users {
            sqlx::query("INSERT INTO users (username, name, avatar_url) VALUES ($1, $2, $3)")
                .bind(user.username)
                .bind(user.name)
                .bind(user.avatar_url)
                .execute(&mut *tx)
                .await?;
        }

        for topic in &data.topics {
            sqlx::query("INSERT INTO topics (slug, description, img_url) VALUES ($1, $2, $3)")
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
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING article_id",
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
                 VALUES ($1, $2, $3, $4, $5)",
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
        let (idle, size) = self.pool_stats();
        tracing::debug!(idle, size, "PostgreSQL pool healthy");
        Ok(())
    }

    async fn fetch_topics(&self) -> AppResult<Vec<Topic>> {
        let topics = sqlx::query_as::<_, Topic>("SELECT slug, description, img_url FROM topics ORDER BY slug")
            .fetch_all(&self.pool)
            .await?;
        Ok(topics)
    }

    async fn fetch_topic(&self, slug: &str) -> AppResult<Topic> {
        sqlx::query_as::<_, Topic>("SELECT slug, description, img_url FROM topics WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(Resource::Topic))
    }

    async fn add_topic(&self, topic: NewTopic) -> AppResult<Topic> {
        sqlx::query_as::<_, Topic>(
            "INSERT INTO topics (slug, description, img_url) VALUES ($1, $2, $3) \
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
        let Statement { sql, params } = listing.select_statement(Dialect::Postgres);
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
        let Statement { sql, params } = listing.count_statement(Dialect::Postgres);
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
            "{} WHERE articles.article_id = $1 GROUP BY articles.article_id",
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
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
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
            "UPDATE articles SET votes = votes + $1 WHERE article_id = $2 RETURNING *",
        )
        .bind(inc_votes)
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Resource::Vote))?
        .ok_or_else(|| AppError::not_found(Resource::Article))
    }

    async fn remove_article(&self, article_id: i64) -> AppResult<()> {
        sqlx::query_scalar::<_, i64>("DELETE FROM articles WHERE article_id = $1 RETURNING article_id")
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
             WHERE article_id = $1 ORDER BY created_at DESC, comment_id DESC LIMIT $2 OFFSET $3",
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
            "INSERT INTO comments (article_id, author, body) VALUES ($1, $2, $3) \
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
            "UPDATE comments SET votes = votes + $1 WHERE comment_id = $2 \
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
        sqlx::query_scalar::<_, i64>("DELETE FROM comments WHERE comment_id = $1 RETURNING comment_id")
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
        sqlx::query_as::<_, User>("SELECT username, name, avatar_url FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(Resource::User))
    }
}
