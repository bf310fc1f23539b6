// Article listing query builder
//
// Sort keys and directions are closed enums resolved to fixed SQL fragments. User
// supplied values (topic, limit, offset) only ever travel as bound parameters.

use serde::Deserialize;
use std::fmt::Write;
use std::str::FromStr;

use crate::core::error_classifier::Resource;
use crate::error::{AppError, AppResult};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;
pub const MAX_TOPIC_FILTER_LEN: usize = 200;

/// Placeholder flavour of the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    fn placeholder(self, position: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", position),
            Dialect::Sqlite => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// SQL text plus its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    CreatedAt,
    Topic,
    Author,
    Votes,
}

impl SortBy {
    const COLUMNS: [(SortBy, &'static str, &'static str); 4] = [
        (SortBy::CreatedAt, "created_at", "articles.created_at"),
        (SortBy::Topic, "topic", "articles.topic"),
        (SortBy::Author, "author", "articles.author"),
        (SortBy::Votes, "votes", "articles.votes"),
    ];

    pub fn column(self) -> &'static str {
        Self::COLUMNS
            .iter()
            .find(|(key, _, _)| *key == self)
            .map(|(_, _, column)| *column)
            .unwrap_or("articles.created_at")
    }
}

impl FromStr for SortBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::COLUMNS
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(key, _, _)| *key)
            .ok_or_else(|| AppError::invalid(Resource::Query))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::invalid(Resource::Query)),
        }
    }
}

/// Validated `limit`/`page` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: 1,
        }
    }
}

impl PageRequest {
    pub fn new(limit: i64, page: i64) -> AppResult<Self> {
        if !(1..=MAX_LIMIT).contains(&limit) || page < 1 {
            return Err(AppError::invalid(Resource::Query));
        }
        Ok(Self { limit, page })
    }

    /// Parse raw query-string values, applying defaults for absent ones.
    pub fn parse(limit: Option<&str>, page: Option<&str>) -> AppResult<Self> {
        let limit = match limit {
            Some(raw) => parse_number(raw)?,
            None => DEFAULT_LIMIT,
        };
        let page = match page {
            Some(raw) => parse_number(raw)?,
            None => 1,
        };
        Self::new(limit, page)
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn parse_number(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid(Resource::Query))
}

/// Query string of `GET /api/articles`, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub topic: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Query string of paginated child listings such as article comments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl PageQuery {
    pub fn validate(&self) -> AppResult<PageRequest> {
        PageRequest::parse(self.limit.as_deref(), self.page.as_deref())
    }
}

const SUMMARY_COLUMNS: &str = "articles.author, articles.title, articles.article_id, \
     articles.topic, articles.created_at, articles.votes, articles.article_img_url, \
     COUNT(comments.comment_id) AS comment_count";

/// A fully validated article listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleListing {
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub topic: Option<String>,
    pub page: PageRequest,
}

impl ArticleListing {
    pub fn from_query(query: &ArticleListQuery) -> AppResult<Self> {
        let sort_by = match query.sort_by.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortBy::default(),
        };
        let order = match query.order.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };
        let topic = match query.topic.as_deref() {
            Some(raw) if raw.chars().count() > MAX_TOPIC_FILTER_LEN => {
                return Err(AppError::invalid(Resource::Query));
            }
            Some(raw) => Some(raw.to_string()),
            None => None,
        };
        let page = PageRequest::parse(query.limit.as_deref(), query.page.as_deref())?;

        Ok(Self {
            sort_by,
            order,
            topic,
            page,
        })
    }

    /// Appends the optional topic filter, returning the params bound so far.
    fn push_filter(&self, sql: &mut String, dialect: Dialect) -> Vec<SqlParam> {
        let mut params = Vec::new();
        if let Some(topic) = &self.topic {
            params.push(SqlParam::Text(topic.clone()));
            let _ = write!(sql, " WHERE articles.topic = {}", dialect.placeholder(params.len()));
        }
        params
    }

    pub fn select_statement(&self, dialect: Dialect) -> Statement {
        let mut sql = format!(
            "SELECT {} FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id",
            SUMMARY_COLUMNS
        );
        let mut params = self.push_filter(&mut sql, dialect);

        let direction = self.order.keyword();
        let _ = write!(
            sql,
            " GROUP BY articles.article_id ORDER BY {} {}, articles.article_id {}",
            self.sort_by.column(),
            direction,
            direction
        );

        params.push(SqlParam::Int(self.page.limit()));
        let limit_slot = dialect.placeholder(params.len());
        params.push(SqlParam::Int(self.page.offset()));
        let offset_slot = dialect.placeholder(params.len());
        let _ = write!(sql, " LIMIT {} OFFSET {}", limit_slot, offset_slot);

        Statement { sql, params }
    }

    pub fn count_statement(&self, dialect: Dialect) -> Statement {
        let mut sql = "SELECT COUNT(*) AS total_count FROM articles".to_string();
        let params = self.push_filter(&mut sql, dialect);
        Statement { sql, params }
    }
}
