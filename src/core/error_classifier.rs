// Error Classifier - single source of user-facing error text
// Every accessor and handler builds its rejection message through `classify`.

use axum::http::StatusCode;
use std::fmt;

/// Status classes that carry a resource-specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
}

impl ErrorClass {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorClass::BadRequest => StatusCode::BAD_REQUEST,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Names used in rejection messages. `Vote`, `Query` and `Path` are not tables but
/// still get their own wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Article,
    Comment,
    Topic,
    User,
    Vote,
    Query,
    Path,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Article => "article",
            Resource::Comment => "comment",
            Resource::Topic => "topic",
            Resource::User => "user",
            Resource::Vote => "vote",
            Resource::Query => "query",
            Resource::Path => "path",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const INVALID_VOTE_MSG: &str =
    "The sent vote obj was invalid. Did someone say election interference?";
pub const INVALID_COMMENT_MSG: &str = "Keep invalid comments to yourself";
pub const INVALID_QUERY_MSG: &str =
    "There are no bad questions, but there are bad queries, much like the one you just entered.";
pub const UNMATCHED_PATH_MSG: &str = "That path doesn't exist on this server! :(";

pub fn classify(class: ErrorClass, resource: Resource) -> String {
    match class {
        ErrorClass::NotFound => format!("{} doesn't exist! (yet...)", resource),
        ErrorClass::BadRequest => match resource {
            Resource::Vote => INVALID_VOTE_MSG.to_string(),
            Resource::Comment => INVALID_COMMENT_MSG.to_string(),
            Resource::Query => INVALID_QUERY_MSG.to_string(),
            other => format!("Invalid {}!", other),
        },
    }
}
