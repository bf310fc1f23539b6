// Core building blocks shared by stores and handlers

pub mod error_classifier;
pub mod listing;

// Re-export commonly used types
pub use error_classifier::{classify, ErrorClass, Resource};
pub use listing::{
    ArticleListQuery, ArticleListing, Dialect, PageQuery, PageRequest, SortBy, SortOrder,
    SqlParam, Statement,
};
