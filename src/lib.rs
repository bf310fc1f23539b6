// News API - articles, topics, comments and users over a relational store

// Error classification and the article listing query builder
pub mod core;

// Records and request payloads
pub mod models;

// Store interface with PostgreSQL and SQLite implementations
pub mod infrastructure;

// HTTP handlers and routing table
pub mod api;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;
pub mod data_seeder;

// Re-exports for convenience
pub use error::{AppError, AppResult};
