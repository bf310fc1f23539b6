// HTTP surface: handlers and the routing table

pub mod handlers;
pub mod routes;

pub use routes::create_news_router;
