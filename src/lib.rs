pub mod api_docs;
pub mod app;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod knowledge_base;
pub mod lifecycle;
pub mod middleware;
pub mod notifications;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod static_service;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
