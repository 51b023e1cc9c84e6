/// Blog Service Library
///
/// A social-blogging web service: accounts with cookie sessions, posts
/// addressed by id and slug, threaded comments, likes and a follow graph.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers producing redirects and page documents
/// - `routes`: URL table
/// - `models`: Data structures for users, posts, comments, votes and relations
/// - `services`: Business logic layer
/// - `db`: Repository trait with PostgreSQL and in-memory implementations
/// - `middleware`: Session resolution and ownership checks
/// - `validators`: Form input and field validation
/// - `security`: Password hashing and session tokens
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `telemetry`: Tracing subscriber setup
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod telemetry;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};

use config::SessionConfig;
use db::BlogRepository;
use std::sync::Arc;

/// Shared state handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BlogRepository>,
    pub session: SessionConfig,
}

impl AppState {
    pub fn new(repo: Arc<dyn BlogRepository>, session: SessionConfig) -> Self {
        Self { repo, session }
    }
}
