//! cafe-server: REST API over a single table of cafes
//!
//! Exposes listing, random pick, location search, creation,
//! price update and deletion over HTTP, backed by SQLite.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, CafeRepo, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
pub use models::{Cafe, NewCafe, ValidationError};
