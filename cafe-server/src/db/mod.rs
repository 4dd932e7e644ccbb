//! Database layer - connection pool, migrations and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - One statement per operation, committed by SQLite autocommit
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_memory_pool, create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
