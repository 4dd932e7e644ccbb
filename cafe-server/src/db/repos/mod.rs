//! Repository implementations for database access
//!
//! Repositories borrow the pool and map constraint failures
//! to DbError instead of checking before writing.

pub mod cafes;

pub use cafes::{CafeRepo, DbError};
