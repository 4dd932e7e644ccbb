//! Command implementations for the cafe CLI

pub mod serve;

pub use serve::run_serve;
