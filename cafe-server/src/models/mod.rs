//! Domain models
//!
//! Request payloads are validated before they reach the store.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod cafe;

pub use validation::ValidationError;
pub use cafe::{check_price, Cafe, NewCafe, MAX_TEXT_LEN, MAX_URL_LEN};
