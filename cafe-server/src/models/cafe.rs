//! Cafe record and creation payload
//!
//! Column limits match the `cafe` table: 250 characters for short text,
//! 500 for the two URL columns.

use serde::Deserialize;
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for short text columns
pub const MAX_TEXT_LEN: usize = 250;

/// Maximum length for map/image URL columns
pub const MAX_URL_LEN: usize = 500;

/// A persisted cafe row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Cafe {
    pub id: i64,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

/// Flat field map accepted by `POST /cafe`.
///
/// Keys must match the record fields exactly; unknown keys are rejected
/// and every field except `coffee_price` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    #[serde(default)]
    pub coffee_price: Option<String>,
}

impl NewCafe {
    /// Check required text is present and every column fits its limit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name, MAX_TEXT_LEN)?;
        check_text("map_url", &self.map_url, MAX_URL_LEN)?;
        check_text("img_url", &self.img_url, MAX_URL_LEN)?;
        check_text("location", &self.location, MAX_TEXT_LEN)?;
        check_text("seats", &self.seats, MAX_TEXT_LEN)?;
        if let Some(price) = &self.coffee_price {
            check_price(price)?;
        }
        Ok(())
    }
}

/// Validate a coffee price. Empty strings are allowed, the column is free-form.
pub fn check_price(price: &str) -> Result<(), ValidationError> {
    if price.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "coffee_price",
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
