//! Cafe endpoints
//!
//! Successful responses are wrapped as `{"cafe": ...}`, `{"cafes": [...]}`
//! or `{"message": ...}`.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::db::repos::CafeRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{CafeId, JsonBody, SearchLocation};
use crate::http::server::AppState;
use crate::models::{check_price, Cafe, NewCafe, ValidationError};

/// Payload text for a location search with no match
pub const NO_CAFE_AT_LOCATION: &str = "Sorry, we don't have a cafe at that location.";

/// Cafe response, keys in column order
#[derive(Debug, Serialize)]
pub struct CafeResponse {
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

impl From<Cafe> for CafeResponse {
    fn from(c: Cafe) -> Self {
        Self {
            id: c.id,
            name: c.name,
            map_url: c.map_url,
            img_url: c.img_url,
            location: c.location,
            seats: c.seats,
            has_toilet: c.has_toilet,
            has_wifi: c.has_wifi,
            has_sockets: c.has_sockets,
            can_take_calls: c.can_take_calls,
            coffee_price: c.coffee_price,
        }
    }
}

/// `{"cafe": {...}}`
#[derive(Debug, Serialize)]
pub struct CafeEnvelope {
    pub cafe: CafeResponse,
}

impl From<Cafe> for CafeEnvelope {
    fn from(c: Cafe) -> Self {
        Self { cafe: c.into() }
    }
}

/// `{"cafes": [...]}`
#[derive(Debug, Serialize)]
pub struct CafeListEnvelope {
    pub cafes: Vec<CafeResponse>,
}

/// `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Update price request.
///
/// `coffee_price` must be present; `null` clears the price.
#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    #[serde(default, deserialize_with = "present")]
    pub coffee_price: Option<Option<String>>,
}

/// Distinguish an explicit `null` from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// GET /random - one cafe picked at random
async fn random_cafe(State(state): State<Arc<AppState>>) -> Result<Json<CafeEnvelope>, ApiError> {
    let cafe = CafeRepo::new(&state.pool)
        .random()
        .await?
        .ok_or(ApiError::Empty { resource: "cafes" })?;

    Ok(Json(cafe.into()))
}

/// GET /all - every cafe
async fn list_cafes(State(state): State<Arc<AppState>>) -> Result<Json<CafeListEnvelope>, ApiError> {
    let cafes = CafeRepo::new(&state.pool).list_all().await?;

    Ok(Json(CafeListEnvelope {
        cafes: cafes.into_iter().map(CafeResponse::from).collect(),
    }))
}

/// GET /search?loc= - first cafe at an exact location.
///
/// A miss answers 200 with `{"error": {"Not Found": ...}}`, unlike `/cafe/{id}`.
async fn search_cafes(
    State(state): State<Arc<AppState>>,
    SearchLocation(loc): SearchLocation,
) -> Result<Response, ApiError> {
    let found = match loc.as_deref() {
        Some(loc) => CafeRepo::new(&state.pool).find_by_location(loc).await?,
        None => None,
    };

    let response = match found {
        Some(cafe) => Json(CafeEnvelope::from(cafe)).into_response(),
        None => {
            tracing::debug!(loc = ?loc, "no cafe at location");
            Json(json!({ "error": { "Not Found": NO_CAFE_AT_LOCATION } })).into_response()
        }
    };
    Ok(response)
}

/// POST /cafe - create a cafe from a flat field map
async fn create_cafe(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NewCafe>,
) -> Result<Json<CafeEnvelope>, ApiError> {
    req.validate()?;
    let cafe = CafeRepo::new(&state.pool).create(&req).await?;
    tracing::info!(id = cafe.id, name = %cafe.name, "cafe created");

    Ok(Json(cafe.into()))
}

/// GET /cafe/{id} - a single cafe
async fn get_cafe(
    State(state): State<Arc<AppState>>,
    CafeId(id): CafeId,
) -> Result<Json<CafeEnvelope>, ApiError> {
    let cafe = CafeRepo::new(&state.pool).get(id).await?;
    Ok(Json(cafe.into()))
}

/// PATCH /update-price/{id} - replace the coffee price
async fn update_price(
    State(state): State<Arc<AppState>>,
    CafeId(id): CafeId,
    JsonBody(req): JsonBody<UpdatePriceRequest>,
) -> Result<Json<CafeEnvelope>, ApiError> {
    let price = req.coffee_price.ok_or(ValidationError::Missing {
        field: "coffee_price",
    })?;
    if let Some(p) = &price {
        check_price(p)?;
    }

    let cafe = CafeRepo::new(&state.pool)
        .update_price(id, price.as_deref())
        .await?;
    tracing::info!(id, price = ?cafe.coffee_price, "cafe price updated");

    Ok(Json(cafe.into()))
}

/// DELETE /report-closed/{id} - remove a closed cafe
async fn report_closed(
    State(state): State<Arc<AppState>>,
    CafeId(id): CafeId,
) -> Result<Json<MessageResponse>, ApiError> {
    CafeRepo::new(&state.pool).delete(id).await?;
    tracing::info!(id, "cafe reported closed");

    Ok(Json(MessageResponse {
        message: "Cafe deleted successfully",
    }))
}

/// Cafe routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/random", get(random_cafe))
        .route("/all", get(list_cafes))
        .route("/search", get(search_cafes))
        .route("/cafe", post(create_cafe))
        .route("/cafe/{id}", get(get_cafe))
        .route("/update-price/{id}", patch(update_price))
        .route("/report-closed/{id}", delete(report_closed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> Cafe {
        Cafe {
            id: 3,
            name: "Ace".into(),
            map_url: "https://maps.example.com/ace".into(),
            img_url: "https://img.example.com/ace.jpg".into(),
            location: "Shoreditch".into(),
            seats: "10-20".into(),
            has_toilet: false,
            has_wifi: true,
            has_sockets: true,
            can_take_calls: false,
            coffee_price: None,
        }
    }

    #[test]
    fn response_keeps_column_order_and_null_price() {
        let body = serde_json::to_string(&CafeEnvelope::from(cafe())).unwrap();
        assert!(body.starts_with(r#"{"cafe":{"id":3,"name":"Ace","map_url""#));
        assert!(body.ends_with(r#""can_take_calls":false,"coffee_price":null}}"#));
    }

    #[test]
    fn update_price_distinguishes_null_from_missing() {
        let req: UpdatePriceRequest = serde_json::from_str(r#"{"coffee_price": null}"#).unwrap();
        assert_eq!(req.coffee_price, Some(None));

        let req: UpdatePriceRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.coffee_price, None);

        let req: UpdatePriceRequest =
            serde_json::from_str(r#"{"coffee_price": "£2.80"}"#).unwrap();
        assert_eq!(req.coffee_price, Some(Some("£2.80".into())));
    }
}
