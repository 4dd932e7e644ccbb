//! Landing page

use axum::{response::Html, routing::get, Router};

/// Static landing page compiled into the binary
const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// GET /
async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Landing page routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(home))
}
