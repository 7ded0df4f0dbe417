//! Static pages served outside the JSON API.

use axum::response::Html;

const LANDING_PAGE: &str = include_str!("../assets/index.html");

/// Store landing page
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}
