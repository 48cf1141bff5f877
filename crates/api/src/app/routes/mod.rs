use axum::Router;

pub mod analytics;
pub mod forecast;
pub mod system;

/// Router for all analytics endpoints.
pub fn router() -> Router {
    Router::new().nest("/analytics", analytics::router().merge(forecast::router()))
}
