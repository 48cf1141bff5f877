use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use vendra_forecast::ModelRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Widest forecast horizon the API accepts.
const MAX_PERIODS: u32 = 24;

/// Most history the API will aggregate per request.
const MAX_HISTORICAL_MONTHS: u32 = 36;

pub fn router() -> Router {
    Router::new().route("/forecast", post(forecast))
}

#[derive(Debug, Deserialize)]
pub struct ForecastBody {
    pub periods: u32,
    pub historical_months: u32,
}

pub async fn forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ForecastBody>,
) -> axum::response::Response {
    if body.periods == 0 || body.periods > MAX_PERIODS {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_periods",
            format!("periods must be between 1 and {MAX_PERIODS}"),
        );
    }
    if body.historical_months == 0 || body.historical_months > MAX_HISTORICAL_MONTHS {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_historical_months",
            format!("historical_months must be between 1 and {MAX_HISTORICAL_MONTHS}"),
        );
    }

    let history = match services.historical_series(body.historical_months) {
        Ok(h) => h,
        Err(e) => return errors::source_error_to_response(e),
    };

    let request = ModelRequest {
        periods: body.periods,
        history,
    };

    match services.forecaster.forecast(request).await {
        Ok(result) => (StatusCode::OK, Json(dto::forecast_to_json(&result))).into_response(),
        Err(e) => errors::forecast_error_to_response(e),
    }
}
