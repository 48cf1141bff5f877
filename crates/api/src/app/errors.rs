use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use vendra_analytics::period::PeriodError;
use vendra_analytics::source::SourceError;
use vendra_forecast::ForecastError;

/// Input-validation failures are the caller's to fix: always 400.
pub fn period_error_to_response(err: PeriodError) -> axum::response::Response {
    let code = match &err {
        PeriodError::InvalidPeriod(_) => "invalid_period",
        PeriodError::InvalidMonth(_) => "invalid_month",
        PeriodError::InvalidWeek(_) => "invalid_week",
    };
    json_error(StatusCode::BAD_REQUEST, code, err.to_string())
}

pub fn source_error_to_response(err: SourceError) -> axum::response::Response {
    match err {
        SourceError::Unsupported(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_mode", err.to_string())
        }
        SourceError::Store(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

/// Forecast failures keep their classification and carry the suggested
/// actions for the caller to render.
pub fn forecast_error_to_response(err: ForecastError) -> axum::response::Response {
    let status = match &err {
        ForecastError::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        axum::Json(json!({
            "error": err.kind(),
            "message": err.to_string(),
            "suggested_actions": err.suggested_actions(),
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
