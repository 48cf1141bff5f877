use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use vendra_analytics::period::{self, Month};
use vendra_analytics::source::{AggregationMode, MetricsSource};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/years", get(years))
        .route("/months", get(months))
        .route("/weeks", get(weeks))
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    year: Option<String>,
    month: Option<String>,
    week: Option<String>,
    mode: Option<String>,
}

pub async fn metrics(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<MetricsQuery>,
) -> axum::response::Response {
    let selected = match period::resolve(q.year.as_deref(), q.month.as_deref(), q.week.as_deref())
    {
        Ok(p) => p,
        Err(e) => return errors::period_error_to_response(e),
    };

    let mode = match q.mode.as_deref() {
        None | Some("raw") => AggregationMode::Raw,
        Some("rollup") => AggregationMode::Rollup,
        Some(other) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_mode",
                format!("mode must be \"raw\" or \"rollup\", got {other:?}"),
            )
        }
    };

    match services.aggregator.aggregate(&selected, mode) {
        Ok(result) => (StatusCode::OK, Json(dto::aggregation_to_json(&result))).into_response(),
        Err(e) => errors::source_error_to_response(e),
    }
}

pub async fn years(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.source.years() {
        Ok(years) => {
            let items: Vec<String> = years.iter().map(i32::to_string).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::source_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    year: Option<String>,
}

pub async fn months(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<MonthsQuery>,
) -> axum::response::Response {
    let year = match parse_year(q.year.as_deref()) {
        Ok(y) => y,
        Err(resp) => return resp,
    };

    match services.source.months(year) {
        Ok(months) => {
            let items: Vec<&str> = months.iter().map(|m| m.name()).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::source_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct WeeksQuery {
    year: Option<String>,
    month: Option<String>,
}

/// Valid week numbers, computed purely from calendar length. Independent
/// of whether any data exists in those weeks.
pub async fn weeks(Query(q): Query<WeeksQuery>) -> axum::response::Response {
    let year = match parse_year(q.year.as_deref()) {
        Ok(y) => y,
        Err(resp) => return resp,
    };

    let month = match q.month.as_deref().and_then(Month::from_name) {
        Some(m) => m,
        None => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_month",
                format!("month must be a full month name, got {:?}", q.month),
            )
        }
    };

    let items = period::available_weeks(year, month);
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

fn parse_year(year: Option<&str>) -> Result<i32, axum::response::Response> {
    year.and_then(|y| y.trim().parse().ok()).ok_or_else(|| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_period",
            "year is required and must be numeric",
        )
    })
}
