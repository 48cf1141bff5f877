//! Forecasting model contract and implementations.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One month of historical aggregates handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMonth {
    /// `"YYYY-MM"` label.
    pub label: String,
    pub revenue: Decimal,
    pub orders: u64,
    pub units: u64,
}

/// Forecast request forwarded to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Months to predict.
    pub periods: u32,
    /// Historical series, oldest first.
    pub history: Vec<HistoricalMonth>,
}

/// Raw model prediction entry, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub label: String,
    pub revenue: Decimal,
}

/// Structured response contract for the black-box model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelResponse {
    pub predictions: Vec<ModelPrediction>,
    #[serde(default)]
    pub total_growth_pct: Option<Decimal>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Transport-level model failure.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("model rate limited: {0}")]
    RateLimited(String),

    #[error("model quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("model call failed: {0}")]
    Other(String),
}

/// Black-box forecasting model.
#[async_trait]
pub trait ForecastModel: Send + Sync {
    async fn forecast(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError>;
}

/// JSON-over-HTTP model client.
///
/// Posts the request as JSON and expects a [`ModelResponse`]-shaped body.
/// The timeout is enforced both here (client-level) and by the
/// orchestrator wrapping the call.
pub struct HttpForecastModel {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpForecastModel {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Other(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl ForecastModel for HttpForecastModel {
    async fn forecast(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let mut call = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Unavailable("forecast request timed out".to_string())
            } else if e.is_connect() {
                ModelError::Unavailable(format!("cannot reach forecasting endpoint: {e}"))
            } else {
                ModelError::Other(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ModelResponse>()
                .await
                .map_err(|e| ModelError::Other(format!("undecodable forecast payload: {e}")));
        }

        match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                Err(ModelError::RateLimited("endpoint returned 429".to_string()))
            }
            reqwest::StatusCode::PAYMENT_REQUIRED => {
                Err(ModelError::QuotaExceeded("endpoint returned 402".to_string()))
            }
            s if s.is_server_error() => {
                Err(ModelError::Unavailable(format!("endpoint returned {s}")))
            }
            s => Err(ModelError::Other(format!("endpoint returned {s}"))),
        }
    }
}

/// Deterministic local fallback: least-squares linear trend over the
/// historical revenue series, extrapolated `periods` months ahead.
///
/// Used when no external endpoint is configured, which keeps development
/// and tests offline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendForecastModel;

#[async_trait]
impl ForecastModel for TrendForecastModel {
    async fn forecast(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        if request.history.len() < 2 {
            return Err(ModelError::Other(
                "need at least 2 historical months to fit a trend".to_string(),
            ));
        }

        let points: Vec<(f64, f64)> = request
            .history
            .iter()
            .enumerate()
            .map(|(i, m)| (i as f64, m.revenue.to_f64().unwrap_or(0.0)))
            .collect();
        let (slope, intercept) = least_squares(&points);

        let last_label = request
            .history
            .last()
            .map(|m| m.label.as_str())
            .unwrap_or_default();
        let labels = next_month_labels(last_label, request.periods);

        let last_x = (points.len() - 1) as f64;
        let predictions = labels
            .into_iter()
            .enumerate()
            .map(|(k, label)| {
                let y = (slope * (last_x + (k + 1) as f64) + intercept).max(0.0);
                ModelPrediction {
                    label,
                    revenue: Decimal::from_f64(y).unwrap_or_default().round_dp(2),
                }
            })
            .collect();

        Ok(ModelResponse {
            predictions,
            total_growth_pct: None,
            insights: vec![format!(
                "Projection fitted on {} months of history; revenue trend is {}.",
                request.history.len(),
                if slope > 0.0 { "upward" } else if slope < 0.0 { "downward" } else { "flat" }
            )],
            recommendations: vec![
                "Treat the trend projection as a baseline; connect a forecasting endpoint for seasonality-aware predictions.".to_string(),
            ],
        })
    }
}

/// Best-fit line through `points`; a degenerate spread falls back to the
/// series mean.
fn least_squares(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.0).sum();
    let sum_y: f64 = points.iter().map(|p| p.1).sum();
    let sum_xx: f64 = points.iter().map(|p| p.0 * p.0).sum();
    let sum_xy: f64 = points.iter().map(|p| p.0 * p.1).sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return (0.0, sum_y / n);
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}

/// Continue a `"YYYY-MM"` label sequence; falls back to relative labels
/// when the last historical label is not in that shape.
fn next_month_labels(last_label: &str, count: u32) -> Vec<String> {
    let parsed = last_label
        .split_once('-')
        .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)))
        .filter(|&(_, m)| (1..=12).contains(&m));

    match parsed {
        Some((year, month)) => (1..=count)
            .map(|k| {
                let total = year * 12 + (month as i32 - 1) + k as i32;
                let y = total.div_euclid(12);
                let m = total.rem_euclid(12) + 1;
                format!("{y:04}-{m:02}")
            })
            .collect(),
        None => (1..=count).map(|k| format!("+{k}")).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn month(label: &str, revenue: Decimal) -> HistoricalMonth {
        HistoricalMonth {
            label: label.to_string(),
            revenue,
            orders: 10,
            units: 25,
        }
    }

    #[tokio::test]
    async fn extrapolates_a_linear_series() {
        let request = ModelRequest {
            periods: 2,
            history: vec![month("2025-01", dec!(100)), month("2025-02", dec!(200))],
        };

        let response = TrendForecastModel.forecast(&request).await.unwrap();
        assert_eq!(response.predictions.len(), 2);
        assert_eq!(response.predictions[0].label, "2025-03");
        assert_eq!(response.predictions[0].revenue, dec!(300));
        assert_eq!(response.predictions[1].label, "2025-04");
        assert_eq!(response.predictions[1].revenue, dec!(400));
    }

    #[tokio::test]
    async fn never_predicts_negative_revenue() {
        let request = ModelRequest {
            periods: 3,
            history: vec![month("2025-01", dec!(200)), month("2025-02", dec!(50))],
        };

        let response = TrendForecastModel.forecast(&request).await.unwrap();
        assert!(response
            .predictions
            .iter()
            .all(|p| p.revenue >= Decimal::ZERO));
    }

    #[tokio::test]
    async fn refuses_a_single_data_point() {
        let request = ModelRequest {
            periods: 1,
            history: vec![month("2025-01", dec!(100))],
        };
        assert!(TrendForecastModel.forecast(&request).await.is_err());
    }

    #[test]
    fn month_labels_roll_over_the_year_end() {
        assert_eq!(
            next_month_labels("2025-11", 3),
            vec!["2025-12", "2026-01", "2026-02"]
        );
    }

    #[test]
    fn unparseable_labels_become_relative() {
        assert_eq!(next_month_labels("last month", 2), vec!["+1", "+2"]);
    }
}
