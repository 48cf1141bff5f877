use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One predicted month, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPrediction {
    /// Period label as supplied by the model (e.g. `"2026-01"`).
    pub label: String,
    pub revenue: Decimal,
    /// Percentage change vs the previous predicted month; 0 for the first
    /// entry and whenever the previous value is 0.
    pub mom_change_pct: Decimal,
}

/// Normalized forecast payload handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub predictions: Vec<MonthlyPrediction>,
    /// Percentage change from the first to the last predicted month.
    pub total_growth_pct: Decimal,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Forecast failure, classified for user messaging.
///
/// Classification only changes the guidance shown to the user; control
/// flow is identical for every variant (fail fast, surface the details).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// A successful forecast completed less than the cooldown window ago.
    /// Raised before any external call is attempted.
    #[error("forecast cooldown active; retry in {remaining_seconds}s")]
    CooldownActive { remaining_seconds: u64 },

    #[error("forecasting model unavailable: {0}")]
    Unavailable(String),

    #[error("forecasting model busy: {0}")]
    RateLimited(String),

    #[error("forecasting quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The model answered, but with an empty or malformed prediction
    /// sequence.
    #[error("unusable forecast response: {0}")]
    InvalidResponse(String),

    #[error("forecast failed: {0}")]
    Unknown(String),
}

impl ForecastError {
    /// Stable machine-readable kind for API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::CooldownActive { .. } => "cooldown_active",
            ForecastError::Unavailable(_) => "model_unavailable",
            ForecastError::RateLimited(_) => "rate_limited",
            ForecastError::QuotaExceeded(_) => "quota_exceeded",
            ForecastError::InvalidResponse(_) => "invalid_response",
            ForecastError::Unknown(_) => "unknown",
        }
    }

    /// What the user can do about it.
    pub fn suggested_actions(&self) -> &'static [&'static str] {
        match self {
            ForecastError::CooldownActive { .. } => {
                &["Wait for the cooldown to elapse before requesting another forecast."]
            }
            ForecastError::Unavailable(_) => &[
                "Retry in a few minutes.",
                "Check the forecasting endpoint configuration.",
            ],
            ForecastError::RateLimited(_) => &[
                "Wait before retrying.",
                "Reduce how often forecasts are requested.",
            ],
            ForecastError::QuotaExceeded(_) => &[
                "Review the forecasting plan or quota.",
                "Retry after the quota window resets.",
            ],
            ForecastError::InvalidResponse(_) | ForecastError::Unknown(_) => &[
                "Retry the request.",
                "Contact support if the problem persists.",
            ],
        }
    }
}
