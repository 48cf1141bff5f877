//! Forecast request orchestration.
//!
//! Per request: cooldown precondition, one timed external call, response
//! normalization with derived growth figures. A failed attempt never
//! touches the cooldown timestamp, so failures do not block retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::cooldown::CooldownStore;
use crate::model::{ForecastModel, ModelError, ModelRequest, ModelResponse};
use crate::result::{ForecastError, ForecastResult, MonthlyPrediction};

/// Minimum delay between successful forecasts for one client.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Upper bound on the external call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Model-supplied total growth must land within this many percentage
/// points of the figure derived from the series to be trusted.
const GROWTH_AGREEMENT_PP: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Drives one forecast request end to end.
pub struct ForecastOrchestrator {
    model: Arc<dyn ForecastModel>,
    cooldown_store: Arc<dyn CooldownStore>,
    cooldown: Duration,
    call_timeout: Duration,
}

impl ForecastOrchestrator {
    pub fn new(model: Arc<dyn ForecastModel>, cooldown_store: Arc<dyn CooldownStore>) -> Self {
        Self {
            model,
            cooldown_store,
            cooldown: DEFAULT_COOLDOWN,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Run one forecast request.
    ///
    /// The cooldown check short-circuits before the model is contacted;
    /// the timestamp is updated only after a normalized success.
    pub async fn forecast(&self, request: ModelRequest) -> Result<ForecastResult, ForecastError> {
        if let Some(remaining) = self.cooldown_remaining() {
            return Err(ForecastError::CooldownActive {
                remaining_seconds: remaining.as_secs().max(1),
            });
        }

        let response = match tokio::time::timeout(
            self.call_timeout,
            self.model.forecast(&request),
        )
        .await
        {
            Err(_) => {
                warn!(
                    timeout_secs = self.call_timeout.as_secs(),
                    "forecast call timed out"
                );
                return Err(ForecastError::Unavailable(
                    "forecast call timed out".to_string(),
                ));
            }
            Ok(Err(e)) => return Err(classify(e)),
            Ok(Ok(response)) => response,
        };

        let result = normalize(response)?;
        self.cooldown_store.record_success(Instant::now());
        debug!(months = result.predictions.len(), "forecast succeeded");
        Ok(result)
    }

    fn cooldown_remaining(&self) -> Option<Duration> {
        let elapsed = self.cooldown_store.last_success()?.elapsed();
        (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
    }
}

fn classify(err: ModelError) -> ForecastError {
    match err {
        ModelError::Unavailable(msg) => ForecastError::Unavailable(msg),
        ModelError::RateLimited(msg) => ForecastError::RateLimited(msg),
        ModelError::QuotaExceeded(msg) => ForecastError::QuotaExceeded(msg),
        ModelError::Other(msg) => ForecastError::Unknown(msg),
    }
}

/// Validate the model payload and derive the growth figures.
fn normalize(response: ModelResponse) -> Result<ForecastResult, ForecastError> {
    if response.predictions.is_empty() {
        return Err(ForecastError::InvalidResponse(
            "model returned no monthly predictions".to_string(),
        ));
    }

    let mut predictions = Vec::with_capacity(response.predictions.len());
    let mut prev: Option<Decimal> = None;
    for p in response.predictions {
        let mom_change_pct = match prev {
            Some(previous) => pct_change(previous, p.revenue),
            None => Decimal::ZERO,
        };
        prev = Some(p.revenue);
        predictions.push(MonthlyPrediction {
            label: p.label,
            revenue: p.revenue,
            mom_change_pct,
        });
    }

    let first = predictions.first().map(|p| p.revenue).unwrap_or_default();
    let last = predictions.last().map(|p| p.revenue).unwrap_or_default();
    let derived = pct_change(first, last);

    // Model-supplied growth wins only when it agrees with its own series.
    let total_growth_pct = match response.total_growth_pct {
        Some(supplied) if (supplied - derived).abs() <= GROWTH_AGREEMENT_PP => supplied,
        _ => derived,
    };

    Ok(ForecastResult {
        predictions,
        total_growth_pct,
        insights: response.insights,
        recommendations: response.recommendations,
    })
}

/// Percentage change, 0 when the base is 0.
fn pct_change(prev: Decimal, current: Decimal) -> Decimal {
    if prev.is_zero() {
        return Decimal::ZERO;
    }
    ((current - prev) / prev * Decimal::ONE_HUNDRED).round_dp(2)
}
