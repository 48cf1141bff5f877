//! Service wiring for the API.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};

use vendra_analytics::aggregate::MetricsAggregator;
use vendra_analytics::memory::InMemoryMetricsSource;
use vendra_analytics::period::{month_period, Month};
use vendra_analytics::source::{AggregationMode, SourceError};
use vendra_forecast::{
    ForecastModel, ForecastOrchestrator, HistoricalMonth, HttpForecastModel,
    InMemoryCooldownStore, TrendForecastModel, DEFAULT_CALL_TIMEOUT,
};

pub struct AppServices {
    pub source: Arc<InMemoryMetricsSource>,
    pub aggregator: MetricsAggregator<Arc<InMemoryMetricsSource>>,
    pub forecaster: ForecastOrchestrator,
}

/// Default wiring: empty in-memory source, env-configured forecaster.
pub fn build_services() -> AppServices {
    build_services_with_source(Arc::new(InMemoryMetricsSource::new()))
}

/// Wiring with a caller-supplied source (tests seed their own data).
pub fn build_services_with_source(source: Arc<InMemoryMetricsSource>) -> AppServices {
    let aggregator = MetricsAggregator::new(source.clone());

    let call_timeout = std::env::var("FORECAST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_CALL_TIMEOUT);

    let model: Arc<dyn ForecastModel> = match std::env::var("FORECAST_ENDPOINT") {
        Ok(endpoint) => match HttpForecastModel::new(
            endpoint,
            std::env::var("FORECAST_API_KEY").ok(),
            call_timeout,
        ) {
            Ok(model) => Arc::new(model),
            Err(e) => {
                tracing::warn!("failed to build http forecast model ({e}); using local trend model");
                Arc::new(TrendForecastModel)
            }
        },
        Err(_) => {
            tracing::info!("FORECAST_ENDPOINT not set; using local trend model");
            Arc::new(TrendForecastModel)
        }
    };

    let forecaster = ForecastOrchestrator::new(model, Arc::new(InMemoryCooldownStore::new()))
        .with_call_timeout(call_timeout);

    AppServices {
        source,
        aggregator,
        forecaster,
    }
}

impl AppServices {
    /// Monthly aggregates for the trailing `months` months (current month
    /// included), oldest first. Feeds the forecaster.
    pub fn historical_series(&self, months: u32) -> Result<Vec<HistoricalMonth>, SourceError> {
        let today = Utc::now().date_naive();

        let mut series = Vec::with_capacity(months as usize);
        for offset in (0..months).rev() {
            let (year, month) = shift_month_back(today.year(), today.month(), offset);
            let month = Month::from_number(month)
                .ok_or_else(|| SourceError::Store(format!("month {month} out of range")))?;
            let period = month_period(year, month)
                .map_err(|e| SourceError::Store(e.to_string()))?;

            let result = self.aggregator.aggregate(&period, AggregationMode::Raw)?;
            series.push(HistoricalMonth {
                label: format!("{year:04}-{:02}", month.number()),
                revenue: result.total_revenue,
                orders: result.total_orders,
                units: result.total_units,
            });
        }
        Ok(series)
    }
}

/// `(year, month)` of the month `back` months before `(year, month)`.
fn shift_month_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) - back as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}
