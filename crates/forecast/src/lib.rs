//! `vendra-forecast`
//!
//! **Responsibility:** demand-forecast orchestration boundary.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It never reads stores directly; callers hand it historical
//!   aggregates.
//! - It must not mutate domain state.
//! - The external model is a black box behind [`ForecastModel`]; only the
//!   response shape is contractual.

pub mod cooldown;
pub mod model;
pub mod orchestrator;
pub mod result;

pub use cooldown::{CooldownStore, InMemoryCooldownStore};
pub use model::{
    ForecastModel, HistoricalMonth, HttpForecastModel, ModelError, ModelPrediction, ModelRequest,
    ModelResponse, TrendForecastModel,
};
pub use orchestrator::{ForecastOrchestrator, DEFAULT_CALL_TIMEOUT, DEFAULT_COOLDOWN};
pub use result::{ForecastError, ForecastResult, MonthlyPrediction};
