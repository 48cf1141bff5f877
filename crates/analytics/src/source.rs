//! Metrics source abstraction.
//!
//! Aggregation can read raw invoice rows or pre-rolled monthly fact rows.
//! Both strategies sit behind one trait; the caller picks a mode per
//! request and the capability flags say what a given source can honor.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::period::{Month, Period};
use vendra_sales::InvoiceView;

/// What a [`MetricsSource`] implementation can serve.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SourceCapabilities {
    pub raw: bool,
    pub rollup: bool,
}

/// Which aggregation path the caller wants for a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    Raw,
    Rollup,
}

/// Pre-aggregated monthly fact row.
///
/// Carries only scalar rollups; line-item detail (top products/customers)
/// is not recoverable from this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRollup {
    pub year: i32,
    pub month: Month,
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub total_units: u64,
    pub avg_order_value: Decimal,
    pub bulk_orders_count: u64,
    pub bulk_orders_amount: Decimal,
    pub new_customers: u64,
}

/// Errors surfaced by metrics sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The caller asked for a path this source cannot serve.
    #[error("aggregation mode not supported by this source: {0:?}")]
    Unsupported(AggregationMode),

    /// The backing store failed; propagated rather than hung.
    #[error("metrics store error: {0}")]
    Store(String),
}

/// Read access to the transactional data feeding aggregation.
///
/// Implementations answer from a snapshot of the store's current state;
/// no ordering is promised across calls.
pub trait MetricsSource: Send + Sync {
    fn capabilities(&self) -> SourceCapabilities;

    /// Invoices with `invoice_date` inside the period (bounds inclusive).
    fn invoices_in(&self, period: &Period) -> Result<Vec<InvoiceView>, SourceError>;

    /// Monthly fact rows whose month overlaps the period.
    fn rollups_in(&self, period: &Period) -> Result<Vec<MonthlyRollup>, SourceError>;

    /// Years present in the data, descending.
    fn years(&self) -> Result<Vec<i32>, SourceError>;

    /// Months with data in `year`, calendar order.
    fn months(&self, year: i32) -> Result<Vec<Month>, SourceError>;
}

impl<T: MetricsSource + ?Sized> MetricsSource for Arc<T> {
    fn capabilities(&self) -> SourceCapabilities {
        (**self).capabilities()
    }

    fn invoices_in(&self, period: &Period) -> Result<Vec<InvoiceView>, SourceError> {
        (**self).invoices_in(period)
    }

    fn rollups_in(&self, period: &Period) -> Result<Vec<MonthlyRollup>, SourceError> {
        (**self).rollups_in(period)
    }

    fn years(&self) -> Result<Vec<i32>, SourceError> {
        (**self).years()
    }

    fn months(&self, year: i32) -> Result<Vec<Month>, SourceError> {
        (**self).months(year)
    }
}
