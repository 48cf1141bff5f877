//! `vendra-analytics` — sales & customer analytics aggregation.
//!
//! **Responsibility:** convert raw, line-item-level invoice data into
//! period-bucketed business metrics.
//!
//! The pipeline is deliberately read-only and two-phase:
//! period resolution → per-invoice revenue attribution → cross-invoice
//! reduction. Attribution always runs before any grouping; mixing line
//! subtotals across invoices corrupts the discount ratios.

pub mod aggregate;
pub mod attribution;
pub mod memory;
pub mod period;
pub mod sanity;
pub mod source;

pub use aggregate::{
    AggregationResult, CategoryRevenue, CustomerSales, MetricsAggregator, ProductSales,
    BULK_ORDER_THRESHOLD, TOP_N,
};
pub use attribution::{attribute, AttributedLine};
pub use memory::InMemoryMetricsSource;
pub use period::{available_weeks, resolve, Granularity, Month, Period, PeriodError};
pub use sanity::sanitize_bulk_average;
pub use source::{AggregationMode, MetricsSource, MonthlyRollup, SourceCapabilities, SourceError};
