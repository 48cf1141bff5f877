//! Period metrics aggregation.
//!
//! The raw path is a two-phase pipeline: every invoice is attributed
//! first (discount scaled back onto its own lines), producing an explicit
//! intermediate collection, and only then are the attributed rows grouped
//! across invoices. The rollup path sums pre-aggregated monthly fact rows
//! into the same result shape.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::attribution::{attribute, AttributedLine};
use crate::period::Period;
use crate::sanity::sanitize_bulk_average;
use crate::source::{AggregationMode, MetricsSource, MonthlyRollup, SourceError};
use vendra_core::CustomerId;
use vendra_sales::InvoiceView;

/// Invoices at or above this total count as bulk (wholesale proxy).
pub const BULK_ORDER_THRESHOLD: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Rows kept in the ranked product/customer lists.
pub const TOP_N: usize = 10;

/// Ranked product row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub model_number: String,
    pub category: String,
    /// Distinct invoices containing the product.
    pub order_count: u64,
    pub units: u64,
    /// Realized (post-discount) revenue.
    pub revenue: Decimal,
}

/// Ranked bulk-customer row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSales {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub bulk_orders_count: u64,
    pub bulk_orders_amount: Decimal,
    pub average_bulk_order_value: Decimal,
    /// Comma-joined distinct model numbers bought in bulk orders.
    pub products: String,
}

/// Realized revenue per product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
}

/// All computed metrics for one period.
///
/// Derived per request; callers may cache it, the engine never does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub period: Period,
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub total_units: u64,
    pub avg_order_value: Decimal,
    pub new_customers: u64,
    pub bulk_orders_count: u64,
    pub bulk_orders_amount: Decimal,
    pub avg_bulk_order_value: Decimal,
    pub top_products: Vec<ProductSales>,
    pub top_customers: Vec<CustomerSales>,
    pub category_revenue: Vec<CategoryRevenue>,
}

/// Aggregates metrics from a [`MetricsSource`].
pub struct MetricsAggregator<S> {
    source: S,
}

impl<S: MetricsSource> MetricsAggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Aggregate one period through the requested path.
    ///
    /// The mode is caller-selected per request; asking for a path the
    /// source cannot serve is an input error, not a fallback.
    pub fn aggregate(
        &self,
        period: &Period,
        mode: AggregationMode,
    ) -> Result<AggregationResult, SourceError> {
        let caps = self.source.capabilities();
        match mode {
            AggregationMode::Raw if caps.raw => {
                let invoices = self.source.invoices_in(period)?;
                debug!(
                    invoices = invoices.len(),
                    start = %period.start,
                    end = %period.end,
                    "aggregating raw invoice rows"
                );
                Ok(aggregate_invoices(&invoices, period))
            }
            AggregationMode::Rollup if caps.rollup => {
                let rollups = self.source.rollups_in(period)?;
                debug!(
                    rollups = rollups.len(),
                    start = %period.start,
                    end = %period.end,
                    "aggregating monthly fact rows"
                );
                Ok(aggregate_rollups(&rollups, period))
            }
            _ => Err(SourceError::Unsupported(mode)),
        }
    }
}

/// Raw-row aggregation over invoices already filtered to the period.
pub fn aggregate_invoices(invoices: &[InvoiceView], period: &Period) -> AggregationResult {
    let total_orders = invoices.len() as u64;
    let total_revenue: Decimal = invoices.iter().map(|i| i.total_amount).sum();
    let total_units: u64 = invoices.iter().map(InvoiceView::unit_count).sum();
    let avg_order_value = if total_orders > 0 {
        total_revenue / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    };

    // A customer is new relative to the invoice month, not the period
    // start: created-at month == invoice month.
    let new_customers = invoices
        .iter()
        .filter(|i| {
            i.customer.created_at.year() == i.invoice_date.year()
                && i.customer.created_at.month() == i.invoice_date.month()
        })
        .map(|i| i.customer.id)
        .collect::<HashSet<CustomerId>>()
        .len() as u64;

    let bulk: Vec<&InvoiceView> = invoices
        .iter()
        .filter(|i| i.total_amount >= BULK_ORDER_THRESHOLD)
        .collect();
    let bulk_orders_count = bulk.len() as u64;
    let bulk_orders_amount: Decimal = bulk.iter().map(|i| i.total_amount).sum();
    let avg_bulk_order_value =
        sanitize_bulk_average(bulk_orders_count, bulk_orders_amount, total_orders);

    // Phase one: attribute every invoice before any cross-invoice grouping.
    let attributed: Vec<AttributedLine> = invoices.iter().flat_map(attribute).collect();

    AggregationResult {
        period: period.clone(),
        total_revenue,
        total_orders,
        total_units,
        avg_order_value,
        new_customers,
        bulk_orders_count,
        bulk_orders_amount,
        avg_bulk_order_value,
        top_products: rank_products(&attributed),
        top_customers: rank_bulk_customers(&bulk, total_orders),
        category_revenue: rank_categories(&attributed),
    }
}

/// Rollup aggregation: SUM the scalar columns, AVG the per-month average
/// order value. Line-item detail is not recoverable, so the ranked lists
/// stay empty; the result shape is identical to the raw path.
pub fn aggregate_rollups(rollups: &[MonthlyRollup], period: &Period) -> AggregationResult {
    let months = rollups.len() as u64;
    let total_revenue: Decimal = rollups.iter().map(|r| r.total_revenue).sum();
    let total_orders: u64 = rollups.iter().map(|r| r.total_orders).sum();
    let total_units: u64 = rollups.iter().map(|r| r.total_units).sum();
    let avg_order_value = if months > 0 {
        rollups.iter().map(|r| r.avg_order_value).sum::<Decimal>() / Decimal::from(months)
    } else {
        Decimal::ZERO
    };
    let new_customers: u64 = rollups.iter().map(|r| r.new_customers).sum();
    let bulk_orders_count: u64 = rollups.iter().map(|r| r.bulk_orders_count).sum();
    let bulk_orders_amount: Decimal = rollups.iter().map(|r| r.bulk_orders_amount).sum();

    AggregationResult {
        period: period.clone(),
        total_revenue,
        total_orders,
        total_units,
        avg_order_value,
        new_customers,
        bulk_orders_count,
        bulk_orders_amount,
        avg_bulk_order_value: sanitize_bulk_average(
            bulk_orders_count,
            bulk_orders_amount,
            total_orders,
        ),
        top_products: Vec::new(),
        top_customers: Vec::new(),
        category_revenue: Vec::new(),
    }
}

#[derive(Default)]
struct ProductAccumulator {
    invoices: BTreeSet<vendra_core::InvoiceId>,
    units: u64,
    revenue: Decimal,
}

/// Phase two for products: group attributed rows by (model, category),
/// rank by distinct-invoice count descending, model number ascending on
/// ties.
fn rank_products(attributed: &[AttributedLine]) -> Vec<ProductSales> {
    let mut groups: BTreeMap<(String, String), ProductAccumulator> = BTreeMap::new();

    for line in attributed {
        let acc = groups
            .entry((line.model_number.clone(), line.category.clone()))
            .or_default();
        acc.invoices.insert(line.invoice_id);
        acc.units += u64::from(line.quantity);
        acc.revenue += line.realized_revenue;
    }

    let mut ranked: Vec<ProductSales> = groups
        .into_iter()
        .map(|((model_number, category), acc)| ProductSales {
            model_number,
            category,
            order_count: acc.invoices.len() as u64,
            units: acc.units,
            revenue: acc.revenue,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.model_number.cmp(&b.model_number))
    });
    ranked.truncate(TOP_N);
    ranked
}

#[derive(Default)]
struct CustomerAccumulator {
    name: String,
    count: u64,
    amount: Decimal,
    models: BTreeSet<String>,
}

/// Phase two for customers: bulk invoices only, grouped per customer,
/// ranked by bulk amount descending, customer name ascending on ties.
fn rank_bulk_customers(bulk: &[&InvoiceView], total_orders: u64) -> Vec<CustomerSales> {
    let mut groups: BTreeMap<CustomerId, CustomerAccumulator> = BTreeMap::new();

    for invoice in bulk {
        let acc = groups.entry(invoice.customer.id).or_default();
        acc.name = invoice.customer.name.clone();
        acc.count += 1;
        acc.amount += invoice.total_amount;
        for item in &invoice.items {
            acc.models.insert(item.product.model_number.clone());
        }
    }

    let mut ranked: Vec<CustomerSales> = groups
        .into_iter()
        .map(|(customer_id, acc)| CustomerSales {
            customer_id,
            customer_name: acc.name,
            bulk_orders_count: acc.count,
            bulk_orders_amount: acc.amount,
            average_bulk_order_value: sanitize_bulk_average(acc.count, acc.amount, total_orders),
            products: acc.models.into_iter().collect::<Vec<_>>().join(", "),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.bulk_orders_amount
            .cmp(&a.bulk_orders_amount)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });
    ranked.truncate(TOP_N);
    ranked
}

/// Realized revenue per category, revenue descending, name ascending on
/// ties.
fn rank_categories(attributed: &[AttributedLine]) -> Vec<CategoryRevenue> {
    let mut groups: BTreeMap<String, Decimal> = BTreeMap::new();
    for line in attributed {
        *groups.entry(line.category.clone()).or_default() += line.realized_revenue;
    }

    let mut ranked: Vec<CategoryRevenue> = groups
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue { category, revenue })
        .collect();
    ranked.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked
}
