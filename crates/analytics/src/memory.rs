//! In-memory metrics source (dev/test wiring).

use std::sync::RwLock;

use chrono::Datelike;

use crate::period::{Month, Period};
use crate::source::{AggregationMode, MetricsSource, MonthlyRollup, SourceCapabilities, SourceError};
use vendra_sales::InvoiceView;

/// Thread-safe in-memory source holding raw invoices and monthly fact
/// rows. Serves both aggregation paths.
#[derive(Debug, Default)]
pub struct InMemoryMetricsSource {
    invoices: RwLock<Vec<InvoiceView>>,
    rollups: RwLock<Vec<MonthlyRollup>>,
}

impl InMemoryMetricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_invoice(&self, invoice: InvoiceView) {
        if let Ok(mut invoices) = self.invoices.write() {
            invoices.push(invoice);
        }
    }

    pub fn insert_rollup(&self, rollup: MonthlyRollup) {
        if let Ok(mut rollups) = self.rollups.write() {
            rollups.push(rollup);
        }
    }
}

fn lock_error(mode: AggregationMode) -> SourceError {
    SourceError::Store(format!("in-memory store lock poisoned ({mode:?} path)"))
}

impl MetricsSource for InMemoryMetricsSource {
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities {
            raw: true,
            rollup: true,
        }
    }

    fn invoices_in(&self, period: &Period) -> Result<Vec<InvoiceView>, SourceError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| lock_error(AggregationMode::Raw))?;
        Ok(invoices
            .iter()
            .filter(|i| period.contains(i.invoice_date))
            .cloned()
            .collect())
    }

    fn rollups_in(&self, period: &Period) -> Result<Vec<MonthlyRollup>, SourceError> {
        let rollups = self
            .rollups
            .read()
            .map_err(|_| lock_error(AggregationMode::Rollup))?;
        Ok(rollups
            .iter()
            .filter(|r| {
                let key = (r.year, r.month.number());
                key >= (period.start.year(), period.start.month())
                    && key <= (period.end.year(), period.end.month())
            })
            .cloned()
            .collect())
    }

    fn years(&self) -> Result<Vec<i32>, SourceError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| lock_error(AggregationMode::Raw))?;
        let rollups = self
            .rollups
            .read()
            .map_err(|_| lock_error(AggregationMode::Rollup))?;

        let mut years: Vec<i32> = invoices
            .iter()
            .map(|i| i.invoice_date.year())
            .chain(rollups.iter().map(|r| r.year))
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    fn months(&self, year: i32) -> Result<Vec<Month>, SourceError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| lock_error(AggregationMode::Raw))?;
        let rollups = self
            .rollups
            .read()
            .map_err(|_| lock_error(AggregationMode::Rollup))?;

        let mut numbers: Vec<u32> = invoices
            .iter()
            .filter(|i| i.invoice_date.year() == year)
            .map(|i| i.invoice_date.month())
            .chain(
                rollups
                    .iter()
                    .filter(|r| r.year == year)
                    .map(|r| r.month.number()),
            )
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        Ok(numbers.into_iter().filter_map(Month::from_number).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::month_period;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use vendra_core::{CustomerId, InvoiceId, InvoiceItemId, ProductId};
    use vendra_sales::{CustomerView, InvoiceItemView, ProductView};

    fn invoice_on(date: NaiveDate) -> InvoiceView {
        InvoiceView {
            id: InvoiceId::new(),
            customer: CustomerView {
                id: CustomerId::new(),
                name: "Acme".to_string(),
                created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            invoice_date: date,
            total_amount: dec!(100),
            items: vec![InvoiceItemView {
                id: InvoiceItemId::new(),
                product: ProductView {
                    id: ProductId::new(),
                    model_number: "M-100".to_string(),
                    category: "General".to_string(),
                },
                quantity: 1,
                total_price: dec!(100),
            }],
        }
    }

    #[test]
    fn filters_invoices_by_inclusive_period_bounds() {
        let source = InMemoryMetricsSource::new();
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));

        let period = month_period(2025, Month::March).unwrap();
        let hits = source.invoices_in(&period).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn lists_years_descending_and_months_in_calendar_order() {
        let source = InMemoryMetricsSource::new();
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2024, 11, 5).unwrap()));
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()));
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()));
        source.insert_invoice(invoice_on(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()));

        assert_eq!(source.years().unwrap(), vec![2025, 2024]);
        assert_eq!(
            source.months(2025).unwrap(),
            vec![Month::January, Month::March]
        );
    }
}
