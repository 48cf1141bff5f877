//! Per-invoice revenue attribution.
//!
//! An invoice's `total_amount` already reflects any header-level discount,
//! while line `total_price` values are pre-discount. Realized revenue per
//! line is the line's share of the pre-discount subtotal, scaled to the
//! post-discount total.
//!
//! Attribution runs strictly per invoice. The ratios are meaningless once
//! lines from different invoices are mixed, so aggregation consumes the
//! attributed rows produced here and only then groups across invoices.

use rust_decimal::Decimal;

use vendra_core::{InvoiceId, InvoiceItemId};
use vendra_sales::InvoiceView;

/// One line's share of an invoice's realized (post-discount) revenue.
///
/// Carries the grouping keys so downstream reduction never has to reach
/// back into the invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedLine {
    pub invoice_id: InvoiceId,
    pub item_id: InvoiceItemId,
    pub model_number: String,
    pub category: String,
    pub quantity: u32,
    pub realized_revenue: Decimal,
}

/// Scale each line's subtotal share to the invoice's post-discount total.
///
/// A zero subtotal attributes zero to every line (no division). Otherwise
/// the returned revenues sum to `total_amount` up to `Decimal` rounding.
pub fn attribute(invoice: &InvoiceView) -> Vec<AttributedLine> {
    let subtotal = invoice.subtotal();

    invoice
        .items
        .iter()
        .map(|item| {
            let realized_revenue = if subtotal > Decimal::ZERO {
                item.total_price / subtotal * invoice.total_amount
            } else {
                Decimal::ZERO
            };

            AttributedLine {
                invoice_id: invoice.id,
                item_id: item.id,
                model_number: item.product.model_number.clone(),
                category: item.product.category.clone(),
                quantity: item.quantity,
                realized_revenue,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use vendra_core::{CustomerId, ProductId};
    use vendra_sales::{CustomerView, InvoiceItemView, ProductView};

    fn item(model: &str, price: Decimal) -> InvoiceItemView {
        InvoiceItemView {
            id: InvoiceItemId::new(),
            product: ProductView {
                id: ProductId::new(),
                model_number: model.to_string(),
                category: "General".to_string(),
            },
            quantity: 1,
            total_price: price,
        }
    }

    fn invoice(total_amount: Decimal, items: Vec<InvoiceItemView>) -> InvoiceView {
        InvoiceView {
            id: InvoiceId::new(),
            customer: CustomerView {
                id: CustomerId::new(),
                name: "Acme".to_string(),
                created_at: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            },
            invoice_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            total_amount,
            items,
        }
    }

    #[test]
    fn splits_discounted_total_proportionally() {
        // 1000 pre-discount, 900 realized: a 10% header discount.
        let inv = invoice(dec!(900), vec![item("A", dec!(600)), item("B", dec!(400))]);

        let lines = attribute(&inv);
        assert_eq!(lines[0].realized_revenue, dec!(540));
        assert_eq!(lines[1].realized_revenue, dec!(360));
    }

    #[test]
    fn zero_subtotal_attributes_zero_everywhere() {
        let inv = invoice(dec!(50), vec![item("A", dec!(0)), item("B", dec!(0))]);

        let lines = attribute(&inv);
        assert!(lines.iter().all(|l| l.realized_revenue == Decimal::ZERO));
    }

    #[test]
    fn single_line_takes_the_whole_total() {
        let inv = invoice(dec!(123.45), vec![item("A", dec!(200))]);

        let lines = attribute(&inv);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].realized_revenue, dec!(123.45));
    }

    proptest! {
        #[test]
        fn conserves_invoice_total(
            total_cents in 0i64..100_000_000,
            price_cents in proptest::collection::vec(0i64..10_000_000, 1..12),
        ) {
            let items = price_cents
                .iter()
                .enumerate()
                .map(|(i, &p)| item(&format!("M-{i}"), Decimal::new(p, 2)))
                .collect();
            let inv = invoice(Decimal::new(total_cents, 2), items);

            let attributed_sum: Decimal =
                attribute(&inv).iter().map(|l| l.realized_revenue).sum();

            if inv.subtotal() > Decimal::ZERO {
                let delta = (attributed_sum - inv.total_amount).abs();
                prop_assert!(delta <= dec!(0.000001), "delta was {}", delta);
            } else {
                prop_assert_eq!(attributed_sum, Decimal::ZERO);
            }
        }
    }
}
