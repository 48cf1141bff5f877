use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vendra_core::{InvoiceId, InvoiceItemId};

use crate::customer::CustomerView;
use crate::product::ProductView;

/// One line of an invoice.
///
/// `total_price` is the pre-discount line subtotal. Lines sum to an
/// invoice subtotal that generally differs from the invoice's
/// post-discount `total_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItemView {
    pub id: InvoiceItemId,
    pub product: ProductView,
    /// Units sold on this line (>= 1).
    pub quantity: u32,
    /// Pre-discount line subtotal (>= 0).
    pub total_price: Decimal,
}

/// Queryable invoice read view (header + lines, customer denormalized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub id: InvoiceId,
    pub customer: CustomerView,
    /// Calendar date of the invoice (no time-of-day semantics).
    pub invoice_date: NaiveDate,
    /// Post-discount invoice total (>= 0).
    pub total_amount: Decimal,
    pub items: Vec<InvoiceItemView>,
}

impl InvoiceView {
    /// Sum of the pre-discount line subtotals.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|i| i.total_price).sum()
    }

    /// Units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use vendra_core::{CustomerId, ProductId};

    fn item(price: Decimal, quantity: u32) -> InvoiceItemView {
        InvoiceItemView {
            id: InvoiceItemId::new(),
            product: ProductView {
                id: ProductId::new(),
                model_number: "M-100".to_string(),
                category: "Laptops".to_string(),
            },
            quantity,
            total_price: price,
        }
    }

    #[test]
    fn subtotal_and_units_sum_over_lines() {
        let invoice = InvoiceView {
            id: InvoiceId::new(),
            customer: CustomerView {
                id: CustomerId::new(),
                name: "Acme".to_string(),
                created_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            },
            invoice_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            total_amount: dec!(900),
            items: vec![item(dec!(600), 2), item(dec!(400), 3)],
        };

        assert_eq!(invoice.subtotal(), dec!(1000));
        assert_eq!(invoice.unit_count(), 5);
    }
}
