//! Bulk-order average sanity filter.
//!
//! Some historical sources report "bulk order count" as a count of invoice
//! *lines* rather than invoices. A contaminated count inflates the divisor
//! and produces a bulk average no reader can trust. The filter distrusts
//! the count when it cannot be a true invoice count and falls back to the
//! period's total invoice count as the divisor.

use rust_decimal::Decimal;

/// Average bulk-order amount with contamination fallback.
///
/// The count is rejected when it exceeds `fallback_order_count` (a period
/// cannot contain more bulk invoices than invoices) or when the naive
/// average exceeds the total amount itself. In either case
/// `fallback_order_count` becomes the divisor; a zero fallback yields 0.
///
/// Full precision is returned; rounding to display precision happens at
/// the response edge.
pub fn sanitize_bulk_average(
    bulk_orders_count: u64,
    bulk_orders_amount: Decimal,
    fallback_order_count: u64,
) -> Decimal {
    if bulk_orders_count == 0 {
        return Decimal::ZERO;
    }

    let naive_avg = bulk_orders_amount / Decimal::from(bulk_orders_count);

    let contaminated =
        bulk_orders_count > fallback_order_count || naive_avg > bulk_orders_amount;
    if !contaminated {
        return naive_avg;
    }

    if fallback_order_count == 0 {
        return Decimal::ZERO;
    }
    bulk_orders_amount / Decimal::from(fallback_order_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn plausible_counts_pass_through() {
        assert_eq!(sanitize_bulk_average(2, dec!(150), 40), dec!(75));
        assert_eq!(sanitize_bulk_average(1, dec!(150), 40), dec!(150));
    }

    #[test]
    fn zero_count_yields_zero() {
        assert_eq!(sanitize_bulk_average(0, dec!(100000), 40), Decimal::ZERO);
    }

    #[test]
    fn line_contaminated_count_falls_back_to_invoice_count() {
        // 500 "bulk orders" in a period with 40 invoices: line-count artifact.
        assert_eq!(
            sanitize_bulk_average(500, dec!(100000), 40),
            dec!(2500)
        );
    }

    #[test]
    fn contaminated_count_with_no_invoices_yields_zero() {
        assert_eq!(sanitize_bulk_average(5, dec!(100000), 0), Decimal::ZERO);
    }

    #[test]
    fn zero_amount_is_a_zero_average() {
        assert_eq!(sanitize_bulk_average(3, dec!(0), 40), Decimal::ZERO);
    }
}
