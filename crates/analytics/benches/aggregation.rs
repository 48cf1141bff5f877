use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use vendra_analytics::aggregate::aggregate_invoices;
use vendra_analytics::period::{month_period, Month};
use vendra_core::{CustomerId, InvoiceId, InvoiceItemId, ProductId};
use vendra_sales::{CustomerView, InvoiceItemView, InvoiceView, ProductView};

/// Synthetic month of invoices: ~40 customers, ~25 products, 3 lines each.
fn synthetic_invoices(count: usize) -> Vec<InvoiceView> {
    let customers: Vec<CustomerId> = (0..40).map(|_| CustomerId::new()).collect();
    let products: Vec<ProductId> = (0..25).map(|_| ProductId::new()).collect();

    (0..count)
        .map(|n| {
            let items: Vec<InvoiceItemView> = (0..3)
                .map(|line| {
                    let p = (n * 3 + line) % products.len();
                    InvoiceItemView {
                        id: InvoiceItemId::new(),
                        product: ProductView {
                            id: products[p],
                            model_number: format!("M-{p:03}"),
                            category: format!("Category-{}", p % 5),
                        },
                        quantity: (line as u32) + 1,
                        total_price: Decimal::new(((n % 90) as i64 + 10) * 100, 2),
                    }
                })
                .collect();

            let subtotal: Decimal = items.iter().map(|i| i.total_price).sum();
            InvoiceView {
                id: InvoiceId::new(),
                customer: CustomerView {
                    id: customers[n % customers.len()],
                    name: format!("Customer {}", n % customers.len()),
                    created_at: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                },
                invoice_date: NaiveDate::from_ymd_opt(2025, 3, (n % 28 + 1) as u32).unwrap(),
                // 5% header discount on every other invoice.
                total_amount: if n % 2 == 0 {
                    subtotal
                } else {
                    subtotal * Decimal::new(95, 2)
                },
                items,
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let period = month_period(2025, Month::March).unwrap();
    let invoices = synthetic_invoices(1_000);

    c.bench_function("aggregate_invoices_1k", |b| {
        b.iter(|| aggregate_invoices(std::hint::black_box(&invoices), &period))
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
