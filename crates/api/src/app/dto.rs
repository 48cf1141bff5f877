//! Response JSON mapping helpers.
//!
//! Internal results keep full `Decimal` precision; money and percentage
//! fields are rounded to 2 decimal places here, at the wire edge.

use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};

use vendra_analytics::aggregate::AggregationResult;
use vendra_forecast::ForecastResult;

fn money(value: Decimal) -> JsonValue {
    json!(value.round_dp(2))
}

pub fn aggregation_to_json(result: &AggregationResult) -> JsonValue {
    json!({
        "period": {
            "start": result.period.start,
            "end": result.period.end,
            "granularity": result.period.granularity,
        },
        "total_revenue": money(result.total_revenue),
        "total_orders": result.total_orders,
        "total_units": result.total_units,
        "avg_order_value": money(result.avg_order_value),
        "new_customers": result.new_customers,
        "bulk_orders_count": result.bulk_orders_count,
        "bulk_orders_amount": money(result.bulk_orders_amount),
        "avg_bulk_order_value": money(result.avg_bulk_order_value),
        "top_products": result.top_products.iter().map(|p| json!({
            "model_number": p.model_number,
            "category": p.category,
            "order_count": p.order_count,
            "units": p.units,
            "revenue": money(p.revenue),
        })).collect::<Vec<_>>(),
        "top_customers": result.top_customers.iter().map(|c| json!({
            "customer_id": c.customer_id.to_string(),
            "customer_name": c.customer_name,
            "bulk_orders_count": c.bulk_orders_count,
            "bulk_orders_amount": money(c.bulk_orders_amount),
            "average_bulk_order_value": money(c.average_bulk_order_value),
            "products": c.products,
        })).collect::<Vec<_>>(),
        "category_revenue": result.category_revenue.iter().map(|c| json!({
            "category": c.category,
            "revenue": money(c.revenue),
        })).collect::<Vec<_>>(),
    })
}

pub fn forecast_to_json(result: &ForecastResult) -> JsonValue {
    json!({
        "predictions": result.predictions.iter().map(|p| json!({
            "label": p.label,
            "revenue": money(p.revenue),
            "mom_change_pct": p.mom_change_pct,
        })).collect::<Vec<_>>(),
        "total_growth_pct": result.total_growth_pct,
        "insights": result.insights,
        "recommendations": result.recommendations,
    })
}
