/// Common test fixtures
///
/// Builders for records with fixed, readable values.
use sales_pipeline::Record;

/// A record with the given fields
pub fn order(order_id: i64, product: &str, price: f64, date: &str) -> Record {
    Record {
        order_id,
        product: product.to_string(),
        price,
        date: date.to_string(),
    }
}

/// Five orders across three products and two days
#[allow(dead_code)]
pub fn sample_orders() -> Vec<Record> {
    vec![
        order(1001, "Laptop", 450.0, "2024-01-15T10:30:00.123456"),
        order(1002, "Mouse", 25.0, "2024-01-15T10:30:00.654321"),
        order(1003, "Keyboard", 80.0, "2024-01-15T11:02:10.000001"),
        order(1004, "Laptop", 300.0, "2024-01-16T09:15:45.500000"),
        order(1005, "Mouse", 45.0, "2024-01-16T10:30:00.000000"),
    ]
}
