//! Derived views over one refresh's record collection.
//!
//! Everything here is a pure function of the records; nothing is cached or
//! persisted between refreshes.

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::Error;
use crate::record::Record;

/// Label format for [`TrendGranularity::ClockSecond`]
pub const CLOCK_SECOND_FORMAT: &str = "%H:%M:%S";

/// Label format for [`TrendGranularity::Minute`]
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Bucketing used for the revenue trend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendGranularity {
    /// `HH:MM:SS` labels. Identical times on different days share a bucket.
    #[default]
    ClockSecond,
    /// `YYYY-MM-DD HH:MM` labels; safe across days
    Minute,
}

impl TrendGranularity {
    /// Bucket label for `ts`
    pub fn label(&self, ts: &NaiveDateTime) -> String {
        match self {
            TrendGranularity::ClockSecond => ts.format(CLOCK_SECOND_FORMAT).to_string(),
            TrendGranularity::Minute => ts.format(MINUTE_FORMAT).to_string(),
        }
    }
}

/// Aggregation knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Trend bucketing
    pub trend: TrendGranularity,
}

/// Aggregates computed from one record collection
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    /// Number of records
    pub count: usize,
    /// Sum of `price`
    pub total_revenue: f64,
    /// Mean of `price`; `None` when there are no records
    pub avg_order_value: Option<f64>,
    /// Revenue per product, highest first; ties keep first-seen order
    pub sales_by_product: Vec<(String, f64)>,
    /// Order count per product, in first-seen order
    pub product_counts: Vec<(String, usize)>,
    /// Revenue per trend bucket, ascending by label
    pub revenue_trend: Vec<(String, f64)>,
    /// All records, newest first
    pub sorted_table: Vec<Record>,
}

impl DerivedViews {
    /// Share of orders per product, as fractions of `count`
    pub fn product_shares(&self) -> Vec<(String, f64)> {
        if self.count == 0 {
            return Vec::new();
        }
        self.product_counts
            .iter()
            .map(|(product, n)| (product.clone(), *n as f64 / self.count as f64))
            .collect()
    }
}

/// Reduce `records` to the dashboard views
///
/// Fails if any record's `date` cannot be parsed; there is no partial result.
pub fn aggregate(records: Vec<Record>, options: &AggregateOptions) -> Result<DerivedViews, Error> {
    let mut stamped = records
        .into_iter()
        .map(|record| record.timestamp().map(|ts| (ts, record)))
        .collect::<Result<Vec<_>, _>>()?;

    let count = stamped.len();
    let total_revenue: f64 = stamped.iter().map(|(_, r)| r.price).sum();
    let avg_order_value = (count > 0).then(|| total_revenue / count as f64);

    let mut sales_by_product = Grouped::default();
    let mut product_counts = Grouped::default();
    let mut revenue_trend = Grouped::default();

    for (ts, record) in &stamped {
        sales_by_product.add(&record.product, record.price);
        product_counts.add(&record.product, 1usize);
        revenue_trend.add(&options.trend.label(ts), record.price);
    }

    let mut sales_by_product = sales_by_product.into_vec();
    // Stable, so equal totals keep first-seen order.
    sales_by_product.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut revenue_trend = revenue_trend.into_vec();
    revenue_trend.sort_by(|a, b| a.0.cmp(&b.0));

    stamped.sort_by(|a, b| b.0.cmp(&a.0));
    let sorted_table = stamped.into_iter().map(|(_, record)| record).collect();

    Ok(DerivedViews {
        count,
        total_revenue,
        avg_order_value,
        sales_by_product,
        product_counts: product_counts.into_vec(),
        revenue_trend,
        sorted_table,
    })
}

/// Insertion-ordered group-by accumulator
struct Grouped<V> {
    index: HashMap<String, usize>,
    groups: Vec<(String, V)>,
}

impl<V> Default for Grouped<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<V: Copy + std::ops::AddAssign> Grouped<V> {
    fn add(&mut self, key: &str, value: V) {
        match self.index.get(key) {
            Some(&slot) => self.groups[slot].1 += value,
            None => {
                let _ = self.index.insert(key.to_string(), self.groups.len());
                self.groups.push((key.to_string(), value));
            }
        }
    }

    fn into_vec(self) -> Vec<(String, V)> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order_id: i64, product: &str, price: f64, date: &str) -> Record {
        Record {
            order_id,
            product: product.to_string(),
            price,
            date: date.to_string(),
        }
    }

    #[test]
    fn test_empty_collection() {
        let views = aggregate(Vec::new(), &AggregateOptions::default()).unwrap();

        assert_eq!(views.count, 0);
        assert_eq!(views.total_revenue, 0.0);
        assert_eq!(views.avg_order_value, None);
        assert!(views.sales_by_product.is_empty());
        assert!(views.product_counts.is_empty());
        assert!(views.revenue_trend.is_empty());
        assert!(views.sorted_table.is_empty());
        assert!(views.product_shares().is_empty());
    }

    #[test]
    fn test_sales_by_product_descending() {
        let records = vec![
            record(1, "A", 10.0, "2024-01-01T00:00:01"),
            record(2, "B", 30.0, "2024-01-01T00:00:02"),
            record(3, "A", 5.0, "2024-01-01T00:00:03"),
        ];
        let views = aggregate(records, &AggregateOptions::default()).unwrap();

        assert_eq!(
            views.sales_by_product,
            vec![("B".to_string(), 30.0), ("A".to_string(), 15.0)]
        );
        assert_eq!(
            views.product_counts,
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
        assert_eq!(views.avg_order_value, Some(15.0));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![
            record(1, "Mouse", 20.0, "2024-01-01"),
            record(2, "Laptop", 20.0, "2024-01-01"),
        ];
        let views = aggregate(records, &AggregateOptions::default()).unwrap();
        assert_eq!(views.sales_by_product[0].0, "Mouse");
        assert_eq!(views.sales_by_product[1].0, "Laptop");
    }

    #[test]
    fn test_sorted_table_newest_first() {
        let records = vec![
            record(1, "A", 1.0, "2024-01-01"),
            record(2, "A", 1.0, "2024-01-03"),
            record(3, "A", 1.0, "2024-01-02"),
        ];
        let views = aggregate(records, &AggregateOptions::default()).unwrap();
        let dates: Vec<&str> = views.sorted_table.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn test_sorted_table_uses_parsed_time_not_text() {
        // The space-separated date sorts first as text but is the later time.
        let records = vec![
            record(1, "A", 1.0, "2024-01-01T08:00:00"),
            record(2, "A", 1.0, "2024-01-01 09:00:00"),
        ];
        let views = aggregate(records, &AggregateOptions::default()).unwrap();
        assert_eq!(views.sorted_table[0].order_id, 2);
    }

    #[test]
    fn test_trend_clock_second_buckets() {
        let records = vec![
            record(1, "A", 10.0, "2024-01-01T10:00:05.900000"),
            record(2, "B", 20.0, "2024-01-01T10:00:05.100000"),
            record(3, "A", 5.0, "2024-01-01T09:59:59"),
            // Same clock time on another day collapses into one bucket.
            record(4, "C", 1.0, "2024-01-02T10:00:05"),
        ];
        let views = aggregate(records, &AggregateOptions::default()).unwrap();
        assert_eq!(
            views.revenue_trend,
            vec![("09:59:59".to_string(), 5.0), ("10:00:05".to_string(), 31.0)]
        );
    }

    #[test]
    fn test_trend_minute_separates_days() {
        let records = vec![
            record(1, "A", 10.0, "2024-01-02T10:00:05"),
            record(2, "A", 20.0, "2024-01-01T10:00:59"),
            record(3, "A", 5.0, "2024-01-01T10:00:01"),
        ];
        let options = AggregateOptions {
            trend: TrendGranularity::Minute,
        };
        let views = aggregate(records, &options).unwrap();
        assert_eq!(
            views.revenue_trend,
            vec![
                ("2024-01-01 10:00".to_string(), 25.0),
                ("2024-01-02 10:00".to_string(), 10.0),
            ]
        );
    }

    #[test]
    fn test_bad_date_fails_whole_aggregation() {
        let records = vec![
            record(1, "A", 10.0, "2024-01-01"),
            record(2, "B", 10.0, "not a date"),
        ];
        let err = aggregate(records, &AggregateOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Timestamp(ref raw) if raw == "not a date"));
    }

    #[test]
    fn test_totals_are_consistent() {
        let records: Vec<Record> = (0..50)
            .map(|i| {
                let product = ["Laptop", "Mouse", "Keyboard", "Monitor"][i % 4];
                record(1000 + i as i64, product, 20.0 + (i * 7 % 480) as f64, "2024-01-01T12:00:00")
            })
            .collect();
        let views = aggregate(records, &AggregateOptions::default()).unwrap();

        let counted: usize = views.product_counts.iter().map(|(_, n)| n).sum();
        assert_eq!(counted, views.count);

        let grouped: f64 = views.sales_by_product.iter().map(|(_, v)| v).sum();
        assert!((grouped - views.total_revenue).abs() < 1e-9);

        let shares: f64 = views.product_shares().iter().map(|(_, s)| s).sum();
        assert!((shares - 1.0).abs() < 1e-9);
    }
}
