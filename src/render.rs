//! Terminal rendering of a refresh outcome.
//!
//! [`Sink`] is the set of widgets the dashboard draws with; [`TextSink`]
//! draws them as plain text. Layout lives in [`render_dashboard`].

use std::io::{self, Write};

use crate::dashboard::RefreshOutcome;
use crate::record::Record;

/// Width of the longest bar in bar charts
const BAR_WIDTH: usize = 40;

/// Placeholder for a metric that has no value
pub const NO_VALUE: &str = "n/a";

/// Drawing primitives the dashboard is rendered with
pub trait Sink {
    /// Page title
    fn title(&mut self, text: &str) -> io::Result<()>;
    /// Free text line
    fn text(&mut self, text: &str) -> io::Result<()>;
    /// Section heading
    fn subheader(&mut self, text: &str) -> io::Result<()>;
    /// A row of labelled metric values
    fn metrics(&mut self, metrics: &[(&str, String)]) -> io::Result<()>;
    /// Horizontal bar chart
    fn bar_chart(&mut self, bars: &[(String, f64)]) -> io::Result<()>;
    /// Proportional breakdown; shares are fractions summing to 1
    fn distribution(&mut self, shares: &[(String, f64)]) -> io::Result<()>;
    /// Ordered series
    fn line_chart(&mut self, points: &[(String, f64)]) -> io::Result<()>;
    /// Record table
    fn table(&mut self, rows: &[Record]) -> io::Result<()>;
    /// Warning banner
    fn warning(&mut self, text: &str) -> io::Result<()>;
    /// Informational banner
    fn info(&mut self, text: &str) -> io::Result<()>;
    /// Error banner
    fn error(&mut self, text: &str) -> io::Result<()>;
    /// Visual separator
    fn divider(&mut self) -> io::Result<()>;
}

/// Plain-text [`Sink`] over any writer
#[derive(Debug)]
pub struct TextSink<W> {
    out: W,
}

impl<W: Write> TextSink<W> {
    /// Draw into `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn title(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        writeln!(self.out, "{}", "=".repeat(text.chars().count()))
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn subheader(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "## {text}")
    }

    fn metrics(&mut self, metrics: &[(&str, String)]) -> io::Result<()> {
        let line = metrics
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("    ");
        writeln!(self.out, "{line}")
    }

    fn bar_chart(&mut self, bars: &[(String, f64)]) -> io::Result<()> {
        let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        let label_width = bars.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        for (label, value) in bars {
            let len = if max > 0.0 {
                ((value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(
                self.out,
                "{label:<label_width$} | {} {}",
                "#".repeat(len),
                format_currency(*value)
            )?;
        }
        Ok(())
    }

    fn distribution(&mut self, shares: &[(String, f64)]) -> io::Result<()> {
        let label_width = shares.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        for (label, share) in shares {
            writeln!(self.out, "{label:<label_width$} | {:>5.1}%", share * 100.0)?;
        }
        Ok(())
    }

    fn line_chart(&mut self, points: &[(String, f64)]) -> io::Result<()> {
        for (label, value) in points {
            writeln!(self.out, "{label}  {}", format_currency(*value))?;
        }
        Ok(())
    }

    fn table(&mut self, rows: &[Record]) -> io::Result<()> {
        writeln!(self.out, "{:>8}  {:<10}  {:>10}  {}", "order_id", "product", "price", "date")?;
        for row in rows {
            writeln!(
                self.out,
                "{:>8}  {:<10}  {:>10}  {}",
                row.order_id,
                row.product,
                format!("{:.2}", row.price),
                row.date
            )?;
        }
        Ok(())
    }

    fn warning(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "[warning] {text}")
    }

    fn info(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "[info] {text}")
    }

    fn error(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "[error] {text}")
    }

    fn divider(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(60))
    }
}

/// Layout knobs for [`render_dashboard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum rows shown in the transactions table; `None` shows all
    pub max_rows: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { max_rows: Some(20) }
    }
}

/// Draw the whole dashboard for one refresh outcome
pub fn render_dashboard<K: Sink + ?Sized>(
    sink: &mut K,
    bucket: &str,
    outcome: &RefreshOutcome,
    options: &RenderOptions,
) -> io::Result<()> {
    sink.title("Serverless Data Pipeline Dashboard")?;
    sink.text(&format!("Data Source: S3 bucket `{bucket}`"))?;

    let views = match outcome {
        RefreshOutcome::Ready(views) => views,
        RefreshOutcome::Failed(message) => {
            sink.error(message)?;
            return empty_state(sink);
        }
        RefreshOutcome::Empty => return empty_state(sink),
    };

    sink.metrics(&[
        ("Total Orders", views.count.to_string()),
        ("Total Revenue", format_currency(views.total_revenue)),
        (
            "Avg Order Value",
            views
                .avg_order_value
                .map(format_currency)
                .unwrap_or_else(|| NO_VALUE.to_string()),
        ),
    ])?;
    sink.divider()?;

    sink.subheader("Sales by Product")?;
    sink.bar_chart(&views.sales_by_product)?;

    sink.subheader("Product Distribution")?;
    sink.distribution(&views.product_shares())?;

    sink.subheader("Revenue Trend")?;
    sink.line_chart(&views.revenue_trend)?;

    sink.subheader("Recent Transactions")?;
    let shown = options
        .max_rows
        .map_or(views.sorted_table.len(), |n| n.min(views.sorted_table.len()));
    sink.table(&views.sorted_table[..shown])
}

fn empty_state<K: Sink + ?Sized>(sink: &mut K) -> io::Result<()> {
    sink.warning("No data found in the bucket. Run the producer to generate data!")?;
    sink.info("Tip: `sales-producer --count 10` writes ten sample orders.")
}

/// Format an amount as dollars with thousands separators, e.g. `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return NO_VALUE.to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, AggregateOptions};

    fn render(outcome: &RefreshOutcome) -> String {
        let mut sink = TextSink::new(Vec::new());
        render_dashboard(&mut sink, "sales", outcome, &RenderOptions::default()).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(15.5), "$15.50");
        assert_eq!(format_currency(1234.567), "$1,234.57");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-999.0), "-$999.00");
        assert_eq!(format_currency(f64::NAN), NO_VALUE);
    }

    #[test]
    fn test_columns_align_for_non_ascii_labels() {
        let mut sink = TextSink::new(Vec::new());
        let rows = vec![("Café".to_string(), 0.5), ("Mouse".to_string(), 0.5)];
        sink.distribution(&rows).unwrap();
        sink.bar_chart(&rows).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        let columns: Vec<usize> = text
            .lines()
            .map(|line| line.chars().position(|c| c == '|').unwrap())
            .collect();
        assert_eq!(columns, vec![6, 6, 6, 6]);
        assert!(text.starts_with("Café  |  50.0%"));
    }

    #[test]
    fn test_empty_state_is_a_warning_not_an_error() {
        let text = render(&RefreshOutcome::Empty);
        assert!(text.contains("[warning] No data found"));
        assert!(!text.contains("[error]"));
    }

    #[test]
    fn test_failed_state_shows_error_and_no_metrics() {
        let text = render(&RefreshOutcome::Failed("boom".to_string()));
        assert!(text.contains("[error] boom"));
        assert!(!text.contains("Total Orders"));
    }

    #[test]
    fn test_ready_state_layout() {
        let records = vec![
            Record {
                order_id: 1001,
                product: "Laptop".to_string(),
                price: 480.0,
                date: "2024-01-15T10:30:00.000001".to_string(),
            },
            Record {
                order_id: 1002,
                product: "Mouse".to_string(),
                price: 20.0,
                date: "2024-01-15T10:31:00.000001".to_string(),
            },
        ];
        let views = aggregate(records, &AggregateOptions::default()).unwrap();
        let text = render(&RefreshOutcome::Ready(views));

        assert!(text.contains("Total Orders: 2"));
        assert!(text.contains("Total Revenue: $500.00"));
        assert!(text.contains("Avg Order Value: $250.00"));
        assert!(text.contains("## Sales by Product"));
        assert!(text.contains("Laptop |  50.0%"));

        // Newest transaction is listed first.
        let first = text.find("1002").unwrap();
        let second = text.find("1001").unwrap();
        assert!(first < second);
    }
}
