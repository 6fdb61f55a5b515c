//! Terminal sales dashboard.
//!
//! Renders once, then re-reads the whole bucket every time Enter is pressed.
//! Type `q` to quit.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sales_pipeline::config::DEFAULT_SECRETS_FILE;
use sales_pipeline::render::{render_dashboard, RenderOptions, TextSink};
use sales_pipeline::{
    publish, setup, AggregateOptions, Dashboard, KeyStrategy, MemoryStore, ObjectStore, S3Store,
    Settings, TrendGranularity,
};

#[derive(Parser, Debug)]
#[command(name = "sales-dashboard", about = "Aggregate sales records from an S3 bucket")]
struct Args {
    /// Secrets file consulted before the environment
    #[arg(long, env = "SALES_SECRETS", default_value = DEFAULT_SECRETS_FILE)]
    secrets: PathBuf,

    /// Revenue trend bucketing
    #[arg(long, value_enum, default_value_t = Trend::Second)]
    trend: Trend,

    /// Rows shown in the transactions table (0 shows all)
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// Skip S3 and run against an in-memory bucket seeded with this many orders
    #[arg(long)]
    memory_demo: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Trend {
    /// HH:MM:SS buckets
    Second,
    /// Date plus HH:MM buckets
    Minute,
}

impl From<Trend> for TrendGranularity {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Second => TrendGranularity::ClockSecond,
            Trend::Minute => TrendGranularity::Minute,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let options = AggregateOptions {
        trend: args.trend.into(),
    };
    let render = RenderOptions {
        max_rows: (args.rows > 0).then_some(args.rows),
    };

    match args.memory_demo {
        Some(orders) => {
            let store = MemoryStore::new("memory-demo");
            let mut rng = StdRng::from_entropy();
            for _ in 0..orders {
                let _ = publish(&store, &mut rng, KeyStrategy::Unique).await?;
            }
            run(Dashboard::new(store, options), &render).await
        }
        None => {
            let settings = Settings::load(&args.secrets).context("cannot start dashboard")?;
            let client = setup::s3_client(&settings).await;
            let store = S3Store::new(client, settings.bucket.clone());
            run(Dashboard::new(store, options), &render).await
        }
    }
}

async fn run<S: ObjectStore>(mut dashboard: Dashboard<S>, render: &RenderOptions) -> Result<()> {
    let bucket = dashboard.store().bucket().to_string();
    draw(&bucket, dashboard.current().await, render)?;

    let mut lines = LinesStream::new(BufReader::new(io::stdin()).lines());
    while let Some(line) = lines.next().await {
        if line?.trim().eq_ignore_ascii_case("q") {
            break;
        }
        draw(&bucket, dashboard.refresh().await, render)?;
    }
    Ok(())
}

fn draw(
    bucket: &str,
    outcome: &sales_pipeline::RefreshOutcome,
    render: &RenderOptions,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut sink = TextSink::new(stdout.lock());
    render_dashboard(&mut sink, bucket, outcome, render)?;

    let mut out = sink.into_inner();
    writeln!(out)?;
    write!(out, "Press Enter to refresh, q to quit: ")?;
    out.flush()?;
    Ok(())
}
