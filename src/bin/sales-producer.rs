//! Writes synthetic sales orders into the bucket, one object per invocation.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sales_pipeline::config::DEFAULT_SECRETS_FILE;
use sales_pipeline::{publish, setup, KeyStrategy, MemoryStore, ObjectStore, S3Store, Settings};

#[derive(Parser, Debug)]
#[command(name = "sales-producer", about = "Generate sales order records into an S3 bucket")]
struct Args {
    /// Number of invocations to run
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Append a ULID to every key so repeated order ids never overwrite each other
    #[arg(long)]
    unique_keys: bool,

    /// Create the bucket first if it does not exist
    #[arg(long)]
    create_bucket: bool,

    /// Secrets file consulted before the environment
    #[arg(long, env = "SALES_SECRETS", default_value = DEFAULT_SECRETS_FILE)]
    secrets: PathBuf,

    /// Write into a throwaway in-memory bucket instead of S3
    #[arg(long)]
    memory: bool,
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
    let strategy = if args.unique_keys {
        KeyStrategy::Unique
    } else {
        KeyStrategy::OrderId
    };

    if args.memory {
        return invoke(&MemoryStore::new("memory"), args.count, strategy).await;
    }

    let settings = Settings::load(&args.secrets).context("cannot start producer")?;
    let client = setup::s3_client(&settings).await;
    if args.create_bucket {
        setup::bucket(&client, &settings.bucket, &settings.region).await?;
    }
    invoke(&S3Store::new(client, settings.bucket.clone()), args.count, strategy).await
}

async fn invoke<S: ObjectStore>(store: &S, count: usize, strategy: KeyStrategy) -> Result<()> {
    let mut rng = StdRng::from_entropy();
    for _ in 0..count {
        let published = publish(store, &mut rng, strategy).await?;
        println!("{}", serde_json::to_string(&published.response()?)?);
    }
    Ok(())
}
