//! # Sales Pipeline
//!
//! A small serverless data pipeline over an S3 bucket:
//! - A producer writes one randomly generated sales order per invocation as a
//!   JSON object (`sales_data_{order_id}.json`)
//! - A dashboard lists and reads every record object on each refresh and
//!   reduces them to totals, per-product breakdowns and a revenue trend
//!
//! ## Features
//!
//! - **Injected store**: everything runs against an [`ObjectStore`]; use
//!   [`S3Store`] in production and [`MemoryStore`] in tests
//! - **Complete listings**: bucket listings follow continuation tokens to the end
//! - **Fail-closed refresh**: one bad object fails the refresh with a single
//!   message instead of showing partial data
//! - **Layered settings**: secrets file first, environment second
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_pipeline::{dashboard, setup, AggregateOptions, Error, S3Store, Settings};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let settings = Settings::load(Path::new("secrets.toml"))?;
//!     let client = setup::s3_client(&settings).await;
//!     let store = S3Store::new(client, settings.bucket.clone());
//!
//!     let outcome = dashboard::refresh(&store, &AggregateOptions::default()).await;
//!     if let Some(views) = outcome.views() {
//!         println!("{} orders, {:.2} revenue", views.count, views.total_revenue);
//!     }
//!     Ok(())
//! }
//! ```
#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_results,
    unreachable_code
)]

mod error;
pub use error::{Error, ErrorKind};

/// Derived views over a record collection
pub mod aggregate;

/// Layered settings resolution
pub mod config;

/// Refresh orchestration and the cached dashboard state
pub mod dashboard;

/// Fetching every record from a bucket
pub mod ingest;

/// Synthetic order generation and publishing
pub mod producer;

/// The sales order record
pub mod record;

/// Text rendering of the dashboard
pub mod render;

/// SDK configuration and bucket setup
pub mod setup;

/// Object store abstraction and backends
pub mod store;

pub use aggregate::{aggregate, AggregateOptions, DerivedViews, TrendGranularity};
pub use config::Settings;
pub use dashboard::{Dashboard, RefreshOutcome};
pub use ingest::fetch_all;
pub use producer::{publish, KeyStrategy, ProducerResponse};
pub use record::Record;
pub use store::{MemoryStore, ObjectPage, ObjectStore, S3Store};

// Re-export aws-config types for configuration
pub use aws_config::{BehaviorVersion, Region, SdkConfig};
