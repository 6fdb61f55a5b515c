/// Test helpers and fixtures for pipeline integration tests
///
/// Seeds stores with records and builds an S3 store against LocalStack for
/// the tests that talk to a real endpoint.
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{order, sample_orders};

use sales_pipeline::{ObjectStore, Record};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write `records` into `store` under their order-id keys
#[allow(dead_code)]
pub async fn seed<S: ObjectStore>(store: &S, records: &[Record]) {
    for record in records {
        store
            .put(
                &sales_pipeline::producer::object_key(record.order_id),
                record.to_vec().unwrap(),
            )
            .await
            .unwrap();
    }
}

/// Generate a unique bucket name for isolation
///
/// Returns a timestamp-based name to avoid test data conflicts
#[allow(dead_code)]
pub fn unique_bucket(name: &str) -> String {
    format!(
        "{}-{}",
        name,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis()
    )
}

/// Build an S3 store for a fresh bucket on LocalStack
///
/// Creates the bucket if it doesn't exist. Safe to call multiple times.
#[allow(dead_code)]
pub async fn localstack_store(name: &str) -> sales_pipeline::S3Store {
    let settings = sales_pipeline::Settings {
        access_key: "test".to_string(),
        secret_key: "test".to_string(),
        region: "us-east-1".to_string(),
        bucket: unique_bucket(name),
        endpoint_url: Some(sales_pipeline::setup::LOCALSTACK_ENDPOINT.to_string()),
    };
    let client = sales_pipeline::setup::s3_client(&settings).await;
    sales_pipeline::setup::bucket(&client, &settings.bucket, &settings.region)
        .await
        .unwrap();
    sales_pipeline::S3Store::new(client, settings.bucket)
}
