use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use aws_types::sdk_config::{RetryConfig, TimeoutConfig};
use std::time::Duration;

use crate::config::Settings;
use crate::error::Error;

/// Endpoint used when `AWS_PROFILE=localstack` and no endpoint is configured
pub const LOCALSTACK_ENDPOINT: &str = "http://127.0.0.1:4566";

/// Build the shared SDK configuration from resolved settings
///
/// It configures:
/// - Static credentials from `settings`
/// - Adaptive retry mode with 3 max attempts
/// - Exponential backoff starting at 1 second
/// - Connect timeout: 3 seconds
/// - Read timeout: 20 seconds
/// - Operation timeout: 60 seconds
/// - LocalStack support via AWS_PROFILE=localstack
pub async fn sdk_config(settings: &Settings) -> SdkConfig {
    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(3))
        .read_timeout(Duration::from_secs(20))
        .operation_timeout(Duration::from_secs(60))
        .build();

    let credentials = Credentials::new(
        settings.access_key.clone(),
        settings.secret_key.clone(),
        None,
        None,
        "sales-pipeline-settings",
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .credentials_provider(credentials)
        .retry_config(
            RetryConfig::adaptive()
                .with_max_attempts(3)
                .with_initial_backoff(Duration::from_secs(1)),
        )
        .timeout_config(timeout_config);

    if let Some(endpoint) = endpoint_url(settings) {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// Build an S3 client for `settings`
///
/// Path-style addressing is switched on whenever a custom endpoint is in use,
/// since LocalStack and MinIO do not serve virtual-hosted buckets.
pub async fn s3_client(settings: &Settings) -> Client {
    let config = sdk_config(settings).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(endpoint_url(settings).is_some())
        .build();
    Client::from_conf(s3_config)
}

fn endpoint_url(settings: &Settings) -> Option<String> {
    settings.endpoint_url.clone().or_else(|| {
        (std::env::var("AWS_PROFILE").unwrap_or_default() == "localstack")
            .then(|| LOCALSTACK_ENDPOINT.to_string())
    })
}

/// Create `bucket` if it does not exist yet
///
/// Safe to call repeatedly: a bucket that already exists and belongs to the
/// caller is treated as success.
pub async fn bucket(client: &Client, bucket: &str, region: &str) -> Result<(), Error> {
    let mut builder = client.create_bucket().bucket(bucket);

    // us-east-1 rejects an explicit location constraint.
    if region != "us-east-1" {
        builder = builder.create_bucket_configuration(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build(),
        );
    }

    match builder.send().await {
        Ok(_) => {
            tracing::info!(bucket, "created bucket");
            Ok(())
        }
        Err(e) if e.as_service_error().is_some_and(already_owned) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// A name taken by another account comes back as `BucketAlreadyExists`, which is not ours to write to
fn already_owned(err: &CreateBucketError) -> bool {
    matches!(err, CreateBucketError::BucketAlreadyOwnedByYou(_))
}
