use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::error::Error;
use crate::store::{ObjectPage, ObjectStore};

/// Object store backed by an S3 bucket
///
/// The client is built once by the caller (see [`crate::setup::s3_client`])
/// and handed in; nothing here reaches for ambient configuration.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    page_size: Option<i32>,
}

impl S3Store {
    /// Wrap `client` for `bucket`
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            page_size: None,
        }
    }

    /// Request at most `page_size` keys per ListObjectsV2 call
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// The underlying SDK client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_page(&self, continuation: Option<String>) -> Result<ObjectPage, Error> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_max_keys(self.page_size)
            .set_continuation_token(continuation)
            .send()
            .await?;

        let keys = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        let next_continuation = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ObjectPage {
            keys,
            next_continuation,
        })
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|s| s.is_no_such_key()).unwrap_or(false) {
                    Error::NotFound {
                        bucket: self.bucket.clone(),
                        key: key.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;

        let body = output.body.collect().await?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), Error> {
        let _ = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await?;
        Ok(())
    }
}
