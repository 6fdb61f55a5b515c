mod memory;
mod s3;
mod types;

pub use memory::MemoryStore;
pub use s3::S3Store;
pub use types::ObjectPage;

use std::future::Future;

use crate::error::Error;

/// Flat key-value object storage holding one record per object
///
/// Implementations are bound to a single bucket. Listing is paged; callers
/// that want the whole bucket go through [`list_all_keys`].
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store reads and writes
    fn bucket(&self) -> &str;

    /// List one page of keys, starting after `continuation` if given
    fn list_page(
        &self,
        continuation: Option<String>,
    ) -> impl Future<Output = Result<ObjectPage, Error>> + Send;

    /// Fetch an object body
    ///
    /// Fails with [`Error::NotFound`] (or S3's `NoSuchKey`) if the key no longer exists.
    fn get(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;

    /// Write an object body, replacing any previous value under `key`
    fn put(&self, key: &str, body: Vec<u8>) -> impl Future<Output = Result<(), Error>> + Send;

    /// List every key in the bucket, following continuations until exhausted
    fn list_keys(&self) -> impl Future<Output = Result<Vec<String>, Error>> + Send
    where
        Self: Sized,
    {
        list_all_keys(self)
    }
}

/// List every key in the store's bucket
///
/// Keeps requesting pages until the store reports no continuation, so large
/// buckets are never silently truncated to their first page.
pub async fn list_all_keys<S>(store: &S) -> Result<Vec<String>, Error>
where
    S: ObjectStore,
{
    let mut keys = Vec::new();
    let mut continuation = None;
    let mut pages = 0usize;

    loop {
        let page = store.list_page(continuation).await?;
        pages += 1;
        keys.extend(page.keys);

        match page.next_continuation {
            Some(next) => continuation = Some(next),
            None => break,
        }
    }

    tracing::debug!(bucket = store.bucket(), pages, keys = keys.len(), "listed bucket");
    Ok(keys)
}
