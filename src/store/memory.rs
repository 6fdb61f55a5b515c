use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::Error;
use crate::store::{ObjectPage, ObjectStore};

/// Default number of keys per listing page, matching S3's `MaxKeys` default
const DEFAULT_PAGE_SIZE: usize = 1000;

/// In-process object store
///
/// Lists keys in lexical order, like S3. The continuation token is the last
/// key of the previous page.
#[derive(Debug)]
pub struct MemoryStore {
    bucket: String,
    page_size: usize,
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store for `bucket`
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            page_size: DEFAULT_PAGE_SIZE,
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Set the number of keys returned per listing page (minimum 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Remove an object, as an external writer might between listing and fetching
    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.write().remove(key)
    }

    /// Number of objects held
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Returns true if the store holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_page(&self, continuation: Option<String>) -> Result<ObjectPage, Error> {
        let objects = self.objects.read();
        let lower = match continuation.as_deref() {
            Some(after) => Bound::Excluded(after),
            None => Bound::Unbounded,
        };

        let mut remaining = objects
            .range::<str, _>((lower, Bound::Unbounded))
            .map(|(key, _)| key);
        let keys: Vec<String> = remaining.by_ref().take(self.page_size).cloned().collect();

        let next_continuation = if remaining.next().is_some() {
            keys.last().cloned()
        } else {
            None
        };

        Ok(ObjectPage {
            keys,
            next_continuation,
        })
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            })
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), Error> {
        let _ = self.objects.write().insert(key.to_string(), body);
        Ok(())
    }
}
