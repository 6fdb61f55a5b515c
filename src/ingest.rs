use futures_util::{stream, StreamExt, TryStreamExt};

use crate::error::Error;
use crate::producer::JSON_SUFFIX;
use crate::record::Record;
use crate::store::ObjectStore;

/// Read every record object in the store's bucket
///
/// Lists the whole bucket (following continuations), keeps keys ending in
/// `.json`, then fetches and decodes them one at a time in listing order.
/// An empty bucket yields an empty collection.
///
/// Any listing, fetch, decode or parse failure aborts the call: the records
/// read so far are dropped and only the error is returned.
pub async fn fetch_all<S>(store: &S) -> Result<Vec<Record>, Error>
where
    S: ObjectStore,
{
    let keys = store.list_keys().await?;
    let total = keys.len();

    let records: Vec<Record> = stream::iter(keys.into_iter().filter(|key| is_record_key(key)))
        .then(|key| fetch_record(store, key))
        .try_collect()
        .await?;

    tracing::info!(
        bucket = store.bucket(),
        listed = total,
        records = records.len(),
        "fetched records"
    );
    Ok(records)
}

/// Returns true if `key` names a record object
pub fn is_record_key(key: &str) -> bool {
    key.ends_with(JSON_SUFFIX)
}

async fn fetch_record<S>(store: &S, key: String) -> Result<Record, Error>
where
    S: ObjectStore,
{
    let body = store.get(&key).await?;
    let record = Record::from_slice(&body).inspect_err(|e| {
        tracing::warn!(%key, error = %e, "object is not a valid record");
    })?;
    tracing::debug!(%key, order_id = record.order_id, "fetched record");
    Ok(record)
}
