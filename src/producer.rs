//! Record producer: one synthetic sales order per invocation.

use chrono::{Local, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::Error;
use crate::record::{Record, DATE_FORMAT};
use crate::store::ObjectStore;

/// Products an order is drawn from
pub const PRODUCTS: [&str; 4] = ["Laptop", "Mouse", "Keyboard", "Monitor"];

/// Range order ids are sampled from
pub const ORDER_ID_RANGE: RangeInclusive<i64> = 1000..=9999;

/// Range prices are sampled from
pub const PRICE_RANGE: RangeInclusive<i64> = 20..=500;

/// Prefix shared by every record key
pub const KEY_PREFIX: &str = "sales_data_";

/// Suffix shared by every record key; the only objects ingest reads
pub const JSON_SUFFIX: &str = ".json";

/// How a record's object key is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// `sales_data_{order_id}.json`; a repeated order id overwrites the earlier object
    #[default]
    OrderId,
    /// `sales_data_{order_id}_{ulid}.json`; every invocation gets its own object
    Unique,
}

impl KeyStrategy {
    /// Object key for `record`
    pub fn key_for(&self, record: &Record) -> String {
        match self {
            KeyStrategy::OrderId => object_key(record.order_id),
            KeyStrategy::Unique => format!(
                "{KEY_PREFIX}{}_{}{JSON_SUFFIX}",
                record.order_id,
                rusty_ulid::generate_ulid_string()
            ),
        }
    }
}

/// Object key for an order id
pub fn object_key(order_id: i64) -> String {
    format!("{KEY_PREFIX}{order_id}{JSON_SUFFIX}")
}

/// Synthesize one record stamped with `now`
pub fn generate_record<R: Rng>(rng: &mut R, now: NaiveDateTime) -> Record {
    let product = PRODUCTS
        .choose(rng)
        .copied()
        .unwrap_or(PRODUCTS[0])
        .to_string();

    Record {
        order_id: rng.gen_range(ORDER_ID_RANGE),
        product,
        price: rng.gen_range(PRICE_RANGE) as f64,
        date: now.format(DATE_FORMAT).to_string(),
    }
}

/// Reply of one producer invocation, shaped like a function-as-a-service response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerResponse {
    /// HTTP-style status, always 200 on success
    pub status_code: u16,
    /// JSON-encoded confirmation message
    pub body: String,
}

/// What one invocation wrote
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    /// Key the record was written under
    pub key: String,
    /// The record itself
    pub record: Record,
}

impl Published {
    /// The invocation response for this write
    pub fn response(&self) -> Result<ProducerResponse, Error> {
        Ok(ProducerResponse {
            status_code: 200,
            body: serde_json::to_string(&format!("Saved {} to S3", self.key))?,
        })
    }
}

/// Generate one record and write it to `store`
///
/// Exactly one put per call. A failed put is returned as-is: no retry beyond
/// the SDK's own, no cleanup.
pub async fn publish<S, R>(store: &S, rng: &mut R, strategy: KeyStrategy) -> Result<Published, Error>
where
    S: ObjectStore,
    R: Rng,
{
    let record = generate_record(rng, Local::now().naive_local());
    let key = strategy.key_for(&record);

    store.put(&key, record.to_vec()?).await?;
    tracing::info!(bucket = store.bucket(), %key, order_id = record.order_id, "published record");

    Ok(Published { key, record })
}
