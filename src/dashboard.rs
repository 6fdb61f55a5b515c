use crate::aggregate::{aggregate, AggregateOptions, DerivedViews};
use crate::error::Error;
use crate::ingest::fetch_all;
use crate::store::ObjectStore;

/// Result of one refresh, as the rendering layer sees it
///
/// Errors never escape a refresh: they become [`RefreshOutcome::Failed`],
/// which carries no data. An empty bucket is its own state, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Records were read and aggregated
    Ready(DerivedViews),
    /// The bucket holds no record objects
    Empty,
    /// Fetching or aggregating failed; the message is meant for display
    Failed(String),
}

impl RefreshOutcome {
    /// The views, if the refresh produced any
    pub fn views(&self) -> Option<&DerivedViews> {
        match self {
            RefreshOutcome::Ready(views) => Some(views),
            _ => None,
        }
    }

    /// The failure message, if the refresh failed
    pub fn error_message(&self) -> Option<&str> {
        match self {
            RefreshOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Run one full refresh: list, fetch, parse, aggregate
pub async fn refresh<S>(store: &S, options: &AggregateOptions) -> RefreshOutcome
where
    S: ObjectStore,
{
    match load(store, options).await {
        Ok(Some(views)) => RefreshOutcome::Ready(views),
        Ok(None) => RefreshOutcome::Empty,
        Err(e) => {
            tracing::error!(bucket = store.bucket(), error = %e, kind = ?e.kind(), "refresh failed");
            RefreshOutcome::Failed(format!(
                "Error fetching data from bucket `{}`: {}",
                store.bucket(),
                e
            ))
        }
    }
}

async fn load<S>(store: &S, options: &AggregateOptions) -> Result<Option<DerivedViews>, Error>
where
    S: ObjectStore,
{
    let records = fetch_all(store).await?;
    if records.is_empty() {
        return Ok(None);
    }
    let views = aggregate(records, options)?;
    tracing::info!(
        bucket = store.bucket(),
        orders = views.count,
        revenue = views.total_revenue,
        "refreshed dashboard"
    );
    Ok(Some(views))
}

/// A dashboard bound to one store, holding the last refresh result
///
/// The result is computed on first access and reused until [`Dashboard::refresh`]
/// throws it away.
#[derive(Debug)]
pub struct Dashboard<S> {
    store: S,
    options: AggregateOptions,
    cached: Option<RefreshOutcome>,
}

impl<S: ObjectStore> Dashboard<S> {
    /// Create a dashboard over `store`
    pub fn new(store: S, options: AggregateOptions) -> Self {
        Self {
            store,
            options,
            cached: None,
        }
    }

    /// The store being read
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cached outcome, loading it if nothing is cached yet
    pub async fn current(&mut self) -> &RefreshOutcome {
        if self.cached.is_none() {
            self.cached = Some(refresh(&self.store, &self.options).await);
        }
        self.cached.get_or_insert(RefreshOutcome::Empty)
    }

    /// Drop the cached outcome
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Drop the cached outcome and load a fresh one
    pub async fn refresh(&mut self) -> &RefreshOutcome {
        self.invalidate();
        self.current().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const RECORD: &[u8] =
        br#"{"order_id": 7, "product": "Monitor", "price": 300, "date": "2024-01-15T10:30:00.5"}"#;

    #[tokio::test]
    async fn test_empty_and_failed_are_distinct() {
        let store = MemoryStore::new("sales");
        assert_eq!(refresh(&store, &AggregateOptions::default()).await, RefreshOutcome::Empty);

        store.put("sales_data_1.json", b"nope".to_vec()).await.unwrap();
        let outcome = refresh(&store, &AggregateOptions::default()).await;
        assert!(outcome.views().is_none());
        assert!(outcome.error_message().unwrap().contains("sales"));
    }

    #[tokio::test]
    async fn test_bad_date_surfaces_as_failure() {
        let store = MemoryStore::new("sales");
        store
            .put(
                "sales_data_1.json",
                br#"{"order_id": 1, "product": "Mouse", "price": 20, "date": "whenever"}"#.to_vec(),
            )
            .await
            .unwrap();

        let outcome = refresh(&store, &AggregateOptions::default()).await;
        assert!(matches!(outcome, RefreshOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_cache_holds_until_refresh() {
        let mut dashboard = Dashboard::new(MemoryStore::new("sales"), AggregateOptions::default());
        assert_eq!(dashboard.current().await, &RefreshOutcome::Empty);

        dashboard
            .store()
            .put("sales_data_7.json", RECORD.to_vec())
            .await
            .unwrap();

        // Still the cached empty result.
        assert_eq!(dashboard.current().await, &RefreshOutcome::Empty);

        let outcome = dashboard.refresh().await;
        assert_eq!(outcome.views().map(|v| v.count), Some(1));
    }
}
