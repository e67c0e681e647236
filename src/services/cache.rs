use std::sync::Arc;
use std::time::Duration;

use crate::error::SchemeError;
use crate::services::catalog::{Catalog, CatalogError, CatalogSource};

/// Read-through cache of loaded catalogs, keyed by source
///
/// Readers always receive a complete `Arc<Catalog>`. A refresh loads the new
/// catalog first and swaps it in with a single insert, so a failed reload
/// keeps serving the previous snapshot.
pub struct CatalogCache {
    loader: Arc<dyn CatalogSource>,
    cache: moka::future::Cache<String, Arc<Catalog>>,
    ttl_secs: u64,
}

impl CatalogCache {
    /// Create a new catalog cache
    ///
    /// A `ttl_secs` of zero disables expiry; catalogs then change only on
    /// an explicit refresh.
    pub fn new(loader: Arc<dyn CatalogSource>, ttl_secs: u64) -> Self {
        let mut builder = moka::future::Cache::builder().max_capacity(16);
        if ttl_secs > 0 {
            builder = builder.time_to_live(Duration::from_secs(ttl_secs));
        }

        Self {
            loader,
            cache: builder.build(),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Get a catalog, loading it on a miss
    ///
    /// Concurrent misses for the same source share a single load.
    pub async fn get(&self, source: &str) -> Result<Arc<Catalog>, SchemeError> {
        let loader = Arc::clone(&self.loader);
        let key = source.to_string();

        let catalog = self
            .cache
            .try_get_with(key.clone(), async move {
                load_blocking(loader, key).await.map(Arc::new)
            })
            .await?;

        tracing::trace!("Catalog ready: {} ({} schemes)", source, catalog.len());
        Ok(catalog)
    }

    /// Reload a catalog from its source and swap it in
    pub async fn refresh(&self, source: &str) -> Result<Arc<Catalog>, SchemeError> {
        let catalog = Arc::new(
            load_blocking(Arc::clone(&self.loader), source.to_string()).await?,
        );
        self.cache.insert(source.to_string(), Arc::clone(&catalog)).await;

        tracing::info!("Catalog refreshed: {} ({} schemes)", source, catalog.len());
        Ok(catalog)
    }

    /// Drop a cached catalog so the next read reloads it
    pub async fn invalidate(&self, source: &str) {
        self.cache.invalidate(source).await;
        tracing::debug!("Invalidated catalog: {}", source);
    }
}

/// Run a synchronous load on the blocking pool
async fn load_blocking(
    loader: Arc<dyn CatalogSource>,
    source: String,
) -> Result<Catalog, CatalogError> {
    tokio::task::spawn_blocking(move || loader.load(&source))
        .await
        .map_err(|e| CatalogError::Task(e.to_string()))?
}
