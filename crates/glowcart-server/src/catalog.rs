//! Catalog snapshot assembly and periodic refresh.
//!
//! The server keeps the whole catalog in memory as an immutable snapshot
//! behind a single swap point. Handlers clone an `Arc` to the current
//! snapshot and never observe a half-refreshed catalog; the refresh task
//! builds a complete new snapshot before swapping it in, and keeps the old
//! one when the backend is unavailable.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use glowcart_client::{CatalogClient, ClientError};
use glowcart_core::{AppConfig, Collection, Product};
use tokio::sync::RwLock;

/// One immutable catalog snapshot.
#[derive(Debug, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub collections: Vec<Collection>,
}

impl Catalog {
    /// Looks up a collection by its URL handle.
    #[must_use]
    pub fn collection_by_handle(&self, handle: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.handle == handle)
    }
}

/// Swap point shared between handlers and the refresh task.
pub type SharedCatalog = Arc<RwLock<Arc<Catalog>>>;

/// Fetches and assembles a complete catalog snapshot: collections, all
/// products, and per-collection membership (attached to each product as
/// collection titles for the all-products grid's category axis).
///
/// A failing membership listing only degrades that one collection;
/// products keep their remaining memberships. A failing product or
/// collection fetch fails the whole snapshot so the caller can keep the
/// previous one.
///
/// # Errors
///
/// Propagates [`ClientError`] from the product or collection list fetches.
pub async fn fetch_catalog(
    client: &CatalogClient,
    config: &AppConfig,
) -> Result<Catalog, ClientError> {
    let shop_url = &config.shop_url;
    let wire_collections = client.fetch_collections(shop_url).await?;
    let wire_products = client
        .fetch_all_products(shop_url, config.catalog_page_size, config.inter_request_delay_ms)
        .await?;

    let mut membership: HashMap<i64, Vec<String>> = HashMap::new();
    for collection in &wire_collections {
        if config.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }
        match client
            .fetch_collection_member_ids(shop_url, &collection.handle)
            .await
        {
            Ok(ids) => {
                for id in ids {
                    membership.entry(id).or_default().push(collection.title.clone());
                }
            }
            Err(error) => {
                tracing::warn!(
                    collection = %collection.handle,
                    %error,
                    "collection membership unavailable; skipping"
                );
            }
        }
    }

    let mut products = Vec::with_capacity(wire_products.len());
    for wire in wire_products {
        let collections = membership.remove(&wire.id).unwrap_or_default();
        match glowcart_client::normalize_product(wire, collections) {
            Ok(product) => products.push(product),
            Err(error) => {
                // One broken product must not take the grid down.
                tracing::warn!(%error, "skipping unnormalizable product");
            }
        }
    }

    let collections = wire_collections
        .into_iter()
        .map(|c| Collection {
            id: c.id.to_string(),
            title: c.title,
            handle: c.handle,
        })
        .collect();

    Ok(Catalog {
        products,
        collections,
    })
}

/// Spawns the periodic catalog refresh task. Each tick builds a fresh
/// snapshot and swaps it in; on failure the previous snapshot stays live.
pub fn spawn_catalog_refresh(
    client: Arc<CatalogClient>,
    config: Arc<AppConfig>,
    shared: SharedCatalog,
) {
    let period = Duration::from_secs(config.catalog_refresh_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; main already fetched at startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match fetch_catalog(&client, &config).await {
                Ok(catalog) => {
                    let products = catalog.products.len();
                    *shared.write().await = Arc::new(catalog);
                    tracing::info!(products, "catalog snapshot refreshed");
                }
                Err(error) => {
                    tracing::warn!(%error, "catalog refresh failed; keeping previous snapshot");
                }
            }
        }
    });
}
