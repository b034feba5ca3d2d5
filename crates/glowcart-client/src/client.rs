use std::time::Duration;

use reqwest::Client;

use crate::error::ClientError;
use crate::pagination::next_page_cursor;
use crate::retry::with_backoff;
use crate::types::{WireCollection, WireCollectionsPage, WireMemberPage, WireProduct, WireProductsPage};

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
const MAX_PAGES: usize = 200;

/// HTTP client for the commerce backend's public catalog endpoints.
///
/// Covers `products.json` (cursor-paginated via the `Link` header),
/// `collections.json`, and per-collection membership listings. Rate limiting
/// (429), not-found (404), and other non-2xx responses surface as typed
/// errors; transient failures (429, network) are retried with exponential
/// backoff up to `max_retries` additional attempts.
pub struct CatalogClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a client with the given timeout, `User-Agent`, and retry
    /// policy. `max_retries = 0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page of products, returning the parsed page and the raw
    /// `Link` header (if present) for [`next_page_cursor`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ClientError::NotFound`]: HTTP 404 (not retried).
    /// - [`ClientError::UnexpectedStatus`]: any other non-2xx (not retried).
    /// - [`ClientError::Http`]: network failure after all retries.
    /// - [`ClientError::Deserialize`]: body does not match the expected shape.
    pub async fn fetch_products_page(
        &self,
        shop_url: &str,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<(WireProductsPage, Option<String>), ClientError> {
        let url = products_url(shop_url, limit, page_info);
        with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let (body, link_header) = self.get_with_link(&url, shop_url).await?;
                let parsed = serde_json::from_str::<WireProductsPage>(&body).map_err(|e| {
                    ClientError::Deserialize {
                        context: format!("products page from {shop_url}"),
                        source: e,
                    }
                })?;
                Ok((parsed, link_header))
            }
        })
        .await
    }

    /// Fetches the complete product list by following `Link` cursors until
    /// no `rel="next"` remains. `inter_request_delay_ms` is applied between
    /// page requests (never before the first).
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`], plus
    /// [`ClientError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_all_products(
        &self,
        shop_url: &str,
        limit: u32,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<WireProduct>, ClientError> {
        let mut all_products: Vec<WireProduct> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages_fetched = 0usize;

        loop {
            if pages_fetched == MAX_PAGES {
                return Err(ClientError::PaginationLimit {
                    shop_url: shop_url.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }
            if pages_fetched > 0 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            let (page, link_header) = self
                .fetch_products_page(shop_url, limit, cursor.as_deref())
                .await?;
            pages_fetched += 1;
            all_products.extend(page.products);

            cursor = next_page_cursor(link_header.as_deref());
            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!(
            shop_url,
            pages = pages_fetched,
            products = all_products.len(),
            "catalog product fetch complete"
        );
        Ok(all_products)
    }

    /// Fetches the collection list (id, title, handle) used to populate the
    /// category filter's options.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_products_page`].
    pub async fn fetch_collections(
        &self,
        shop_url: &str,
    ) -> Result<Vec<WireCollection>, ClientError> {
        let url = format!("{}/collections.json", store_origin(shop_url));
        with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let (body, _) = self.get_with_link(&url, shop_url).await?;
                let parsed = serde_json::from_str::<WireCollectionsPage>(&body).map_err(|e| {
                    ClientError::Deserialize {
                        context: format!("collections from {shop_url}"),
                        source: e,
                    }
                })?;
                Ok(parsed.collections)
            }
        })
        .await
        .map(|collections| {
            tracing::debug!(shop_url, count = collections.len(), "fetched collections");
            collections
        })
    }

    /// Fetches the product ids belonging to one collection, used to attach
    /// collection titles to products for the all-products grid.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_products_page`].
    pub async fn fetch_collection_member_ids(
        &self,
        shop_url: &str,
        collection_handle: &str,
    ) -> Result<Vec<i64>, ClientError> {
        let url = format!(
            "{}/collections/{collection_handle}/products.json",
            store_origin(shop_url)
        );
        with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let (body, _) = self.get_with_link(&url, shop_url).await?;
                let parsed = serde_json::from_str::<WireMemberPage>(&body).map_err(|e| {
                    ClientError::Deserialize {
                        context: format!("collection {collection_handle} members from {shop_url}"),
                        source: e,
                    }
                })?;
                Ok(parsed.products.into_iter().map(|p| p.id).collect())
            }
        })
        .await
    }

    /// One GET with the shared status handling: 429 and 404 become typed
    /// errors, other non-2xx become `UnexpectedStatus`, and the `Link`
    /// header is captured before the body is consumed.
    async fn get_with_link(
        &self,
        url: &str,
        shop_url: &str,
    ) -> Result<(String, Option<String>), ClientError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited {
                host: host_of(shop_url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let link_header = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await?;
        Ok((body, link_header))
    }
}

/// Builds the `products.json` URL for the given shop, page size, and cursor.
///
/// When a cursor is present the URL is built through `reqwest::Url` so the
/// cursor value is query-encoded.
fn products_url(shop_url: &str, limit: u32, page_info: Option<&str>) -> String {
    let origin = store_origin(shop_url);
    match page_info {
        Some(cursor) => {
            if let Ok(mut url) = reqwest::Url::parse(&format!("{origin}/products.json")) {
                url.query_pairs_mut()
                    .append_pair("limit", &limit.to_string())
                    .append_pair("page_info", cursor);
                url.to_string()
            } else {
                // Origin did not parse (e.g. missing scheme). Cursors come
                // from the backend's own Link header and are base64-safe,
                // so an unencoded fallback is acceptable.
                tracing::warn!(shop_url, "shop URL is not a valid URL base; using unencoded cursor");
                format!("{origin}/products.json?limit={limit}&page_info={cursor}")
            }
        }
        None => format!("{origin}/products.json?limit={limit}"),
    }
}

/// Reduces a shop URL to its scheme+host origin so catalog endpoints are
/// always requested from the store root, even when the configured URL
/// carries a path.
fn store_origin(shop_url: &str) -> String {
    reqwest::Url::parse(shop_url).map_or_else(
        |_| {
            // Fallback: keep "scheme://host" by taking the first three
            // slash-separated parts.
            shop_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Hostname for error messages; falls back to the raw URL when unparseable.
fn host_of(shop_url: &str) -> String {
    let without_scheme = shop_url
        .strip_prefix("https://")
        .or_else(|| shop_url.strip_prefix("http://"))
        .unwrap_or(shop_url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(shop_url)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_origin_strips_path() {
        assert_eq!(
            store_origin("https://shop.example.com/collections/all"),
            "https://shop.example.com"
        );
    }

    #[test]
    fn store_origin_keeps_bare_origin() {
        assert_eq!(
            store_origin("https://shop.example.com"),
            "https://shop.example.com"
        );
    }

    #[test]
    fn products_url_without_cursor() {
        assert_eq!(
            products_url("https://shop.example.com", 250, None),
            "https://shop.example.com/products.json?limit=250"
        );
    }

    #[test]
    fn products_url_encodes_cursor() {
        let url = products_url("https://shop.example.com", 250, Some("abc123"));
        assert!(url.contains("limit=250"));
        assert!(url.contains("page_info=abc123"));
    }

    #[test]
    fn host_of_strips_scheme_and_path() {
        assert_eq!(
            host_of("https://shop.example.com/collections/all"),
            "shop.example.com"
        );
    }
}
