//! Ecom Market store API client implementation.
//!
//! Uses `reqwest` with a shared cookie store (the session cookie carries
//! auth and the guest cart) and caches catalog reads with `moka`
//! (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use ecom_market_core::{BrandId, CategoryId, Email, OrderId, ProductId};

use crate::config::ApiConfig;

use super::ApiError;
use super::cache::CacheValue;
use super::types::{
    Brand, CartEntryPayload, CartItemCreate, CartItemUpdate, CartPayload, Category,
    FavoriteItemCreate, FavoritesPayload, OrderCanceledPayload, OrderCreatedPayload, OrderDraft,
    OrderListPayload, OrderPayload, ProductDetail, ProductSummary, RegisterRequest, User,
};

const CATALOG_CACHE_CAPACITY: u64 = 1000;
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Ecom Market store API.
///
/// Provides typed access to catalog, cart, favorites, auth, and order
/// endpoints. Catalog responses are cached for 5 minutes; everything else
/// goes to the server on every call.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

/// Filters for the product list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Pagination offset.
    pub skip: Option<u32>,
    /// Pagination page size.
    pub limit: Option<u32>,
    /// Full-text search string.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category: Option<CategoryId>,
    /// Restrict to one brand.
    pub brand: Option<BrandId>,
}

impl ProductQuery {
    /// Whether this is the unfiltered first page (the only cacheable list).
    fn is_default(&self) -> bool {
        self.skip.is_none()
            && self.limit.is_none()
            && self.search.is_none()
            && self.category.is_none()
            && self.brand.is_none()
    }
}

impl ApiClient {
    /// Create a new store API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CATALOG_CACHE_CAPACITY)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Send a request and classify non-success statuses.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthExpired);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(read_detail(response).await));
        }

        if status.is_client_error() {
            return Err(ApiError::Validation(read_detail(response).await));
        }

        if status.is_server_error() {
            return Err(ApiError::Server(status.as_u16()));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.inner.http.get(self.endpoint(path))).await?;
        read_json(response).await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a filtered product list.
    ///
    /// Only the unfiltered first page is cached; search and filter queries
    /// always hit the server. Dropping the returned future cancels the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<ProductSummary>, ApiError> {
        let cache_key = "products".to_owned();

        if query.is_default()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut request = self.inner.http.get(self.endpoint("products"));
        if let Some(skip) = query.skip {
            request = request.query(&[("skip", skip)]);
        }
        if let Some(limit) = query.limit {
            request = request.query(&[("limit", limit)]);
        }
        if let Some(search) = &query.search {
            request = request.query(&[("search", search.as_str())]);
        }
        if let Some(category) = query.category {
            request = request.query(&[("category_id", category.as_i32())]);
        }
        if let Some(brand) = query.brand {
            request = request.query(&[("brand_id", brand.as_i32())]);
        }

        let response = self.send(request).await?;
        let products: Vec<ProductSummary> = read_json(response).await?;

        if query.is_default() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get full product detail by id.
    ///
    /// Dropping the returned future cancels the request; this is how the
    /// product page abandons a fetch when the visitor navigates away.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: ProductId) -> Result<ProductDetail, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: ProductDetail = self.get_json(&format!("products/{product_id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories".to_owned();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get_json("categories").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get all brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        let cache_key = "brands".to_owned();

        if let Some(CacheValue::Brands(brands)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }

        let brands: Vec<Brand> = self.get_json("brands").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Brands(brands.clone()))
            .await;

        Ok(brands)
    }

    /// Get the products of one brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the brand is not found or the API request fails.
    #[instrument(skip(self), fields(brand_id = %brand_id))]
    pub async fn brand_products(&self, brand_id: BrandId) -> Result<Vec<ProductSummary>, ApiError> {
        let cache_key = format!("brand-products:{brand_id}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for brand products");
            return Ok(products);
        }

        let products: Vec<ProductSummary> =
            self.get_json(&format!("brands/{brand_id}/products")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        self.inner
            .cache
            .invalidate(&format!("product:{product_id}"))
            .await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Fetch the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload violates
    /// cart invariants.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<CartPayload, ApiError> {
        let cart: CartPayload = self.get_json("cart").await?;
        cart.validate()
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartEntryPayload, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .post(self.endpoint("cart/items"))
                    .json(&CartItemCreate {
                        product_id,
                        quantity,
                    }),
            )
            .await?;
        read_json(response).await
    }

    /// Change a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartEntryPayload, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .patch(self.endpoint(&format!("cart/items/{product_id}")))
                    .json(&CartItemUpdate { quantity }),
            )
            .await?;
        read_json(response).await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_cart_item(&self, product_id: ProductId) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .delete(self.endpoint(&format!("cart/items/{product_id}"))),
        )
        .await?;
        Ok(())
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.send(self.inner.http.delete(self.endpoint("cart")))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Favorites Methods (not cached - mutable state)
    // =========================================================================

    /// Fetch the favorites list of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload contains
    /// duplicate products.
    #[instrument(skip(self))]
    pub async fn favorites(&self) -> Result<FavoritesPayload, ApiError> {
        let favorites: FavoritesPayload = self.get_json("favorites").await?;
        favorites.validate()
    }

    /// Add a product to the remote favorites list.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist, is already a
    /// favorite, or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_favorite(&self, product_id: ProductId) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .post(self.endpoint("favorites/items"))
                .json(&FavoriteItemCreate { product_id }),
        )
        .await?;
        Ok(())
    }

    /// Remove a product from the remote favorites list.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not a favorite or the API
    /// request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_favorite(&self, product_id: ProductId) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .delete(self.endpoint(&format!("favorites/items/{product_id}"))),
        )
        .await?;
        Ok(())
    }

    /// Drive the remote favorites membership of one product to
    /// `make_favorite` and return the authoritative membership.
    ///
    /// The store exposes add/remove rather than a toggle, so a toggle that
    /// races a change made elsewhere can hit "already in favorites" or
    /// "not in favorites". Both mean the server already agrees with the
    /// requested direction, so they fold into the authoritative answer
    /// instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails for any other reason.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn toggle_favorite(
        &self,
        product_id: ProductId,
        make_favorite: bool,
    ) -> Result<bool, ApiError> {
        if make_favorite {
            match self.add_favorite(product_id).await {
                Ok(()) => Ok(true),
                Err(ApiError::Validation(detail)) if detail.contains("already in favorites") => {
                    debug!("Product already in remote favorites");
                    Ok(true)
                }
                Err(e) => Err(e),
            }
        } else {
            match self.remove_favorite(product_id).await {
                Ok(()) => Ok(false),
                Err(ApiError::NotFound(_)) => {
                    debug!("Product already absent from remote favorites");
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        }
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with email and password. On success the server sets the
    /// session cookie on this client's cookie store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on bad credentials, or another
    /// error if the API request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<(), ApiError> {
        self.send(
            self.inner
                .http
                .post(self.endpoint("auth/jwt/login"))
                .form(&[("username", email.as_str()), ("password", password)]),
        )
        .await?;
        Ok(())
    }

    /// Log out, invalidating the server-side session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.inner.http.post(self.endpoint("auth/jwt/logout")))
            .await?;
        Ok(())
    }

    /// Fetch the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthExpired` when no session is active, or
    /// another error if the API request fails.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json("users/me").await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the email or phone is already
    /// registered, or another error if the API request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .post(self.endpoint("auth/register"))
                    .json(request),
            )
            .await?;
        read_json(response).await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Create an order from the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the cart is empty or the form
    /// is invalid, or another error if the API request fails.
    #[instrument(skip(self, draft))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<OrderCreatedPayload, ApiError> {
        let response = self
            .send(self.inner.http.post(self.endpoint("orders")).json(draft))
            .await?;
        read_json(response).await
    }

    /// List the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<OrderListPayload, ApiError> {
        self.get_json("orders").await
    }

    /// Get one order with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order(&self, order_id: OrderId) -> Result<OrderPayload, ApiError> {
        self.get_json(&format!("orders/{order_id}")).await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the order is no longer
    /// cancelable, or another error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<OrderCanceledPayload, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .delete(self.endpoint(&format!("orders/{order_id}"))),
            )
            .await?;
        read_json(response).await
    }
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Read a response body as JSON, logging the raw body on parse failure.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let text = response.text().await?;

    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse store API response"
            );
            Err(ApiError::Decode(e))
        }
    }
}

/// Extract a human-readable detail string from an error response.
async fn read_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    extract_detail(&text).unwrap_or_else(|| format!("HTTP {status}"))
}

/// Pull the `detail` field out of an error body. The store sends either a
/// plain string or a list of field errors with `msg` entries.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(errors) => {
            let messages: Vec<String> = errors
                .iter()
                .filter_map(|e| e.get("msg").and_then(|m| m.as_str()).map(str::to_owned))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        let body = r#"{"detail": "Product 5 not found"}"#;
        assert_eq!(extract_detail(body).unwrap(), "Product 5 not found");
    }

    #[test]
    fn test_extract_detail_field_errors() {
        let body = r#"{"detail": [
            {"loc": ["body", "quantity"], "msg": "Quantity must be at least 1"},
            {"loc": ["body", "product_id"], "msg": "value is not a valid integer"}
        ]}"#;
        assert_eq!(
            extract_detail(body).unwrap(),
            "Quantity must be at least 1; value is not a valid integer"
        );
    }

    #[test]
    fn test_extract_detail_absent() {
        assert!(extract_detail("{}").is_none());
        assert!(extract_detail("not json").is_none());
    }

    #[test]
    fn test_product_query_default_detection() {
        assert!(ProductQuery::default().is_default());
        let query = ProductQuery {
            search: Some("brake".to_owned()),
            ..ProductQuery::default()
        };
        assert!(!query.is_default());
    }
}
