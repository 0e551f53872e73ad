//! Cache types for catalog API responses.

use super::types::{Brand, Category, ProductDetail, ProductSummary};

/// Cached value types.
///
/// Only the read-only catalog surface is cached; cart, favorites, auth,
/// and order responses never enter the cache.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<ProductDetail>),
    Products(Vec<ProductSummary>),
    Categories(Vec<Category>),
    Brands(Vec<Brand>),
}
