//! # Catalog Collaborator
//!
//! Port onto the external product catalog.
//!
//! Product and category CRUD, hierarchy, and seller inventory live in the
//! catalog service. This core consumes four read-only capabilities:
//! reference existence checks for create/update validation, the seller's
//! current category set for `Category` eligibility (computed at call
//! time, never cached on an RFQ), and display summaries for the admin
//! detail view.

use crate::domain::value_objects::{CategoryId, ProductId, SellerId};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Display summary of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
}

/// Display summary of a catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

/// Error type for catalog lookups.
#[derive(Debug, Error)]
#[error("catalog lookup failed: {0}")]
pub struct CatalogError(pub String);

impl CatalogError {
    /// Creates a catalog error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Read-only view of the external product catalog.
#[async_trait]
pub trait Catalog: Send + Sync + fmt::Debug {
    /// Returns the categories across the seller's own products, at call
    /// time.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog is unreachable.
    async fn categories_of_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<HashSet<CategoryId>, CatalogError>;

    /// Returns true if the product exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog is unreachable.
    async fn product_exists(&self, id: &ProductId) -> Result<bool, CatalogError>;

    /// Returns true if the category exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog is unreachable.
    async fn category_exists(&self, id: &CategoryId) -> Result<bool, CatalogError>;

    /// Returns the product's display summary, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog is unreachable.
    async fn product_summary(&self, id: &ProductId)
    -> Result<Option<ProductSummary>, CatalogError>;

    /// Returns the category's display summary, if it exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog is unreachable.
    async fn category_summary(
        &self,
        id: &CategoryId,
    ) -> Result<Option<CategorySummary>, CatalogError>;
}

/// In-memory [`Catalog`] for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, String>>,
    categories: RwLock<HashMap<CategoryId, String>>,
    seller_categories: RwLock<HashMap<SellerId, HashSet<CategoryId>>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a product.
    pub fn add_product(&self, id: impl Into<ProductId>, name: impl Into<String>) {
        self.products.write().insert(id.into(), name.into());
    }

    /// Registers a category.
    pub fn add_category(&self, id: impl Into<CategoryId>, name: impl Into<String>) {
        self.categories.write().insert(id.into(), name.into());
    }

    /// Records that a seller has a product in the given category.
    ///
    /// Mirrors the seller listing a product in the catalog; eligibility
    /// picks the change up on the next call without touching any RFQ.
    pub fn add_seller_category(&self, seller: impl Into<SellerId>, category: impl Into<CategoryId>) {
        self.seller_categories
            .write()
            .entry(seller.into())
            .or_default()
            .insert(category.into());
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn categories_of_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<HashSet<CategoryId>, CatalogError> {
        Ok(self
            .seller_categories
            .read()
            .get(seller_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn product_exists(&self, id: &ProductId) -> Result<bool, CatalogError> {
        Ok(self.products.read().contains_key(id))
    }

    async fn category_exists(&self, id: &CategoryId) -> Result<bool, CatalogError> {
        Ok(self.categories.read().contains_key(id))
    }

    async fn product_summary(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductSummary>, CatalogError> {
        Ok(self.products.read().get(id).map(|name| ProductSummary {
            id: id.clone(),
            name: name.clone(),
        }))
    }

    async fn category_summary(
        &self,
        id: &CategoryId,
    ) -> Result<Option<CategorySummary>, CatalogError> {
        Ok(self.categories.read().get(id).map(|name| CategorySummary {
            id: id.clone(),
            name: name.clone(),
        }))
    }
}

/// [`Catalog`] backed by the catalog service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalogClient {
    /// Creates a client against the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, CatalogError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::new(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| CatalogError::new(e.to_string()))?;
        let body = response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::new(e.to_string()))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl Catalog for HttpCatalogClient {
    async fn categories_of_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<HashSet<CategoryId>, CatalogError> {
        let path = format!("/sellers/{seller_id}/categories");
        let categories: Option<Vec<CategoryId>> = self.fetch_optional(&path).await?;
        Ok(categories.unwrap_or_default().into_iter().collect())
    }

    async fn product_exists(&self, id: &ProductId) -> Result<bool, CatalogError> {
        Ok(self.product_summary(id).await?.is_some())
    }

    async fn category_exists(&self, id: &CategoryId) -> Result<bool, CatalogError> {
        Ok(self.category_summary(id).await?.is_some())
    }

    async fn product_summary(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductSummary>, CatalogError> {
        self.fetch_optional(&format!("/products/{id}")).await
    }

    async fn category_summary(
        &self,
        id: &CategoryId,
    ) -> Result<Option<CategorySummary>, CatalogError> {
        self.fetch_optional(&format!("/categories/{id}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_existence_checks() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product("p1", "Steel beam");
        catalog.add_category("metals", "Metals");

        assert!(catalog.product_exists(&ProductId::new("p1")).await.unwrap());
        assert!(!catalog.product_exists(&ProductId::new("p2")).await.unwrap());
        assert!(catalog.category_exists(&CategoryId::new("metals")).await.unwrap());
    }

    #[tokio::test]
    async fn seller_categories_are_dynamic() {
        let catalog = InMemoryCatalog::new();
        let seller = SellerId::new("s1");

        assert!(catalog.categories_of_seller(&seller).await.unwrap().is_empty());

        catalog.add_seller_category("s1", "electronics");
        let categories = catalog.categories_of_seller(&seller).await.unwrap();
        assert!(categories.contains(&CategoryId::new("electronics")));
    }

    #[tokio::test]
    async fn summaries_carry_names() {
        let catalog = InMemoryCatalog::new();
        catalog.add_category("metals", "Metals");

        let summary = catalog
            .category_summary(&CategoryId::new("metals"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.name, "Metals");
    }
}
