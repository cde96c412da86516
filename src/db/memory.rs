use std::collections::BTreeSet;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{ProductStore, StoreError, StoreResult};
use crate::models::Product;

/// Process-local product collection.
///
/// IndexMap keeps insertion order for listings; removal uses `shift_remove`
/// so the order of the remaining products is preserved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<IndexMap<String, Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn find(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn insert(&self, product: &Product) -> StoreResult<()> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(StoreError::DuplicateId(product.id.clone()));
        }
        products.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn insert_many(&self, batch: &[Product]) -> StoreResult<()> {
        let mut products = self.products.write().await;
        // Check the whole batch first so a collision leaves the map untouched.
        let mut seen = BTreeSet::new();
        for product in batch {
            if products.contains_key(&product.id) || !seen.insert(product.id.as_str()) {
                return Err(StoreError::DuplicateId(product.id.clone()));
            }
        }
        for product in batch {
            products.insert(product.id.clone(), product.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(self.products.write().await.shift_remove(id).is_some())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.products.read().await.len() as i64)
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let products = self.products.read().await;
        let distinct: BTreeSet<&str> = products.values().map(|p| p.category.as_str()).collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }
}
