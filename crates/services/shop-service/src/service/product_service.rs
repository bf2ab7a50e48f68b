//! Product service - catalogue reads, writes and stock decrements.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{Cacheable, CreateProduct, PageRequest, Product, StockUpdate, UpdateProduct};

use crate::cache::CacheAside;
use crate::deadline::Deadline;
use crate::repository::ProductRepository;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn create_product(&self, input: CreateProduct) -> AppResult<Product>;

    /// Get product by ID, served from cache when possible
    async fn get_product(&self, id: i32) -> AppResult<Product>;

    /// List one page of products, served from cache when possible
    async fn list_products(&self, page: PageRequest) -> AppResult<Vec<Product>>;

    /// Total number of products, always read from the store
    async fn count_products(&self) -> AppResult<u64>;

    /// Apply a partial update and return the stored result
    async fn update_product(&self, id: i32, patch: UpdateProduct) -> AppResult<Product>;

    async fn delete_product(&self, id: i32) -> AppResult<()>;

    /// Take units from stock; never lets stock go below zero
    async fn update_stock(&self, id: i32, update: StockUpdate) -> AppResult<Product>;
}

/// Concrete implementation of ProductService using repository and cache.
pub struct ProductManager {
    repo: Arc<dyn ProductRepository>,
    cache: CacheAside,
    request_timeout: Duration,
}

impl ProductManager {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        cache: CacheAside,
        request_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            cache,
            request_timeout,
        }
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.request_timeout)
    }

    async fn reload(&self, deadline: &Deadline, id: i32) -> AppResult<Product> {
        deadline
            .run("product lookup", self.repo.find_by_id(id))
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn create_product(&self, input: CreateProduct) -> AppResult<Product> {
        input.validate()?;
        let deadline = self.deadline();

        let product = deadline
            .run("product insert", self.repo.create(input))
            .await?;

        self.cache.invalidate(&Product::list_invalidation_keys()).await;

        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    async fn get_product(&self, id: i32) -> AppResult<Product> {
        let deadline = self.deadline();
        let key = Product::entity_key(id);

        if let Some(product) = self.cache.fetch::<Product>(&deadline, &key).await {
            return Ok(product);
        }

        let product = self.reload(&deadline, id).await?;

        self.cache.store(&deadline, &key, &product).await;
        Ok(product)
    }

    async fn list_products(&self, page: PageRequest) -> AppResult<Vec<Product>> {
        let deadline = self.deadline();
        let key = Product::list_key(&page);

        if let Some(products) = self.cache.fetch::<Vec<Product>>(&deadline, &key).await {
            return Ok(products);
        }

        let products = deadline
            .run("product list", self.repo.list(page.limit(), page.offset()))
            .await?;

        self.cache.store(&deadline, &key, &products).await;
        Ok(products)
    }

    async fn count_products(&self) -> AppResult<u64> {
        self.deadline()
            .run("product count", self.repo.count())
            .await
    }

    async fn update_product(&self, id: i32, patch: UpdateProduct) -> AppResult<Product> {
        let patch = patch.normalized();
        let deadline = self.deadline();

        self.reload(&deadline, id).await?;

        deadline
            .run("product update", self.repo.update(id, patch))
            .await?;

        self.cache.invalidate(&Product::invalidation_keys(id)).await;

        info!(product_id = id, "Product updated");
        self.reload(&deadline, id).await
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        let deadline = self.deadline();

        deadline
            .run("product delete", self.repo.delete(id))
            .await?;

        self.cache.invalidate(&Product::invalidation_keys(id)).await;

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn update_stock(&self, id: i32, update: StockUpdate) -> AppResult<Product> {
        update.validate()?;
        let deadline = self.deadline();

        // Fast rejection with a precise message. The conditional decrement
        // below is what actually guards the stock.
        let current = self.reload(&deadline, id).await?;
        current.ensure_stock(update.quantity)?;

        let applied = deadline
            .run(
                "stock decrement",
                self.repo.decrement_stock(id, update.quantity),
            )
            .await?;

        if !applied {
            warn!(
                product_id = id,
                quantity = update.quantity,
                "Stock decrement lost a race"
            );
            return Err(AppError::insufficient_stock(
                "insufficient stock or product not found",
            ));
        }

        self.cache.invalidate(&Product::invalidation_keys(id)).await;

        info!(product_id = id, quantity = update.quantity, "Stock decremented");
        self.reload(&deadline, id).await
    }
}
