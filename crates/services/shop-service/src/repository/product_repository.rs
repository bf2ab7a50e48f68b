//! Product repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use common::{AppError, AppResult};
use domain::{CreateProduct, Product, UpdateProduct};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product; the store assigns id and timestamps
    async fn create(&self, input: CreateProduct) -> AppResult<Product>;

    /// Find product by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// List products ordered by id
    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<Product>>;

    /// Overwrite the fields present in `patch` and bump `updated_at`
    async fn update(&self, id: i32, patch: UpdateProduct) -> AppResult<()>;

    /// Permanently delete product by ID
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Total number of products
    async fn count(&self) -> AppResult<u64>;

    /// Atomically take `quantity` units from stock.
    ///
    /// Returns `false` when no row matched, either because the product does
    /// not exist or because it holds fewer than `quantity` units.
    async fn decrement_stock(&self, id: i32, quantity: i32) -> AppResult<bool>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn create(&self, input: CreateProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn update(&self, id: i32, patch: UpdateProduct) -> AppResult<()> {
        let product = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = product.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(stock) = patch.stock {
            active.stock = Set(stock);
        }
        active.updated_at = Set(chrono::Utc::now());

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        ProductEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn decrement_stock(&self, id: i32, quantity: i32) -> AppResult<bool> {
        // The stock guard and the write are one statement
        let result = ProductEntity::update_many()
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::Stock.gte(quantity))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_decrement_stock_reports_matched_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(1)])
            .into_connection();
        let store = ProductStore::new(db);

        assert!(store.decrement_stock(1, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_decrement_stock_without_match_returns_false() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(0)])
            .into_connection();
        let store = ProductStore::new(db);

        assert!(!store.decrement_stock(1, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(0)])
            .into_connection();
        let store = ProductStore::new(db);

        let result = store.delete(42).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
