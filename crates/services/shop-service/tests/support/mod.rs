//! In-memory stand-ins for PostgreSQL and Redis.
//!
//! The stores keep the guarantees the real backends give the services: a
//! unique email index, an atomic conditional stock decrement and TTL-bound
//! cache entries.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;

use common::{AppError, AppResult};
use domain::{CreateProduct, CreateUser, Product, UpdateProduct, UpdateUser, User};
use shop_service_lib::cache::{CacheAside, CacheStore};
use shop_service_lib::repository::{ProductRepository, UserRepository};
use shop_service_lib::service::{ProductManager, UserManager};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const CACHE_TTL: Duration = Duration::from_secs(300);

// =============================================================================
// Users
// =============================================================================

#[derive(Default)]
struct UserTable {
    last_id: i32,
    rows: BTreeMap<i32, User>,
}

/// User table with a unique index on `email`.
#[derive(Default)]
pub struct InMemoryUserStore {
    table: Mutex<UserTable>,
    reads: AtomicUsize,
}

impl InMemoryUserStore {
    /// Number of `find_by_id` calls served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let mut table = self.table.lock().unwrap();
        if table.rows.values().any(|u| u.email == input.email) {
            return Err(AppError::conflict("Record"));
        }

        table.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.last_id,
            name: input.name,
            email: input.email,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.lock().unwrap().rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<User>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, patch: UpdateUser) -> AppResult<()> {
        let mut table = self.table.lock().unwrap();
        if let Some(email) = &patch.email {
            if table.rows.values().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::conflict("Record"));
            }
        }

        let user = table.rows.get_mut(&id).ok_or(AppError::NotFound)?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.table
            .lock()
            .unwrap()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.table.lock().unwrap().rows.len() as u64)
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Default)]
struct ProductTable {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// Product table; `decrement_stock` is check-and-write under one lock.
#[derive(Default)]
pub struct InMemoryProductStore {
    table: Mutex<ProductTable>,
    reads: AtomicUsize,
}

impl InMemoryProductStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Stock as the store sees it, bypassing every cache
    pub fn stock_of(&self, id: i32) -> Option<i32> {
        self.table.lock().unwrap().rows.get(&id).map(|p| p.stock)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductStore {
    async fn create(&self, input: CreateProduct) -> AppResult<Product> {
        let mut table = self.table.lock().unwrap();
        table.last_id += 1;
        let now = Utc::now();
        let product = Product {
            id: table.last_id,
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.lock().unwrap().rows.get(&id).cloned())
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<Product>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, patch: UpdateProduct) -> AppResult<()> {
        let mut table = self.table.lock().unwrap();
        let product = table.rows.get_mut(&id).ok_or(AppError::NotFound)?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.table
            .lock()
            .unwrap()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.table.lock().unwrap().rows.len() as u64)
    }

    async fn decrement_stock(&self, id: i32, quantity: i32) -> AppResult<bool> {
        let mut table = self.table.lock().unwrap();
        match table.rows.get_mut(&id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                product.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Product store whose reads never finish in time.
pub struct StalledProductStore {
    pub inner: InMemoryProductStore,
    pub delay: Duration,
}

#[async_trait]
impl ProductRepository for StalledProductStore {
    async fn create(&self, input: CreateProduct) -> AppResult<Product> {
        self.inner.create(input).await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(id).await
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<Product>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list(limit, offset).await
    }

    async fn update(&self, id: i32, patch: UpdateProduct) -> AppResult<()> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }

    async fn decrement_stock(&self, id: i32, quantity: i32) -> AppResult<bool> {
        self.inner.decrement_stock(id, quantity).await
    }
}

// =============================================================================
// Cache
// =============================================================================

/// Key-value cache with TTL, checked lazily on read.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    hits: AtomicUsize,
}

impl InMemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Overwrite a raw value, e.g. to plant an undecodable entry
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            (value.to_string(), Instant::now() + CACHE_TTL),
        );
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => {
                self.hits.fetch_add(1, Ordering::SeqCst);
                Ok(Some(value.clone()))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Cache whose every call fails, like an unreachable Redis.
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::service_unavailable("redis"))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> AppResult<()> {
        Err(AppError::service_unavailable("redis"))
    }

    async fn delete(&self, _keys: &[String]) -> AppResult<()> {
        Err(AppError::service_unavailable("redis"))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::service_unavailable("redis"))
    }
}

/// In-memory cache whose deletes take a while to land.
pub struct SlowDeleteCache {
    pub inner: InMemoryCache,
    pub delay: Duration,
}

#[async_trait]
impl CacheStore for SlowDeleteCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, keys: &[String]) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(keys).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.inner.ping().await
    }
}

/// Cache that accepts connections but never answers.
pub struct HungCache;

#[async_trait]
impl CacheStore for HungCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> AppResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _keys: &[String]) -> AppResult<()> {
        std::future::pending().await
    }

    async fn ping(&self) -> AppResult<()> {
        std::future::pending().await
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub fn user_manager(store: Arc<InMemoryUserStore>, cache: Arc<dyn CacheStore>) -> UserManager {
    UserManager::new(store, CacheAside::new(cache, CACHE_TTL), REQUEST_TIMEOUT)
}

pub fn product_manager(
    store: Arc<dyn ProductRepository>,
    cache: Arc<dyn CacheStore>,
) -> ProductManager {
    ProductManager::new(store, CacheAside::new(cache, CACHE_TTL), REQUEST_TIMEOUT)
}

pub fn new_user(name: &str, email: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
    }
}

pub fn new_product(name: &str, price: f64, stock: i32) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: String::new(),
        price,
        stock,
    }
}
