//! User service - cache-aside reads and invalidation for users.
//!
//! SOLID (SRP): Handles user-related use cases only.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{Cacheable, CreateUser, PageRequest, UpdateUser, User};

use crate::cache::CacheAside;
use crate::deadline::Deadline;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user; fails with `Conflict` if the email is taken
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Get user by ID, served from cache when possible
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// List one page of users, served from cache when possible
    async fn list_users(&self, page: PageRequest) -> AppResult<Vec<User>>;

    /// Total number of users, always read from the store
    async fn count_users(&self) -> AppResult<u64>;

    /// Apply a partial update and return the stored result
    async fn update_user(&self, id: i32, patch: UpdateUser) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete_user(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository and cache.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    cache: CacheAside,
    request_timeout: Duration,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>, cache: CacheAside, request_timeout: Duration) -> Self {
        Self {
            repo,
            cache,
            request_timeout,
        }
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.request_timeout)
    }
}

/// The unique index on `email` can still fire if two creates race past the
/// pre-insert lookup.
fn email_conflict(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::conflict("Email"),
        other => other,
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        input.validate()?;
        let deadline = self.deadline();

        if deadline
            .run("user lookup", self.repo.find_by_email(&input.email))
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email"));
        }

        let user = deadline
            .run("user insert", self.repo.create(input))
            .await
            .map_err(email_conflict)?;

        self.cache.invalidate(&User::list_invalidation_keys()).await;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        let deadline = self.deadline();
        let key = User::entity_key(id);

        if let Some(user) = self.cache.fetch::<User>(&deadline, &key).await {
            return Ok(user);
        }

        let user = deadline
            .run("user lookup", self.repo.find_by_id(id))
            .await?
            .ok_or_not_found()?;

        self.cache.store(&deadline, &key, &user).await;
        Ok(user)
    }

    async fn list_users(&self, page: PageRequest) -> AppResult<Vec<User>> {
        let deadline = self.deadline();
        let key = User::list_key(&page);

        if let Some(users) = self.cache.fetch::<Vec<User>>(&deadline, &key).await {
            return Ok(users);
        }

        let users = deadline
            .run("user list", self.repo.list(page.limit(), page.offset()))
            .await?;

        self.cache.store(&deadline, &key, &users).await;
        Ok(users)
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.deadline().run("user count", self.repo.count()).await
    }

    async fn update_user(&self, id: i32, patch: UpdateUser) -> AppResult<User> {
        let patch = patch.normalized();
        patch.validate()?;
        let deadline = self.deadline();

        deadline
            .run("user lookup", self.repo.find_by_id(id))
            .await?
            .ok_or_not_found()?;

        deadline
            .run("user update", self.repo.update(id, patch))
            .await
            .map_err(email_conflict)?;

        self.cache.invalidate(&User::invalidation_keys(id)).await;

        info!(user_id = id, "User updated");

        // Respond with what the store holds, not the patch
        deadline
            .run("user lookup", self.repo.find_by_id(id))
            .await?
            .ok_or_not_found()
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        let deadline = self.deadline();

        deadline.run("user delete", self.repo.delete(id)).await?;

        self.cache.invalidate(&User::invalidation_keys(id)).await;

        info!(user_id = id, "User deleted");
        Ok(())
    }
}
