//! Database connection and initialization.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, Schema,
};

use common::DatabaseConfig;

use super::retry::{connect_with_retry, BootstrapError, RetryPolicy};
use crate::repository::entities::{product, user};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect with bounded retries, then make sure the tables exist.
    pub async fn connect(
        config: &DatabaseConfig,
        policy: RetryPolicy,
    ) -> Result<Self, BootstrapError> {
        let options = connect_options(config);

        let connection = connect_with_retry("postgres", policy, || {
            let options = options.clone();
            async move {
                let db = Self::from_connection(SeaDatabase::connect(options).await?);
                db.ping().await?;
                Ok::<_, DbErr>(db)
            }
        })
        .await?;

        connection.ensure_schema().await?;
        tracing::info!("Database connected and schema ensured");

        Ok(connection)
    }

    /// Wrap an already established connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Create the `users` and `products` tables if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        self.create_table_if_absent(user::Entity).await?;
        self.create_table_if_absent(product::Entity).await?;
        Ok(())
    }

    async fn create_table_if_absent<E: EntityTrait>(&self, entity: E) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        let mut statement = Schema::new(backend).create_table_from_entity(entity);
        statement.if_not_exists();

        self.connection.execute(backend.build(&statement)).await?;
        Ok(())
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}

fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        .sqlx_logging(false);
    options
}
