//! # planner-db
//!
//! PostgreSQL persistence for smart-planner: user accounts, bearer tokens and
//! each user's saved to-do list.
//!
//! ## Example
//!
//! ```rust,ignore
//! use planner_db::{Database, PoolConfig, TodoItem, TodoRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect_with_config(
//!         "postgres://localhost/planner",
//!         PoolConfig::new().max_connections(5),
//!     )
//!     .await?;
//!     db.migrate().await?;
//!
//!     let user = db.users.create("alice", "hunter2hunter2").await?;
//!     db.todos.replace_all(user.id, &[TodoItem::new("Buy milk")]).await?;
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod todos;
pub mod tokens;
pub mod users;

// Note: Always compiled so integration tests (in tests/) can use it
pub mod test_fixtures;

// Re-export core types
pub use planner_core::*;

pub use pool::{create_lazy_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use todos::PgTodoRepository;
pub use tokens::PgTokenRepository;
pub use users::{hash_password, verify_password, PgUserRepository};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Saved to-do lists.
    pub todos: PgTodoRepository,
    /// User accounts.
    pub users: PgUserRepository,
    /// Bearer tokens.
    pub tokens: PgTokenRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            todos: PgTodoRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            tokens: PgTokenRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Create without opening any connection until the first query.
    pub fn connect_lazy(url: &str, config: PoolConfig) -> Result<Self> {
        Ok(Self::new(create_lazy_pool(url, config)?))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
