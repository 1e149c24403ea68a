//! Saved to-do list repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use planner_core::{Error, Priority, Result, StoredTodo, TodoItem, TodoRepository};

const TODO_COLUMNS: &str = "id, user_id, position, title, description, due_date, due_time, \
                            location, priority, status, created_at";

/// PostgreSQL implementation of TodoRepository.
#[derive(Clone)]
pub struct PgTodoRepository {
    pool: Pool<Postgres>,
}

impl PgTodoRepository {
    /// Create a new PgTodoRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_stored(row: &PgRow) -> Result<StoredTodo> {
    let priority: String = row.get("priority");
    let priority: Priority = priority
        .parse()
        .map_err(|e| Error::Internal(format!("Corrupt todo row: {}", e)))?;

    Ok(StoredTodo {
        id: row.get("id"),
        user_id: row.get("user_id"),
        position: row.get("position"),
        item: TodoItem {
            title: row.get("title"),
            description: row.get("description"),
            due_date: row.get("due_date"),
            due_time: row.get("due_time"),
            location: row.get("location"),
            priority,
            status: row.get("status"),
        },
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    #[instrument(skip(self, items), fields(subsystem = "db", component = "todos", op = "replace_all", user_id = %user_id, todo_count = items.len()))]
    async fn replace_all(&self, user_id: Uuid, items: &[TodoItem]) -> Result<Vec<StoredTodo>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let removed = sqlx::query("DELETE FROM todo WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        let mut stored = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| Error::InvalidInput("Too many todos in one batch".to_string()))?;
            let id = Uuid::now_v7();

            sqlx::query(
                r#"INSERT INTO todo (
                    id, user_id, position, title, description, due_date, due_time,
                    location, priority, status, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
            )
            .bind(id)
            .bind(user_id)
            .bind(position)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.due_date)
            .bind(&item.due_time)
            .bind(&item.location)
            .bind(item.priority.as_str())
            .bind(item.status)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

            stored.push(StoredTodo {
                id,
                user_id,
                position,
                item: item.clone(),
                created_at: now,
            });
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(removed, inserted = stored.len(), "Replaced todo list");
        Ok(stored)
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "todos", op = "list"))]
    async fn list(&self, user_id: Uuid) -> Result<Vec<StoredTodo>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM todo WHERE user_id = $1 ORDER BY position",
            TODO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(row_to_stored).collect()
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "todos", op = "update_status"))]
    async fn update_status(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        status: bool,
    ) -> Result<StoredTodo> {
        let row = sqlx::query(&format!(
            "UPDATE todo SET status = $3 WHERE id = $1 AND user_id = $2 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(todo_id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("Todo {} not found", todo_id)))?;

        row_to_stored(&row)
    }
}
