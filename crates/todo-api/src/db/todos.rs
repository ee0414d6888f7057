//! Todo persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `todos` table created
//! by the Todo migration.

use sqlx::PgPool;
use todo_core::Todo;

/// Insert a todo and return it with its assigned id.
///
/// The title must already be validated.
pub async fn insert(pool: &PgPool, title: &str) -> Result<Todo, sqlx::Error> {
    let row = sqlx::query_as::<_, TodoRow>(
        "INSERT INTO todos (title) VALUES ($1) RETURNING id, title",
    )
    .bind(title)
    .fetch_one(pool)
    .await?;

    Ok(row.into_record())
}

/// List all todos in id order.
pub async fn list(pool: &PgPool) -> Result<Vec<Todo>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TodoRow>("SELECT id, title FROM todos ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(TodoRow::into_record).collect())
}

/// Fetch a todo by id.
pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Todo>, sqlx::Error> {
    let row = sqlx::query_as::<_, TodoRow>("SELECT id, title FROM todos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(TodoRow::into_record))
}

/// Delete a todo. Returns `false` if no row had that id.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i32,
    title: String,
}

impl TodoRow {
    fn into_record(self) -> Todo {
        Todo {
            id: self.id,
            title: self.title,
        }
    }
}
