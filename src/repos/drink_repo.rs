/*
 * Responsibility
 * - drinks CRUD
 * - title は UNIQUE (重複は Conflict として上位へ)
 * - recipe は JSON 文字列のまま保持 (解釈は handler/DTO 側)
 */
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<DrinkRow>, RepoError> {
    let rows = sqlx::query_as::<_, DrinkRow>(
        r#"
        SELECT id, title, recipe, created_at, updated_at
        FROM drinks
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create(pool: &SqlitePool, title: &str, recipe: &str) -> Result<DrinkRow, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        INSERT INTO drinks (title, recipe)
        VALUES (?, ?)
        RETURNING id, title, recipe, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(recipe)
    .fetch_one(pool)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<DrinkRow>, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        SELECT id, title, recipe, created_at, updated_at
        FROM drinks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    title: Option<&str>,
    recipe: Option<&str>,
) -> Result<Option<DrinkRow>, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        UPDATE drinks
        SET
            title = COALESCE(?, title),
            recipe = COALESCE(?, recipe),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, title, recipe, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(recipe)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM drinks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
