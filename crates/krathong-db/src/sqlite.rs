//! SQLite implementation of KrathongRepository
//!
//! Mirrors the MySQL repository against the SQLite schema. Used for
//! in-process testing and single-node development setups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use krathong_core::{Krathong, KrathongId, NewKrathong};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, instrument};

use crate::error::{DbError, DbResult};
use crate::repository::KrathongRepository;

/// SQLite implementation of KrathongRepository
#[derive(Debug, Clone)]
pub struct SqliteKrathongRepository {
    pool: SqlitePool,
}

impl SqliteKrathongRepository {
    /// Create a new SQLite repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KrathongRepository for SqliteKrathongRepository {
    #[instrument(skip(self, krathong), fields(krathong_type = ?krathong.krathong_type))]
    async fn insert(&self, krathong: NewKrathong) -> DbResult<Krathong> {
        debug!("Inserting krathong");

        let result = sqlx::query(
            r#"
            INSERT INTO krathongs (krathong_type, emp_name, emp_department, emp_wish)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(krathong.krathong_type)
        .bind(&krathong.emp_name)
        .bind(&krathong.emp_department)
        .bind(&krathong.emp_wish)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            r#"
            SELECT krathong_id, krathong_type, emp_name, emp_department, emp_wish, created_at
            FROM krathongs
            WHERE krathong_id = ?
            "#,
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await?;

        row_to_krathong(&row)
    }

    #[instrument(skip(self))]
    async fn latest(&self, limit: u32) -> DbResult<Vec<Krathong>> {
        debug!("Listing latest krathongs");

        let rows = sqlx::query(
            r#"
            SELECT krathong_id, krathong_type, emp_name, emp_department, emp_wish, created_at
            FROM krathongs
            ORDER BY created_at DESC, krathong_id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_krathong).collect()
    }

    async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::Connection(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

fn row_to_krathong(row: &SqliteRow) -> DbResult<Krathong> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Krathong {
        krathong_id: KrathongId::new(row.try_get("krathong_id")?),
        krathong_type: row.try_get("krathong_type")?,
        emp_name: row.try_get("emp_name")?,
        emp_department: row.try_get("emp_department")?,
        emp_wish: row.try_get("emp_wish")?,
        created_at,
    })
}
