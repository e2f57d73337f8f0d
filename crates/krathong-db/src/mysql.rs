//! MySQL implementation of KrathongRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use krathong_core::{Krathong, KrathongId, NewKrathong};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;
use tracing::{debug, instrument};

use crate::error::{DbError, DbResult};
use crate::repository::KrathongRepository;

const SELECT_BY_ID: &str = r#"
    SELECT krathong_id, krathong_type, emp_name, emp_department, emp_wish, created_at
    FROM krathongs
    WHERE krathong_id = ?
"#;

const SELECT_LATEST: &str = r#"
    SELECT krathong_id, krathong_type, emp_name, emp_department, emp_wish, created_at
    FROM krathongs
    ORDER BY created_at DESC, krathong_id DESC
    LIMIT ?
"#;

/// MySQL implementation of KrathongRepository
#[derive(Debug, Clone)]
pub struct MySqlKrathongRepository {
    pool: MySqlPool,
}

impl MySqlKrathongRepository {
    /// Create a new MySQL repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KrathongRepository for MySqlKrathongRepository {
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

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| DbError::InvalidData(format!("Inserted id out of range: {}", e)))?;

        // Read back so created_at reflects the column default
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        let created = row_to_krathong(&row)?;
        debug!(krathong_id = %created.krathong_id, "Krathong inserted");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn latest(&self, limit: u32) -> DbResult<Vec<Krathong>> {
        debug!("Listing latest krathongs");

        let rows = sqlx::query(SELECT_LATEST)
            .bind(limit)
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

fn row_to_krathong(row: &MySqlRow) -> DbResult<Krathong> {
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
