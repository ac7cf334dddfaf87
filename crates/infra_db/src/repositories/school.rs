//! School repository implementation
//!
//! This module provides database access for the `schools` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

const SCHOOL_COLUMNS: &str = "id, name, created_by, created_date, updated_by, updated_date";

/// Repository for managing school rows
#[derive(Debug, Clone)]
pub struct SchoolRepository {
    pool: PgPool,
}

impl SchoolRepository {
    /// Creates a new SchoolRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new school row
    ///
    /// # Arguments
    ///
    /// * `row` - The school to insert
    ///
    /// # Returns
    ///
    /// The row as stored, or `DuplicateEntry` if the id is taken
    pub async fn insert(&self, row: &SchoolRow) -> Result<SchoolRow, DatabaseError> {
        let query = format!(
            "INSERT INTO schools ({SCHOOL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SCHOOL_COLUMNS}"
        );

        let stored = sqlx::query_as::<_, SchoolRow>(&query)
            .bind(row.id)
            .bind(&row.name)
            .bind(row.created_by)
            .bind(row.created_date)
            .bind(row.updated_by)
            .bind(row.updated_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    /// Lists every school, oldest first
    pub async fn list(&self) -> Result<Vec<SchoolRow>, DatabaseError> {
        let query = format!("SELECT {SCHOOL_COLUMNS} FROM schools ORDER BY created_date, id");

        let rows = sqlx::query_as::<_, SchoolRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Retrieves a school by its identifier
    ///
    /// # Arguments
    ///
    /// * `id` - The school identifier
    ///
    /// # Returns
    ///
    /// The school row, or `None` if no school has this id
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<SchoolRow>, DatabaseError> {
        let query = format!("SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = $1");

        let row = sqlx::query_as::<_, SchoolRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Replaces the mutable columns of a school
    ///
    /// The creation columns are never rewritten.
    ///
    /// # Returns
    ///
    /// The row as stored, or `NotFound` if the school no longer exists
    pub async fn update(&self, row: &SchoolRow) -> Result<SchoolRow, DatabaseError> {
        let query = format!(
            "UPDATE schools SET name = $2, updated_by = $3, updated_date = $4 \
             WHERE id = $1 \
             RETURNING {SCHOOL_COLUMNS}"
        );

        sqlx::query_as::<_, SchoolRow>(&query)
            .bind(row.id)
            .bind(&row.name)
            .bind(row.updated_by)
            .bind(row.updated_date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("School", row.id))
    }

    /// Deletes a school
    ///
    /// # Returns
    ///
    /// The deleted row, or `NotFound` if the school no longer exists
    pub async fn delete(&self, id: Uuid) -> Result<SchoolRow, DatabaseError> {
        let query = format!("DELETE FROM schools WHERE id = $1 RETURNING {SCHOOL_COLUMNS}");

        sqlx::query_as::<_, SchoolRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("School", id))
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row representation of a school
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SchoolRow {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_date: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_date: DateTime<Utc>,
}
