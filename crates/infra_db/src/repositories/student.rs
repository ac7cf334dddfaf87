//! Student repository implementation
//!
//! This module provides database access for the `students` table. Every
//! student row references a row in `schools`; writes naming an unknown
//! school are rejected by the foreign key.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

const STUDENT_COLUMNS: &str =
    "id, school_id, first_name, last_name, created_by, created_date, updated_by, updated_date";

/// Repository for managing student rows
#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    /// Creates a new StudentRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new student row
    pub async fn insert(&self, row: &StudentRow) -> Result<StudentRow, DatabaseError> {
        let query = format!(
            "INSERT INTO students ({STUDENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {STUDENT_COLUMNS}"
        );

        let stored = sqlx::query_as::<_, StudentRow>(&query)
            .bind(row.id)
            .bind(row.school_id)
            .bind(&row.first_name)
            .bind(&row.last_name)
            .bind(row.created_by)
            .bind(row.created_date)
            .bind(row.updated_by)
            .bind(row.updated_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    /// Lists every student, oldest first
    pub async fn list(&self) -> Result<Vec<StudentRow>, DatabaseError> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY created_date, id");

        let rows = sqlx::query_as::<_, StudentRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Retrieves a student by their identifier
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<StudentRow>, DatabaseError> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");

        let row = sqlx::query_as::<_, StudentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Replaces the mutable columns of a student, including the school
    pub async fn update(&self, row: &StudentRow) -> Result<StudentRow, DatabaseError> {
        let query = format!(
            "UPDATE students \
             SET school_id = $2, first_name = $3, last_name = $4, updated_by = $5, updated_date = $6 \
             WHERE id = $1 \
             RETURNING {STUDENT_COLUMNS}"
        );

        sqlx::query_as::<_, StudentRow>(&query)
            .bind(row.id)
            .bind(row.school_id)
            .bind(&row.first_name)
            .bind(&row.last_name)
            .bind(row.updated_by)
            .bind(row.updated_date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Student", row.id))
    }

    /// Deletes a student and returns the deleted row
    pub async fn delete(&self, id: Uuid) -> Result<StudentRow, DatabaseError> {
        let query = format!("DELETE FROM students WHERE id = $1 RETURNING {STUDENT_COLUMNS}");

        sqlx::query_as::<_, StudentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Student", id))
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row representation of a student
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub school_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_by: Uuid,
    pub created_date: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_date: DateTime<Utc>,
}
