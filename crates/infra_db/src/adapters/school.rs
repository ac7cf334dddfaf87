//! PostgreSQL School Adapter
//!
//! Implements `StoragePort<School>` on top of [`SchoolRepository`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::PostgresSchoolAdapter;
//! use domain_foundation::StoragePort;
//! use domain_school::School;
//!
//! let adapter = PostgresSchoolAdapter::new(pool);
//! let port: Arc<dyn StoragePort<School>> = Arc::new(adapter);
//! let school = port.select_by_id(school_id).await?;
//! ```

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AuditInfo, DomainPort, HealthCheckResult, HealthCheckable, SchoolId, StorageError, UserId,
};
use domain_foundation::{Records, StoragePort};
use domain_school::School;

use crate::repositories::school::{SchoolRepository, SchoolRow};

const ADAPTER_ID: &str = "postgres-school-adapter";

/// PostgreSQL implementation of the school storage port
#[derive(Debug, Clone)]
pub struct PostgresSchoolAdapter {
    repository: SchoolRepository,
    pool: PgPool,
}

impl PostgresSchoolAdapter {
    /// Creates a new adapter with the given database pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SchoolRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresSchoolAdapter {}

#[async_trait]
impl HealthCheckable for PostgresSchoolAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::check_pool(ADAPTER_ID, &self.pool).await
    }
}

#[async_trait]
impl StoragePort<School> for PostgresSchoolAdapter {
    #[instrument(skip(self, school), fields(school_id = %school.id))]
    async fn insert(&self, school: School) -> Result<School, StorageError> {
        debug!("Inserting school");

        let row = self.repository.insert(&school_to_row(&school)).await?;
        Ok(row_to_school(row))
    }

    fn select_all(&self) -> Records<School> {
        let repository = self.repository.clone();

        Records::new(move || {
            let repository = repository.clone();
            stream::once(async move {
                debug!("Listing schools");
                match repository.list().await {
                    Ok(rows) => rows.into_iter().map(|row| Ok(row_to_school(row))).collect(),
                    Err(e) => vec![Err(StorageError::from(e))],
                }
            })
            .flat_map(stream::iter)
            .boxed()
        })
    }

    #[instrument(skip(self), fields(school_id = %id))]
    async fn select_by_id(&self, id: SchoolId) -> Result<Option<School>, StorageError> {
        debug!("Fetching school by ID");

        let row = self.repository.get_by_id(*id.as_uuid()).await?;
        Ok(row.map(row_to_school))
    }

    #[instrument(skip(self, school), fields(school_id = %school.id))]
    async fn update(&self, school: School) -> Result<School, StorageError> {
        debug!("Updating school");

        let row = self.repository.update(&school_to_row(&school)).await?;
        Ok(row_to_school(row))
    }

    #[instrument(skip(self, school), fields(school_id = %school.id))]
    async fn delete(&self, school: School) -> Result<School, StorageError> {
        debug!("Deleting school");

        let row = self.repository.delete(*school.id.as_uuid()).await?;
        Ok(row_to_school(row))
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

fn school_to_row(school: &School) -> SchoolRow {
    SchoolRow {
        id: *school.id.as_uuid(),
        name: school.name.clone(),
        created_by: *school.audit.created_by.as_uuid(),
        created_date: school.audit.created_date,
        updated_by: *school.audit.updated_by.as_uuid(),
        updated_date: school.audit.updated_date,
    }
}

fn row_to_school(row: SchoolRow) -> School {
    School {
        id: SchoolId::from_uuid(row.id),
        name: row.name,
        audit: AuditInfo {
            created_by: UserId::from_uuid(row.created_by),
            created_date: row.created_date,
            updated_by: UserId::from_uuid(row.updated_by),
            updated_date: row.updated_date,
        },
    }
}
