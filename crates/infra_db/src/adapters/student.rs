//! PostgreSQL Student Adapter
//!
//! Implements `StoragePort<Student>` on top of [`StudentRepository`].
//! A student naming an unknown school surfaces as a foreign key violation.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AuditInfo, DomainPort, HealthCheckResult, HealthCheckable, SchoolId, StorageError, StudentId,
    UserId,
};
use domain_foundation::{Records, StoragePort};
use domain_student::Student;

use crate::repositories::student::{StudentRepository, StudentRow};

const ADAPTER_ID: &str = "postgres-student-adapter";

/// PostgreSQL implementation of the student storage port
#[derive(Debug, Clone)]
pub struct PostgresStudentAdapter {
    repository: StudentRepository,
    pool: PgPool,
}

impl PostgresStudentAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StudentRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresStudentAdapter {}

#[async_trait]
impl HealthCheckable for PostgresStudentAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::check_pool(ADAPTER_ID, &self.pool).await
    }
}

#[async_trait]
impl StoragePort<Student> for PostgresStudentAdapter {
    #[instrument(skip(self, student), fields(student_id = %student.id, school_id = %student.school_id))]
    async fn insert(&self, student: Student) -> Result<Student, StorageError> {
        debug!("Inserting student");

        let row = self.repository.insert(&student_to_row(&student)).await?;
        Ok(row_to_student(row))
    }

    fn select_all(&self) -> Records<Student> {
        let repository = self.repository.clone();

        Records::new(move || {
            let repository = repository.clone();
            stream::once(async move {
                debug!("Listing students");
                match repository.list().await {
                    Ok(rows) => rows.into_iter().map(|row| Ok(row_to_student(row))).collect(),
                    Err(e) => vec![Err(StorageError::from(e))],
                }
            })
            .flat_map(stream::iter)
            .boxed()
        })
    }

    #[instrument(skip(self), fields(student_id = %id))]
    async fn select_by_id(&self, id: StudentId) -> Result<Option<Student>, StorageError> {
        debug!("Fetching student by ID");

        let row = self.repository.get_by_id(*id.as_uuid()).await?;
        Ok(row.map(row_to_student))
    }

    #[instrument(skip(self, student), fields(student_id = %student.id, school_id = %student.school_id))]
    async fn update(&self, student: Student) -> Result<Student, StorageError> {
        debug!("Updating student");

        let row = self.repository.update(&student_to_row(&student)).await?;
        Ok(row_to_student(row))
    }

    #[instrument(skip(self, student), fields(student_id = %student.id))]
    async fn delete(&self, student: Student) -> Result<Student, StorageError> {
        debug!("Deleting student");

        let row = self.repository.delete(*student.id.as_uuid()).await?;
        Ok(row_to_student(row))
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

fn student_to_row(student: &Student) -> StudentRow {
    StudentRow {
        id: *student.id.as_uuid(),
        school_id: *student.school_id.as_uuid(),
        first_name: student.first_name.clone(),
        last_name: student.last_name.clone(),
        created_by: *student.audit.created_by.as_uuid(),
        created_date: student.audit.created_date,
        updated_by: *student.audit.updated_by.as_uuid(),
        updated_date: student.audit.updated_date,
    }
}

fn row_to_student(row: StudentRow) -> Student {
    Student {
        id: StudentId::from_uuid(row.id),
        school_id: SchoolId::from_uuid(row.school_id),
        first_name: row.first_name,
        last_name: row.last_name,
        audit: AuditInfo {
            created_by: UserId::from_uuid(row.created_by),
            created_date: row.created_date,
            updated_by: UserId::from_uuid(row.updated_by),
            updated_date: row.updated_date,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{random_student, TemporalFixtures};

    #[test]
    fn test_row_conversion_keeps_school_reference() {
        let school_id = SchoolId::new();
        let student = random_student(school_id, TemporalFixtures::now());

        let row = student_to_row(&student);

        assert_eq!(row.school_id, *school_id.as_uuid());
        assert_eq!(row.first_name, student.first_name);
        assert_eq!(row_to_student(row), student);
    }
}
