//! account statement queries with cache-aside reads
//!
//! Cache failures are never surfaced to the caller: a failed read is
//! treated as a miss and a failed write is logged and ignored, so a broken
//! cache degrades to recomputing every statement.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::{BillingError, Result};
use crate::ports::{StatementCache, UnitOfWork};
use crate::statement::{SchoolAccountStatement, StudentAccountStatement};
use crate::types::{SchoolId, StudentId};

/// Computes (or fetches from cache) the account statement for one student.
pub async fn student_account_statement<U, C>(
    uow: &mut U,
    cache: &C,
    student_id: StudentId,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<StudentAccountStatement>
where
    U: UnitOfWork,
    C: StatementCache<StudentId, StudentAccountStatement> + ?Sized,
{
    match cache.get(&student_id).await {
        Ok(Some(cached)) => {
            debug!(student_id = %student_id, "statement cache hit");
            return Ok(cached);
        }
        Ok(None) => {}
        Err(err) => warn!(student_id = %student_id, error = %err, "statement cache read failed"),
    }

    let statement = compute_student_statement(uow, student_id, now).await?;

    if let Err(err) = cache.set(&student_id, &statement, ttl).await {
        warn!(student_id = %student_id, error = %err, "statement cache write failed");
    }
    Ok(statement)
}

/// Computes (or fetches from cache) the aggregated statement for a school.
///
/// Per-student statements are recomputed rather than read through the
/// student cache so the aggregate is internally consistent as of `now`.
pub async fn school_account_statement<U, C>(
    uow: &mut U,
    cache: &C,
    school_id: SchoolId,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<SchoolAccountStatement>
where
    U: UnitOfWork,
    C: StatementCache<SchoolId, SchoolAccountStatement> + ?Sized,
{
    match cache.get(&school_id).await {
        Ok(Some(cached)) => {
            debug!(school_id = %school_id, "statement cache hit");
            return Ok(cached);
        }
        Ok(None) => {}
        Err(err) => warn!(school_id = %school_id, error = %err, "statement cache read failed"),
    }

    uow.schools()
        .get(school_id, false)
        .await?
        .ok_or(BillingError::NotFound {
            entity: "school",
            id: school_id.as_uuid(),
        })?;

    let students = uow.students().list_by_school(school_id).await?;
    let mut statements = Vec::with_capacity(students.len());
    for student in &students {
        statements.push(compute_student_statement(uow, student.id(), now).await?);
    }
    let statement = SchoolAccountStatement::aggregate(school_id, &students, &statements, now);

    if let Err(err) = cache.set(&school_id, &statement, ttl).await {
        warn!(school_id = %school_id, error = %err, "statement cache write failed");
    }
    Ok(statement)
}

async fn compute_student_statement<U: UnitOfWork>(
    uow: &mut U,
    student_id: StudentId,
    now: DateTime<Utc>,
) -> Result<StudentAccountStatement> {
    let student = uow
        .students()
        .get(student_id, false)
        .await?
        .ok_or(BillingError::NotFound {
            entity: "student",
            id: student_id.as_uuid(),
        })?;

    let invoices = uow.invoices().list_by_student(student.id()).await?;
    let payments = uow.payments().list_by_student(student.id()).await?;
    StudentAccountStatement::compute(student.id(), &invoices, &payments, now)
}
