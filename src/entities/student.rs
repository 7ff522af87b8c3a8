use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};
use crate::types::{SchoolId, StudentId, StudentStatus};

/// student enrolled in a school
///
/// The school relationship is fixed at enrollment. Immutable; changes return
/// new instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    id: StudentId,
    school_id: SchoolId,
    first_name: String,
    last_name: String,
    email: String,
    status: StudentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Student {
    pub fn create(
        school_id: SchoolId,
        first_name: &str,
        last_name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(BillingError::InvalidData {
                message: "student name cannot be empty".to_string(),
            });
        }

        // coarse check, not RFC-compliant; catches obvious mistakes
        let domain_ok = email
            .rsplit_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !domain_ok {
            return Err(BillingError::InvalidData {
                message: format!("invalid email format: {email}"),
            });
        }

        Ok(Self {
            id: StudentId::new(),
            school_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.trim().to_string(),
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// return a new instance with inactive status
    pub fn deactivate(&self, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.status = StudentStatus::Inactive;
        next.updated_at = now;
        next
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn school_id(&self) -> SchoolId {
        self.school_id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> StudentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
