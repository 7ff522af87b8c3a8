use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};
use crate::types::SchoolId;

/// school that bills its students
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    id: SchoolId,
    name: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl School {
    pub fn create(name: &str, address: &str, now: DateTime<Utc>) -> Result<Self> {
        let name = name.trim();
        let address = address.trim();
        if name.is_empty() {
            return Err(BillingError::InvalidData {
                message: "school name cannot be empty".to_string(),
            });
        }
        if address.is_empty() {
            return Err(BillingError::InvalidData {
                message: "school address cannot be empty".to_string(),
            });
        }

        Ok(Self {
            id: SchoolId::new(),
            name: name.to_string(),
            address: address.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> SchoolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_create_validates_fields() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(School::create("Colegio Central", "Av. Reforma 1", now).is_ok());
        assert!(School::create("", "Av. Reforma 1", now).is_err());
        assert!(School::create("Colegio Central", "  ", now).is_err());
    }
}
