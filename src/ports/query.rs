use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};
use crate::types::{InvoiceId, InvoiceStatus, SchoolId, StudentId};

const MAX_OFFSET: u32 = 10_000;
const MAX_LIMIT: u32 = 200;

/// offset/limit pagination, validated at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    offset: u32,
    limit: u32,
}

impl PaginationParams {
    pub fn new(offset: u32, limit: u32) -> Result<Self> {
        if offset > MAX_OFFSET {
            return Err(BillingError::InvalidData {
                message: format!("offset must not exceed {MAX_OFFSET}, got {offset}"),
            });
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(BillingError::InvalidData {
                message: format!("limit must be in 1..={MAX_LIMIT}, got {limit}"),
            });
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

/// sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// sort field and direction
///
/// Field validity is the caller's responsibility (use cases check it against
/// an allow-list); repositories may assume it and fall back to `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParams {
    pub field: String,
    pub order: SortOrder,
}

impl Default for SortParams {
    fn default() -> Self {
        Self {
            field: "created_at".to_string(),
            order: SortOrder::Desc,
        }
    }
}

/// one page of query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        (self.offset as u64 + self.items.len() as u64) < self.total
    }
}

/// invoice query filters; `None` means no filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceFilters {
    pub student_id: Option<StudentId>,
    pub school_id: Option<SchoolId>,
    pub status: Option<InvoiceStatus>,
    pub due_date_from: Option<DateTime<Utc>>,
    pub due_date_to: Option<DateTime<Utc>>,
}

/// payment query filters; `None` means no filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilters {
    pub invoice_id: Option<InvoiceId>,
    pub payment_date_from: Option<DateTime<Utc>>,
    pub payment_date_to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_bounds() {
        assert!(PaginationParams::new(0, 1).is_ok());
        assert!(PaginationParams::new(10_000, 200).is_ok());
        assert!(PaginationParams::new(10_001, 20).is_err());
        assert!(PaginationParams::new(0, 0).is_err());
        assert!(PaginationParams::new(0, 201).is_err());
    }

    #[test]
    fn test_page_has_more() {
        let page = Page {
            items: vec![1, 2, 3],
            total: 10,
            offset: 0,
            limit: 3,
        };
        assert!(page.has_more());

        let last = Page {
            items: vec![9, 10],
            total: 10,
            offset: 8,
            limit: 3,
        };
        assert!(!last.has_more());
    }
}
