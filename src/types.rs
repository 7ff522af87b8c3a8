use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

/// unique identifier for a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

/// unique identifier for a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(Uuid);

/// unique identifier for a school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolId(Uuid);

impl InvoiceId {
    pub fn new() -> Self {
        InvoiceId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        InvoiceId(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl PaymentId {
    pub fn new() -> Self {
        PaymentId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        PaymentId(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl StudentId {
    pub fn new() -> Self {
        StudentId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        StudentId(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl SchoolId {
    pub fn new() -> Self {
        SchoolId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        SchoolId(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for StudentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for SchoolId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// invoice payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// no payments received yet
    Pending,
    /// some payments received, balance remaining
    PartiallyPaid,
    /// fully paid, sum of payments equals the amount
    Paid,
    /// cancelled, no payment expected
    Cancelled,
}

impl InvoiceStatus {
    /// terminal statuses admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }

    /// the single legal-transition table for the invoice lifecycle
    ///
    /// pending -> partially_paid | paid | cancelled
    /// partially_paid -> paid | cancelled
    /// paid, cancelled -> terminal
    ///
    /// A same-status transition is legal and acts as a timestamp bump.
    pub fn can_transition_to(&self, target: InvoiceStatus) -> bool {
        use InvoiceStatus::*;

        if *self == target {
            return true;
        }

        match self {
            Pending => matches!(target, PartiallyPaid | Paid | Cancelled),
            PartiallyPaid => matches!(target, Paid | Cancelled),
            Paid | Cancelled => false,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::PartiallyPaid => "partially_paid",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// student enrollment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Inactive,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
        };
        write!(f, "{s}")
    }
}
