//! Read-only reference projections.
//!
//! # Responsibility
//! - Carry the subset of columns an order needs from each referenced table.
//!
//! # Invariants
//! - Projections are hydration output only; the repository never writes them
//!   back to their tables.

use serde::{Deserialize, Serialize};

/// Customer projection resolved from a `CustomerID` code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Alphanumeric customer code (`CustomerID`).
    pub code: String,
    /// Company name on record.
    pub company_name: String,
}

impl Customer {
    /// Creates a customer projection.
    pub fn new(code: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            company_name: company_name.into(),
        }
    }
}

/// Employee projection resolved from an `EmployeeID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Numeric employee id.
    pub id: i64,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Country the employee works from.
    pub country: String,
}

/// Shipper projection resolved from a `ShipperID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipper {
    /// Numeric shipper id.
    pub id: i64,
    /// Carrier company name.
    pub company_name: String,
}

/// Product projection resolved from a `ProductID`, including the category and
/// supplier names looked up through its own references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Numeric product id.
    pub id: i64,
    /// Product display name.
    pub product_name: String,
    /// Referenced supplier id.
    pub supplier_id: i64,
    /// Referenced category id.
    pub category_id: i64,
    /// Resolved category name.
    pub category: String,
    /// Resolved supplier company name.
    pub supplier: String,
}

impl Product {
    /// Creates a write-side product reference carrying only the id.
    ///
    /// Write paths persist the id alone; the remaining fields are hydrated by
    /// read-side lookups.
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            product_name: String::new(),
            supplier_id: 0,
            category_id: 0,
            category: String::new(),
            supplier: String::new(),
        }
    }
}
