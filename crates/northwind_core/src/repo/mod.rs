//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the order data-access contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce line-item validation before any SQL mutation.
//! - Repository APIs return semantic errors (`NotFound`, `OutOfRange`) in
//!   addition to DB transport errors.
//!
//! # See also
//! - docs/architecture/data-access.md

pub mod order_repo;
