//! Domain model for order persistence.
//!
//! # Responsibility
//! - Define the order aggregate persisted by the repository layer.
//! - Define the read-only reference projections resolved during hydration.
//!
//! # Invariants
//! - Every persisted order is identified by a caller-supplied positive id.
//! - Line-item invariants are validated before any write reaches SQL.
//!
//! # See also
//! - docs/architecture/data-access.md

pub mod order;
pub mod refs;
