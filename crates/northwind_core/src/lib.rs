//! Order persistence core for a Northwind-style store.
//! This crate is the single source of truth for order data-access invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ConnectionFactory, DbError, DbResult, SqliteConnectionFactory};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::order::{Order, OrderDetail, OrderId, OrderValidationError, ShippingAddress};
pub use model::refs::{Customer, Employee, Product, Shipper};
pub use repo::order_repo::{OrderRepository, RepoError, RepoResult, SqliteOrderRepository};
pub use service::order_service::OrderService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
