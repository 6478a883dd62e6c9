//! Order use-case service.
//!
//! # Responsibility
//! - Provide stable order CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::order::{Order, OrderId};
use crate::repo::order_repo::{OrderRepository, RepoResult};

/// Use-case service wrapper for order persistence operations.
pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new order aggregate through repository rules.
    ///
    /// Returns the existing id unchanged when the order id is already
    /// present in the store.
    pub fn add_order(&self, order: &Order) -> RepoResult<OrderId> {
        self.repo.add_order(order)
    }

    /// Gets one fully hydrated order by id.
    pub fn get_order(&self, order_id: OrderId) -> RepoResult<Order> {
        self.repo.get_order(order_id)
    }

    /// Lists a page of fully hydrated orders.
    pub fn get_orders(&self, skip: i32, count: i32) -> RepoResult<Vec<Order>> {
        self.repo.get_orders(skip, count)
    }

    /// Replaces an order's line items and business columns.
    pub fn update_order(&self, order: &Order) -> RepoResult<()> {
        self.repo.update_order(order)
    }

    /// Removes an order and its line items.
    pub fn remove_order(&self, order_id: OrderId) -> RepoResult<()> {
        self.repo.remove_order(order_id)
    }
}
