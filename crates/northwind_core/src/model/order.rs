//! Order aggregate model.
//!
//! # Responsibility
//! - Define the canonical order record, its shipping address value and its
//!   line items.
//! - Enforce line-item invariants before persistence.
//!
//! # Invariants
//! - `Order::id` is caller-supplied and must stay positive.
//! - An `OrderDetail` always carries the id of the order it belongs to.
//! - Line-item amounts are decimal-exact; no float arithmetic in the model.
//!
//! # See also
//! - docs/architecture/data-access.md

use crate::model::refs::{Customer, Employee, Product, Shipper};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a persisted order.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type OrderId = i64;

/// Validation error raised before any line-item write reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderValidationError {
    /// Detail back-reference points at a non-positive order id.
    NonPositiveOrderId(OrderId),
    /// Referenced product id is not a positive integer.
    NonPositiveProductId(i64),
    /// Unit price is below zero.
    NegativeUnitPrice,
    /// Quantity is below one.
    NonPositiveQuantity(i64),
    /// Discount is below zero.
    NegativeDiscount,
}

impl Display for OrderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveOrderId(id) => {
                write!(f, "order detail references non-positive order id {id}")
            }
            Self::NonPositiveProductId(id) => {
                write!(f, "order detail references non-positive product id {id}")
            }
            Self::NegativeUnitPrice => write!(f, "order detail unit price is negative"),
            Self::NonPositiveQuantity(quantity) => {
                write!(f, "order detail quantity {quantity} is below one")
            }
            Self::NegativeDiscount => write!(f, "order detail discount is negative"),
        }
    }
}

impl Error for OrderValidationError {}

/// Shipping destination value carried by every order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street address line.
    pub address: String,
    /// Destination city.
    pub city: String,
    /// Optional state/province; `None` when the destination has none.
    pub region: Option<String>,
    /// Postal code text, kept verbatim.
    pub postal_code: String,
    /// Destination country.
    pub country: String,
}

impl ShippingAddress {
    /// Creates a shipping address value.
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        region: Option<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            region,
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }
}

/// One order line item.
///
/// Belongs to exactly one order, identified by `order_id`, and references the
/// product it sells as a resolved projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Back-reference to the owning order.
    pub order_id: OrderId,
    /// Product sold by this line item.
    pub product: Product,
    /// Price per unit at order time. Must be >= 0.
    pub unit_price: Decimal,
    /// Units sold. Must be >= 1.
    pub quantity: i64,
    /// Discount fraction applied to the line. Must be >= 0.
    pub discount: Decimal,
}

impl OrderDetail {
    /// Checks the line-item invariants enforced before insert.
    ///
    /// # Errors
    /// Returns the first violated invariant; callers treat any violation as
    /// fatal for the whole write operation.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.order_id < 1 {
            return Err(OrderValidationError::NonPositiveOrderId(self.order_id));
        }
        if self.product.id < 1 {
            return Err(OrderValidationError::NonPositiveProductId(self.product.id));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(OrderValidationError::NegativeUnitPrice);
        }
        if self.quantity < 1 {
            return Err(OrderValidationError::NonPositiveQuantity(self.quantity));
        }
        if self.discount < Decimal::ZERO {
            return Err(OrderValidationError::NegativeDiscount);
        }
        Ok(())
    }
}

/// Canonical order aggregate: the order row plus its resolved references and
/// the full set of line items.
///
/// Constructed by callers before `add`/`update`; read back fully hydrated by
/// the repository's get operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Caller-supplied stable order id (> 0).
    pub id: OrderId,
    /// Customer placing the order, resolved by customer code.
    pub customer: Customer,
    /// Employee handling the order.
    pub employee: Employee,
    /// Shipper carrying the order.
    pub shipper: Shipper,
    /// Date the order was placed.
    pub order_date: NaiveDate,
    /// Date the order is required by.
    pub required_date: NaiveDate,
    /// Date the order shipped.
    pub shipped_date: NaiveDate,
    /// Freight charge, decimal-exact.
    pub freight: Decimal,
    /// Name on the shipping label.
    pub ship_name: String,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
    /// Line items, in insertion order.
    pub order_details: Vec<OrderDetail>,
}

impl Order {
    /// Appends a line item for `product`, wiring the back-reference to this
    /// order's id.
    pub fn push_detail(&mut self, product: Product, unit_price: Decimal, quantity: i64, discount: Decimal) {
        self.order_details.push(OrderDetail {
            order_id: self.id,
            product,
            unit_price,
            quantity,
            discount,
        });
    }
}
