//! Order repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD + list access to order aggregates over a relational store.
//! - Resolve customer/employee/shipper/product references during hydration.
//!
//! # Invariants
//! - Every public method opens exactly one call-scoped connection through the
//!   injected factory and releases it on every exit path.
//! - No statement sequence runs inside a transaction; a mid-sequence failure
//!   leaves whatever the completed statements produced.
//! - Line-item invariants are checked before the first write statement.
//!
//! # See also
//! - docs/architecture/data-access.md

use crate::db::{ConnectionFactory, DbError};
use crate::model::order::{Order, OrderDetail, OrderId, OrderValidationError, ShippingAddress};
use crate::model::refs::{Customer, Employee, Product, Shipper};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Date pattern accepted when reading order rows (`M/d/yyyy`, one or two
/// digits per numeric field).
const READ_DATE_FORMAT: &str = "%m/%d/%Y";
/// Date pattern written by the insert path; matches the store's native
/// unpadded `M/d/yyyy` text so freshly written rows parse like seeded ones.
const INSERT_DATE_FORMAT: &str = "%-m/%-d/%Y";
/// Date pattern written by the update path (`MM/dd/yyyy`, zero-padded).
const UPDATE_DATE_FORMAT: &str = "%m/%d/%Y";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for order persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// A line item violated a write invariant; nothing was written.
    Validation(OrderValidationError),
    /// Driver or store failure, including missing rows behind an
    /// unconditional reference lookup.
    Db(DbError),
    /// No order row matches the requested id.
    NotFound(OrderId),
    /// Persisted state could not be interpreted (date or decimal text).
    InvalidData(String),
    /// A paging argument was out of bounds; raised before any I/O.
    OutOfRange(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "order not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted order data: {message}"),
            Self::OutOfRange(name) => write!(f, "invalid {name}: out of range"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::OutOfRange(_) => None,
        }
    }
}

impl From<OrderValidationError> for RepoError {
    fn from(value: OrderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for order aggregate persistence.
pub trait OrderRepository {
    /// Persists a new order aggregate.
    ///
    /// When a row with the same order id already exists, returns that id and
    /// writes nothing (idempotent-on-conflict, not an upsert). For a fresh
    /// insert the returned value is the rows-affected count of the order
    /// insert, not a generated key; callers carry identity in `order.id`.
    fn add_order(&self, order: &Order) -> RepoResult<OrderId>;
    /// Loads one fully hydrated order aggregate by id.
    fn get_order(&self, order_id: OrderId) -> RepoResult<Order>;
    /// Loads a page of fully hydrated orders in natural row order.
    fn get_orders(&self, skip: i32, count: i32) -> RepoResult<Vec<Order>>;
    /// Replaces an order's line items and business columns.
    fn update_order(&self, order: &Order) -> RepoResult<()>;
    /// Deletes an order's line items, then the order row.
    fn remove_order(&self, order_id: OrderId) -> RepoResult<()>;
}

/// SQLite-backed order repository.
///
/// Holds a connection factory and connection string for its whole lifetime;
/// both are injected once at construction and never validated up front. Open
/// failures surface from the first call that touches the store.
pub struct SqliteOrderRepository<F: ConnectionFactory> {
    factory: F,
    connection_string: String,
}

impl<F: ConnectionFactory> SqliteOrderRepository<F> {
    /// Creates a repository over the given factory and connection string.
    pub fn new(factory: F, connection_string: impl Into<String>) -> Self {
        Self {
            factory,
            connection_string: connection_string.into(),
        }
    }

    fn open(&self) -> RepoResult<Connection> {
        Ok(self.factory.create_connection(&self.connection_string)?)
    }
}

impl<F: ConnectionFactory> OrderRepository for SqliteOrderRepository<F> {
    fn add_order(&self, order: &Order) -> RepoResult<OrderId> {
        for detail in &order.order_details {
            detail.validate()?;
        }

        let conn = self.open()?;

        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM Orders WHERE OrderID = ?1;",
            [order.id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(order.id);
        }

        // The insert path stores a quote-doubled address and a literal `NULL`
        // region marker; the read path reverses neither.
        let address = order.shipping_address.address.replace('\'', "''");
        let region = order
            .shipping_address
            .region
            .clone()
            .unwrap_or_else(|| "NULL".to_string());
        let freight = order.freight.to_string().replace(',', ".");

        let changed = conn.execute(
            "INSERT INTO Orders VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                order.id,
                order.customer.code,
                order.employee.id,
                format_date(order.order_date, INSERT_DATE_FORMAT),
                format_date(order.required_date, INSERT_DATE_FORMAT),
                format_date(order.shipped_date, INSERT_DATE_FORMAT),
                order.shipper.id,
                freight,
                order.ship_name,
                address,
                order.shipping_address.city,
                region,
                order.shipping_address.postal_code,
                order.shipping_address.country,
            ],
        )?;

        for detail in &order.order_details {
            insert_detail(&conn, detail)?;
        }

        Ok(changed as OrderId)
    }

    fn get_order(&self, order_id: OrderId) -> RepoResult<Order> {
        let conn = self.open()?;
        load_order(&conn, order_id)
    }

    fn get_orders(&self, skip: i32, count: i32) -> RepoResult<Vec<Order>> {
        check_page_range(skip, count)?;

        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT * FROM Orders LIMIT ?1 OFFSET ?2;")?;
        let mut rows = stmt.query(params![count, skip])?;
        let mut orders = Vec::new();
        while let Some(row) = rows.next()? {
            let order_id: OrderId = row.get("OrderID")?;
            orders.push(load_order(&conn, order_id)?);
        }

        Ok(orders)
    }

    fn update_order(&self, order: &Order) -> RepoResult<()> {
        let conn = self.open()?;

        // Full-replace semantics for line items: drop everything, re-insert
        // the aggregate's set, then rewrite the order row.
        conn.execute("DELETE FROM OrderDetails WHERE OrderID = ?1;", [order.id])?;
        for detail in &order.order_details {
            insert_detail(&conn, detail)?;
        }

        conn.execute(
            "UPDATE Orders SET
                OrderID = ?1,
                CustomerID = ?2,
                EmployeeID = ?3,
                OrderDate = ?4,
                RequiredDate = ?5,
                ShippedDate = ?6,
                ShipVia = ?7,
                Freight = ?8,
                ShipName = ?9,
                ShipAddress = ?10,
                ShipCity = ?11,
                ShipRegion = ?12,
                ShipPostalCode = ?13,
                ShipCountry = ?14
             WHERE OrderID = ?1;",
            params![
                order.id,
                order.customer.code,
                order.employee.id,
                format_date(order.order_date, UPDATE_DATE_FORMAT),
                format_date(order.required_date, UPDATE_DATE_FORMAT),
                format_date(order.shipped_date, UPDATE_DATE_FORMAT),
                order.shipper.id,
                order.freight.to_string(),
                order.ship_name,
                order.shipping_address.address,
                order.shipping_address.city,
                order.shipping_address.region,
                order.shipping_address.postal_code,
                order.shipping_address.country,
            ],
        )?;

        Ok(())
    }

    fn remove_order(&self, order_id: OrderId) -> RepoResult<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM OrderDetails WHERE OrderID = ?1;", [order_id])?;
        conn.execute("DELETE FROM Orders WHERE OrderID = ?1;", [order_id])?;
        Ok(())
    }
}

fn check_page_range(skip: i32, count: i32) -> RepoResult<()> {
    if count <= 0 {
        return Err(RepoError::OutOfRange("count"));
    }
    if skip < 0 {
        return Err(RepoError::OutOfRange("skip"));
    }
    Ok(())
}

fn insert_detail(conn: &Connection, detail: &OrderDetail) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO OrderDetails VALUES(?1, ?2, ?3, ?4, ?5);",
        params![
            detail.order_id,
            detail.product.id,
            detail.unit_price.to_string(),
            detail.quantity,
            detail.discount.to_string(),
        ],
    )?;
    Ok(())
}

/// Loads and fully hydrates one order on the caller's connection.
fn load_order(conn: &Connection, order_id: OrderId) -> RepoResult<Order> {
    let mut stmt = conn.prepare("SELECT * FROM Orders WHERE OrderID = ?1;")?;
    let mut rows = stmt.query([order_id])?;
    let row = match rows.next()? {
        Some(row) => row,
        None => return Err(RepoError::NotFound(order_id)),
    };

    let id: OrderId = row.get("OrderID")?;
    let customer_code: String = row.get("CustomerID")?;
    let employee_id: i64 = row.get("EmployeeID")?;
    let order_date = parse_store_date(&row.get::<_, String>("OrderDate")?, "Orders.OrderDate")?;
    let required_date = parse_store_date(
        &row.get::<_, String>("RequiredDate")?,
        "Orders.RequiredDate",
    )?;
    let shipped_date =
        parse_store_date(&row.get::<_, String>("ShippedDate")?, "Orders.ShippedDate")?;
    let shipper_id: i64 = row.get("ShipVia")?;
    let freight = decimal_from_column(row.get::<_, f64>("Freight")?, "Orders.Freight")?;
    let ship_name: String = row.get("ShipName")?;
    let address: String = row.get("ShipAddress")?;
    let city: String = row.get("ShipCity")?;
    // Both SQL NULL and empty text mean "no region" on the read path.
    let region = match row.get::<_, Option<String>>("ShipRegion")? {
        Some(value) if value.is_empty() => None,
        other => other,
    };
    let postal_code: String = row.get("ShipPostalCode")?;
    let country: String = row.get("ShipCountry")?;

    Ok(Order {
        id,
        customer: load_customer(conn, &customer_code)?,
        employee: load_employee(conn, employee_id)?,
        shipper: load_shipper(conn, shipper_id)?,
        order_date,
        required_date,
        shipped_date,
        freight,
        ship_name,
        shipping_address: ShippingAddress {
            address,
            city,
            region,
            postal_code,
            country,
        },
        order_details: load_order_details(conn, id)?,
    })
}

fn load_order_details(conn: &Connection, order_id: OrderId) -> RepoResult<Vec<OrderDetail>> {
    let mut stmt = conn.prepare("SELECT * FROM OrderDetails WHERE OrderID = ?1;")?;
    let mut rows = stmt.query([order_id])?;
    let mut details = Vec::new();
    while let Some(row) = rows.next()? {
        let product_id: i64 = row.get("ProductID")?;
        let unit_price =
            decimal_from_column(row.get::<_, f64>("UnitPrice")?, "OrderDetails.UnitPrice")?;
        let quantity: i64 = row.get("Quantity")?;
        let discount =
            decimal_from_column(row.get::<_, f64>("Discount")?, "OrderDetails.Discount")?;
        details.push(OrderDetail {
            order_id,
            product: load_product(conn, product_id)?,
            unit_price,
            quantity,
            discount,
        });
    }

    Ok(details)
}

// Reference lookups read their single row unconditionally: a dangling key
// surfaces as the driver's no-rows error wrapped in `RepoError::Db`, never as
// a silently defaulted projection.

fn load_customer(conn: &Connection, code: &str) -> RepoResult<Customer> {
    let company_name: String = conn.query_row(
        "SELECT * FROM Customers WHERE CustomerID = ?1;",
        [code],
        |row| row.get("CompanyName"),
    )?;
    Ok(Customer::new(code, company_name))
}

fn load_employee(conn: &Connection, employee_id: i64) -> RepoResult<Employee> {
    let (last_name, first_name, country) = conn.query_row(
        "SELECT * FROM Employees WHERE EmployeeID = ?1;",
        [employee_id],
        |row| {
            Ok((
                row.get::<_, String>("LastName")?,
                row.get::<_, String>("FirstName")?,
                row.get::<_, String>("Country")?,
            ))
        },
    )?;
    Ok(Employee {
        id: employee_id,
        last_name,
        first_name,
        country,
    })
}

fn load_shipper(conn: &Connection, shipper_id: i64) -> RepoResult<Shipper> {
    let company_name: String = conn.query_row(
        "SELECT * FROM Shippers WHERE ShipperID = ?1;",
        [shipper_id],
        |row| row.get("CompanyName"),
    )?;
    Ok(Shipper {
        id: shipper_id,
        company_name,
    })
}

fn load_product(conn: &Connection, product_id: i64) -> RepoResult<Product> {
    let (product_name, supplier_id, category_id) = conn.query_row(
        "SELECT * FROM Products WHERE ProductID = ?1;",
        [product_id],
        |row| {
            Ok((
                row.get::<_, String>("ProductName")?,
                row.get::<_, i64>("SupplierID")?,
                row.get::<_, i64>("CategoryID")?,
            ))
        },
    )?;

    let category: String = conn.query_row(
        "SELECT * FROM Categories WHERE CategoryID = ?1;",
        [category_id],
        |row| row.get("CategoryName"),
    )?;
    let supplier: String = conn.query_row(
        "SELECT * FROM Suppliers WHERE SupplierID = ?1;",
        [supplier_id],
        |row| row.get("CompanyName"),
    )?;

    Ok(Product {
        id: product_id,
        product_name,
        supplier_id,
        category_id,
        category,
        supplier,
    })
}

fn parse_store_date(text: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(text, READ_DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{text}` in {column}")))
}

fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(pattern).to_string()
}

fn decimal_from_column(value: f64, column: &str) -> RepoResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid decimal value `{value}` in {column}")))
}
