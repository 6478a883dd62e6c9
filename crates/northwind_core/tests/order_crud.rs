use chrono::NaiveDate;
use northwind_core::db::open_db;
use northwind_core::{
    Customer, Employee, Order, OrderRepository, OrderService, Product, RepoError, Shipper,
    ShippingAddress, SqliteConnectionFactory, SqliteOrderRepository,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::TempDir;

#[test]
fn add_then_get_round_trips_the_aggregate() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    let order = sample_order(1);
    let affected = repo.add_order(&order).unwrap();
    assert_eq!(affected, 1, "fresh insert reports one affected order row");

    let loaded = repo.get_order(1).unwrap();
    assert_eq!(loaded.id, 1);
    assert_eq!(loaded.customer.code, "ALFKI");
    assert_eq!(loaded.customer.company_name, "Alfreds Futterkiste");
    assert_eq!(loaded.employee.id, 1);
    assert_eq!(loaded.employee.last_name, "Davolio");
    assert_eq!(loaded.employee.first_name, "Nancy");
    assert_eq!(loaded.employee.country, "USA");
    assert_eq!(loaded.shipper.id, 1);
    assert_eq!(loaded.shipper.company_name, "Speedy Express");
    assert_eq!(loaded.order_date, date(1996, 7, 4));
    assert_eq!(loaded.required_date, date(1996, 8, 1));
    assert_eq!(loaded.shipped_date, date(1996, 7, 16));
    assert_eq!(loaded.freight, dec("32.38"));
    assert_eq!(loaded.ship_name, "Vins et alcools Chevalier");
    assert_eq!(loaded.shipping_address.address, "59 rue de l Abbaye");
    assert_eq!(loaded.shipping_address.city, "Reims");
    assert_eq!(loaded.shipping_address.region.as_deref(), Some("CJ"));
    assert_eq!(loaded.shipping_address.postal_code, "51100");
    assert_eq!(loaded.shipping_address.country, "France");

    assert_eq!(loaded.order_details.len(), 1);
    let detail = &loaded.order_details[0];
    assert_eq!(detail.order_id, 1);
    assert_eq!(detail.product.id, 5);
    assert_eq!(detail.product.product_name, "Gumbo Mix");
    assert_eq!(detail.product.category, "Condiments");
    assert_eq!(detail.product.supplier, "New Orleans Cajun Delights");
    assert_eq!(detail.unit_price, dec("10.0"));
    assert_eq!(detail.quantity, 2);
    assert_eq!(detail.discount, Decimal::ZERO);
}

#[test]
fn add_with_existing_id_returns_that_id_and_writes_nothing() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    let order = sample_order(2);
    repo.add_order(&order).unwrap();

    let mut replay = sample_order(2);
    replay.ship_name = "Someone Else".to_string();
    replay.push_detail(Product::with_id(1), dec("4.5"), 3, Decimal::ZERO);

    let returned = repo.add_order(&replay).unwrap();
    assert_eq!(returned, 2, "duplicate add returns the existing id");

    assert_eq!(detail_count(&store, 2), 1, "no new detail rows were written");
    let loaded = repo.get_order(2).unwrap();
    assert_eq!(loaded.ship_name, "Vins et alcools Chevalier");
}

#[test]
fn invalid_detail_fails_validation_and_writes_nothing() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    let mut order = sample_order(3);
    order.push_detail(Product::with_id(1), dec("4.5"), 0, Decimal::ZERO);

    let err = repo.add_order(&order).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(matches!(repo.get_order(3), Err(RepoError::NotFound(3))));
    assert_eq!(detail_count(&store, 3), 0);
}

#[test]
fn update_replaces_details_and_business_columns() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    repo.add_order(&sample_order(4)).unwrap();

    let mut updated = sample_order(4);
    updated.customer = Customer::new("BONAP", "");
    updated.employee.id = 2;
    updated.shipper.id = 2;
    updated.freight = dec("45.5");
    updated.ship_name = "Bon app jour fixe".to_string();
    updated.shipping_address =
        ShippingAddress::new("12 rue des Bouchers", "Marseille", None, "13008", "France");
    updated.order_details.clear();
    updated.push_detail(Product::with_id(1), dec("18"), 7, dec("0.15"));

    repo.update_order(&updated).unwrap();

    let loaded = repo.get_order(4).unwrap();
    assert_eq!(loaded.customer.code, "BONAP");
    assert_eq!(loaded.customer.company_name, "Bon app'");
    assert_eq!(loaded.employee.last_name, "Fuller");
    assert_eq!(loaded.shipper.company_name, "United Package");
    assert_eq!(loaded.freight, dec("45.5"));
    assert_eq!(loaded.ship_name, "Bon app jour fixe");
    assert_eq!(loaded.shipping_address.city, "Marseille");
    assert_eq!(loaded.shipping_address.region, None);
    assert_eq!(loaded.order_date, date(1996, 7, 4));

    assert_eq!(loaded.order_details.len(), 1, "old detail set is gone");
    let detail = &loaded.order_details[0];
    assert_eq!(detail.product.id, 1);
    assert_eq!(detail.product.product_name, "Chai");
    assert_eq!(detail.unit_price, dec("18"));
    assert_eq!(detail.quantity, 7);
    assert_eq!(detail.discount, dec("0.15"));
}

#[test]
fn remove_then_get_reports_not_found() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    repo.add_order(&sample_order(5)).unwrap();
    repo.remove_order(5).unwrap();

    assert!(matches!(repo.get_order(5), Err(RepoError::NotFound(5))));
    assert_eq!(detail_count(&store, 5), 0);
}

#[test]
fn dangling_product_reference_surfaces_as_db_error() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    // No foreign-key constraints in the store: the write succeeds and the
    // broken reference only surfaces when hydration looks it up.
    let mut order = sample_order(6);
    order.order_details.clear();
    order.push_detail(Product::with_id(999), dec("1"), 1, Decimal::ZERO);
    repo.add_order(&order).unwrap();

    let err = repo.get_order(6).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn add_doubles_quotes_in_the_address_and_reads_them_back_doubled() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    let mut order = sample_order(9);
    order.shipping_address.address = "2732 Baker's Blvd.".to_string();
    repo.add_order(&order).unwrap();

    let loaded = repo.get_order(9).unwrap();
    assert_eq!(loaded.shipping_address.address, "2732 Baker''s Blvd.");
}

#[test]
fn absent_region_is_stored_as_null_marker_text_on_add() {
    let (_dir, store) = seeded_store();
    let repo = repository(&store);

    let mut order = sample_order(7);
    order.shipping_address.region = None;
    repo.add_order(&order).unwrap();

    let loaded = repo.get_order(7).unwrap();
    assert_eq!(loaded.shipping_address.region.as_deref(), Some("NULL"));
}

#[test]
fn service_wraps_repository_calls() {
    let (_dir, store) = seeded_store();
    let service = OrderService::new(repository(&store));

    service.add_order(&sample_order(8)).unwrap();
    let fetched = service.get_order(8).unwrap();
    assert_eq!(fetched.ship_name, "Vins et alcools Chevalier");

    service.remove_order(8).unwrap();
    assert!(matches!(service.get_order(8), Err(RepoError::NotFound(8))));
}

fn seeded_store() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("northwind.db");
    let conn = open_db(&path).unwrap();
    conn.execute_batch(
        "INSERT INTO Customers VALUES('ALFKI', 'Alfreds Futterkiste');
         INSERT INTO Customers VALUES('BONAP', 'Bon app''');
         INSERT INTO Employees VALUES(1, 'Davolio', 'Nancy', 'USA');
         INSERT INTO Employees VALUES(2, 'Fuller', 'Andrew', 'UK');
         INSERT INTO Shippers VALUES(1, 'Speedy Express');
         INSERT INTO Shippers VALUES(2, 'United Package');
         INSERT INTO Categories VALUES(1, 'Beverages');
         INSERT INTO Categories VALUES(2, 'Condiments');
         INSERT INTO Suppliers VALUES(1, 'Exotic Liquids');
         INSERT INTO Suppliers VALUES(2, 'New Orleans Cajun Delights');
         INSERT INTO Products VALUES(1, 'Chai', 1, 1);
         INSERT INTO Products VALUES(5, 'Gumbo Mix', 2, 2);",
    )
    .unwrap();

    let store = path.to_str().unwrap().to_string();
    (dir, store)
}

fn repository(store: &str) -> SqliteOrderRepository<SqliteConnectionFactory> {
    SqliteOrderRepository::new(SqliteConnectionFactory, store)
}

fn sample_order(id: i64) -> Order {
    let mut order = Order {
        id,
        customer: Customer::new("ALFKI", ""),
        employee: Employee {
            id: 1,
            last_name: String::new(),
            first_name: String::new(),
            country: String::new(),
        },
        shipper: Shipper {
            id: 1,
            company_name: String::new(),
        },
        order_date: date(1996, 7, 4),
        required_date: date(1996, 8, 1),
        shipped_date: date(1996, 7, 16),
        freight: dec("32.38"),
        ship_name: "Vins et alcools Chevalier".to_string(),
        shipping_address: ShippingAddress::new(
            "59 rue de l Abbaye",
            "Reims",
            Some("CJ".to_string()),
            "51100",
            "France",
        ),
        order_details: Vec::new(),
    };
    order.push_detail(Product::with_id(5), dec("10.0"), 2, Decimal::ZERO);
    order
}

fn detail_count(store: &str, order_id: i64) -> i64 {
    let conn = Connection::open(store).unwrap();
    conn.query_row(
        "SELECT COUNT(*) FROM OrderDetails WHERE OrderID = ?1;",
        [order_id],
        |row| row.get(0),
    )
    .unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn dec(text: &str) -> Decimal {
    text.parse().unwrap()
}
