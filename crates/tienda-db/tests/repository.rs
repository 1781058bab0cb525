//! Repository integration tests against an in-memory database.
//!
//! These exercise the SQL-level guarantees the service layer leans on:
//! the guarded stock debit, the one-open-till-per-user unique index,
//! state-guarded till closes and the history projections.

use chrono::Utc;
use tienda_core::{Product, Sale, SaleLine, PaymentMethod, Till, TillState};
use tienda_db::{new_id, Database, DbConfig, DbError, ProductRepository, SaleRepository, TillRepository};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn product(name: &str, price_cents: i64, stock: i64, minimum: i64) -> Product {
    let now = Utc::now();
    Product {
        id: new_id(),
        name: name.to_string(),
        price_cents,
        stock,
        stock_minimum: minimum,
        supplier_id: None,
        barcode: None,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

fn open_till(user_id: &str, opening_cents: i64) -> Till {
    Till {
        id: new_id(),
        user_id: user_id.to_string(),
        opened_at: Utc::now(),
        closed_at: None,
        opening_cents,
        closing_cents: None,
        state: TillState::Open,
    }
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn insert_and_fetch_product() {
    let db = test_db().await;
    let p = product("Café Molido 250g", 520, 18, 5);
    db.products().insert(&p).await.unwrap();

    let fetched = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Café Molido 250g");
    assert_eq!(fetched.price_cents, 520);
    assert_eq!(fetched.stock, 18);
    assert!(fetched.active);
}

#[tokio::test]
async fn guarded_debit_succeeds_when_stock_suffices() {
    let db = test_db().await;
    let p = product("Arroz 1kg", 210, 10, 2);
    db.products().insert(&p).await.unwrap();

    let mut tx = db.begin().await.unwrap();
    let debited = ProductRepository::debit_stock(&mut tx, &p.id, 4).await.unwrap();
    assert!(debited);
    tx.commit().await.unwrap();

    let fetched = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(fetched.stock, 6);
}

#[tokio::test]
async fn guarded_debit_refuses_to_go_negative() {
    let db = test_db().await;
    let p = product("Atún en Lata", 190, 3, 1);
    db.products().insert(&p).await.unwrap();

    let mut tx = db.begin().await.unwrap();
    let debited = ProductRepository::debit_stock(&mut tx, &p.id, 4).await.unwrap();
    assert!(!debited);
    tx.rollback().await.unwrap();

    let fetched = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(fetched.stock, 3);
}

#[tokio::test]
async fn guarded_debit_ignores_inactive_products() {
    let db = test_db().await;
    let p = product("Descontinuado", 100, 50, 5);
    db.products().insert(&p).await.unwrap();
    db.products().soft_delete(&p.id).await.unwrap();

    let mut tx = db.begin().await.unwrap();
    let debited = ProductRepository::debit_stock(&mut tx, &p.id, 1).await.unwrap();
    assert!(!debited);
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn fetch_active_filters_soft_deleted() {
    let db = test_db().await;
    let p = product("Jabón de Baño", 110, 40, 10);
    db.products().insert(&p).await.unwrap();
    db.products().soft_delete(&p.id).await.unwrap();

    let mut tx = db.begin().await.unwrap();
    let fetched = ProductRepository::fetch_active(&mut tx, &p.id).await.unwrap();
    assert!(fetched.is_none());
    tx.rollback().await.unwrap();

    // Plain get_by_id still sees it; history needs the row.
    assert!(db.products().get_by_id(&p.id).await.unwrap().is_some());
}

#[tokio::test]
async fn add_stock_is_relative() {
    let db = test_db().await;
    let p = product("Azúcar 1kg", 175, 45, 10);
    db.products().insert(&p).await.unwrap();

    let refreshed = db.products().add_stock(&p.id, 15).await.unwrap();
    assert_eq!(refreshed.stock, 60);

    let fetched = db.products().get_by_id(&p.id).await.unwrap().unwrap();
    assert_eq!(fetched.stock, 60);
}

#[tokio::test]
async fn add_stock_to_missing_product_is_not_found() {
    let db = test_db().await;
    let err = db.products().add_stock("nope", 5).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn low_stock_is_at_or_below_minimum_and_active_only() {
    let db = test_db().await;
    let at_minimum = product("Pan Blanco", 95, 10, 10);
    let below = product("Leche Entera 1L", 180, 2, 8);
    let healthy = product("Agua Mineral 1L", 120, 60, 12);
    let deleted = product("Viejo", 50, 0, 5);

    for p in [&at_minimum, &below, &healthy, &deleted] {
        db.products().insert(p).await.unwrap();
    }
    db.products().soft_delete(&deleted.id).await.unwrap();

    let low = db.products().find_low_stock().await.unwrap();
    let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Leche Entera 1L", "Pan Blanco"]);
}

// =============================================================================
// Tills
// =============================================================================

#[tokio::test]
async fn unique_index_rejects_second_open_till_for_same_user() {
    let db = test_db().await;

    let mut tx = db.begin().await.unwrap();
    TillRepository::insert(&mut tx, &open_till("user-1", 10000)).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = db.begin().await.unwrap();
    let err = TillRepository::insert(&mut tx, &open_till("user-1", 5000))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
    tx.rollback().await.unwrap();

    // A different user is unaffected.
    let mut tx = db.begin().await.unwrap();
    TillRepository::insert(&mut tx, &open_till("user-2", 5000)).await.unwrap();
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn close_is_guarded_by_open_state() {
    let db = test_db().await;
    let till = open_till("user-1", 10000);

    let mut tx = db.begin().await.unwrap();
    TillRepository::insert(&mut tx, &till).await.unwrap();
    tx.commit().await.unwrap();

    db.tills().close(&till.id, Utc::now(), 10750).await.unwrap();

    let closed = db.tills().list_all().await.unwrap();
    assert_eq!(closed[0].state, TillState::Closed);
    assert_eq!(closed[0].closing_cents, Some(10750));
    assert!(closed[0].closed_at.is_some());

    // Second close matches zero rows.
    let err = db.tills().close(&till.id, Utc::now(), 9999).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn closed_till_frees_the_user_for_a_new_one() {
    let db = test_db().await;
    let first = open_till("user-1", 10000);

    let mut tx = db.begin().await.unwrap();
    TillRepository::insert(&mut tx, &first).await.unwrap();
    tx.commit().await.unwrap();

    db.tills().close(&first.id, Utc::now(), 10000).await.unwrap();

    let mut tx = db.begin().await.unwrap();
    TillRepository::insert(&mut tx, &open_till("user-1", 8000)).await.unwrap();
    tx.commit().await.unwrap();

    let open = db.tills().find_open_for_user("user-1").await.unwrap().unwrap();
    assert_eq!(open.opening_cents, 8000);
}

// =============================================================================
// Sales ledger
// =============================================================================

#[tokio::test]
async fn ledger_round_trip_with_name_resolution() {
    let db = test_db().await;
    let p = product("Coca-Cola 600ml", 250, 48, 12);
    db.products().insert(&p).await.unwrap();

    let till = open_till("user-1", 10000);
    let mut tx = db.begin().await.unwrap();
    TillRepository::insert(&mut tx, &till).await.unwrap();
    tx.commit().await.unwrap();

    db.lookups().upsert_user("user-1", "cajero1").await.unwrap();
    db.lookups().upsert_client("client-1", "María López").await.unwrap();

    let sale = Sale {
        id: new_id(),
        till_id: till.id.clone(),
        user_id: "user-1".to_string(),
        client_id: Some("client-1".to_string()),
        total_cents: 500,
        payment_method: PaymentMethod::Cash,
        tendered_cents: 500,
        change_cents: 0,
        reference: None,
        created_at: Utc::now(),
    };
    let line = SaleLine {
        id: new_id(),
        sale_id: sale.id.clone(),
        product_id: p.id.clone(),
        quantity: 2,
        unit_price_cents: 250,
        subtotal_cents: 500,
    };

    let mut tx = db.begin().await.unwrap();
    SaleRepository::insert_sale(&mut tx, &sale).await.unwrap();
    SaleRepository::insert_line(&mut tx, &line).await.unwrap();
    tx.commit().await.unwrap();

    let fetched = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
    assert_eq!(fetched.total_cents, 500);
    assert_eq!(fetched.payment_method, PaymentMethod::Cash);

    let lines = db.sales().get_lines(&sale.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_name, "Coca-Cola 600ml");
    assert_eq!(lines[0].subtotal_cents, 500);

    let summaries = db.sales().list_summaries().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].client_name, "María López");
    assert_eq!(summaries[0].cashier, "cajero1");
}

#[tokio::test]
async fn summaries_fall_back_to_walk_in() {
    let db = test_db().await;
    let till = open_till("user-9", 0);

    let mut tx = db.begin().await.unwrap();
    TillRepository::insert(&mut tx, &till).await.unwrap();
    tx.commit().await.unwrap();

    let sale = Sale {
        id: new_id(),
        till_id: till.id.clone(),
        user_id: "user-9".to_string(),
        client_id: None,
        total_cents: 120,
        payment_method: PaymentMethod::Card,
        tendered_cents: 120,
        change_cents: 0,
        reference: Some("AUTH-77".to_string()),
        created_at: Utc::now(),
    };

    let mut tx = db.begin().await.unwrap();
    SaleRepository::insert_sale(&mut tx, &sale).await.unwrap();
    tx.commit().await.unwrap();

    let summaries = db.sales().list_summaries().await.unwrap();
    assert_eq!(summaries[0].client_name, "walk-in");
    // No row in users for user-9: the raw id keeps the sale attributable.
    assert_eq!(summaries[0].cashier, "user-9");
}
