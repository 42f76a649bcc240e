//! Database seeder for Tsena development and testing.
//!
//! Seeds a test area with an owner, an employee, a cash register, and a few
//! products so the ledgers have something to move. Denominations are seeded
//! by the initial migration.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use tsena_db::entities::{
    areas, cash_accounts, employees, products,
    sea_orm_active_enums::{CashAccountState, ProductState},
    users,
};
use tsena_shared::AppConfig;

/// Test area ID (consistent for all seeds)
const TEST_AREA_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test owner ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Test employee ID (consistent for all seeds)
const TEST_EMPLOYEE_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Test cash register ID (consistent for all seeds)
const TEST_REGISTER_ID: &str = "00000000-0000-0000-0000-000000000004";

#[tokio::main]
async fn main() {
    // AppConfig::load also pulls in a .env file when present.
    let config = AppConfig::load().ok();
    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or(config.map(|c| c.database.url))
        .expect("DATABASE_URL or TSENA__DATABASE__URL must be set");

    println!("Connecting to database...");
    let db = tsena_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test area...");
    seed_test_area(&db).await;

    println!("Seeding test user...");
    seed_test_user(&db).await;

    println!("Seeding test employee...");
    seed_test_employee(&db).await;

    println!("Seeding test cash register...");
    seed_test_register(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding complete!");
}

fn test_area_id() -> Uuid {
    Uuid::parse_str(TEST_AREA_ID).unwrap()
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

fn test_employee_id() -> Uuid {
    Uuid::parse_str(TEST_EMPLOYEE_ID).unwrap()
}

fn test_register_id() -> Uuid {
    Uuid::parse_str(TEST_REGISTER_ID).unwrap()
}

async fn seed_test_area(db: &DatabaseConnection) {
    if areas::Entity::find_by_id(test_area_id())
        .one(db)
        .await
        .expect("Failed to query areas")
        .is_some()
    {
        println!("  Test area already exists, skipping");
        return;
    }

    areas::ActiveModel {
        id: Set(test_area_id()),
        name: Set("Analakely Market Stand".to_string()),
        location: Set(Some("Antananarivo".to_string())),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("Failed to seed test area");
}

async fn seed_test_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(test_user_id())
        .one(db)
        .await
        .expect("Failed to query users")
        .is_some()
    {
        println!("  Test user already exists, skipping");
        return;
    }

    users::ActiveModel {
        id: Set(test_user_id()),
        display_name: Set("Owner".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("Failed to seed test user");
}

async fn seed_test_employee(db: &DatabaseConnection) {
    if employees::Entity::find_by_id(test_employee_id())
        .one(db)
        .await
        .expect("Failed to query employees")
        .is_some()
    {
        println!("  Test employee already exists, skipping");
        return;
    }

    employees::ActiveModel {
        id: Set(test_employee_id()),
        area_id: Set(test_area_id()),
        display_name: Set("Storekeeper".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("Failed to seed test employee");
}

async fn seed_test_register(db: &DatabaseConnection) {
    if cash_accounts::Entity::find_by_id(test_register_id())
        .one(db)
        .await
        .expect("Failed to query cash accounts")
        .is_some()
    {
        println!("  Test register already exists, skipping");
        return;
    }

    cash_accounts::ActiveModel {
        id: Set(test_register_id()),
        area_id: Set(test_area_id()),
        user_id: Set(test_user_id()),
        amount_init: Set(Decimal::ZERO),
        balancing_amount: Set(Decimal::ZERO),
        state: Set(CashAccountState::Open),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("Failed to seed test register");
}

async fn seed_products(db: &DatabaseConnection) {
    let samples = [
        ("RICE-25", "Rice 25kg", 95_000i64, 110_000i64),
        ("OIL-1L", "Sunflower oil 1L", 12_000, 15_000),
        ("SUGAR-1K", "Sugar 1kg", 3_800, 4_500),
        ("SOAP-B", "Laundry soap bar", 1_500, 2_200),
    ];

    for (reference, name, purchase_price, sale_price) in samples {
        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            area_id: Set(test_area_id()),
            reference: Set(reference.to_string()),
            name: Set(name.to_string()),
            purchase_price: Set(Decimal::from(purchase_price)),
            sale_price: Set(Decimal::from(sale_price)),
            old_stock: Set(Decimal::ZERO),
            actual_stock: Set(Decimal::ZERO),
            state: Set(ProductState::Validated),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .map(|product| println!("  Seeded product {}", product.reference))
        .ok();
    }
}
