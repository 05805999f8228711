#![allow(dead_code)]

use delivery_engine::{
    db_types::{Category, DeliveryAddress, NewDeliveryAddress, Product, User, UserId},
    traits::UserManagement,
    AddressApi,
    SqliteDatabase,
    TableNames,
};
use log::*;

pub const APPLES: &str = "prod-apples";
pub const BREAD: &str = "prod-bread";
pub const MILK: &str = "prod-milk";

/// A fresh in-memory database with the schema in place and a small catalog.
pub async fn prepare_test_db() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1, TableNames::default())
        .await
        .expect("Error creating in-memory database");
    db.create_schema().await.expect("Error creating schema");
    seed_catalog(&db).await;
    debug!("🚀️ Test database ready");
    db
}

pub async fn seed_catalog(db: &SqliteDatabase) {
    let category = Category { id: "cat-groceries".into(), name: "Groceries".into(), image_url: "groceries.png".into() };
    db.insert_category(&category).await.expect("Error inserting category");
    for (id, name, price) in [(APPLES, "Apples", 5.0), (BREAD, "Bread", 2.5), (MILK, "Milk", 1.25)] {
        let product = Product {
            id: id.into(),
            name: name.into(),
            description: format!("Fresh {name}"),
            price,
            image_url: format!("{id}.png"),
            category_id: category.id.clone(),
        };
        db.insert_product(&product).await.expect("Error inserting product");
    }
}

/// Stores a user directly, bypassing registration.
pub async fn new_customer(db: &SqliteDatabase, name: &str, phone: &str) -> User {
    let user =
        User { id: UserId::random(), name: name.into(), phone: phone.into(), otp: None, otp_expires_at: None };
    db.insert_user(&user).await.expect("Error inserting user");
    user
}

pub async fn new_address(db: &SqliteDatabase, user: &User) -> DeliveryAddress {
    AddressApi::new(db.clone())
        .create_address(&user.id, NewDeliveryAddress::new("Home", "1 Main Road"))
        .await
        .expect("Error creating address")
}
