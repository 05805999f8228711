use log::*;
use sqlx::SqliteConnection;

use super::TableNames;
use crate::db::traits::StoreError;

/// Creates any tables (and the phone index) that do not exist yet. Safe to call on every start-up.
pub async fn create_tables(tables: &TableNames, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let TableNames { users, delivery_addresses, products, categories, ads, orders, order_items } = tables;
    let statements = [
        format!(
            "CREATE TABLE IF NOT EXISTS {users} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                otp TEXT,
                otp_expires_at TEXT
            )"
        ),
        // Phone uniqueness is enforced here, which is what makes registration a conditional write
        format!("CREATE UNIQUE INDEX IF NOT EXISTS {users}_phone_idx ON {users} (phone)"),
        format!(
            "CREATE TABLE IF NOT EXISTS {delivery_addresses} (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                address_line TEXT NOT NULL,
                latitude REAL,
                longitude REAL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {categories} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                image_url TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {products} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                image_url TEXT NOT NULL,
                category_id TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {ads} (
                id TEXT PRIMARY KEY NOT NULL,
                image_url TEXT NOT NULL,
                action TEXT NOT NULL,
                action_type TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {orders} (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL,
                total REAL NOT NULL,
                status TEXT NOT NULL,
                delivery_address_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {order_items} (
                id TEXT PRIMARY KEY NOT NULL,
                order_id TEXT NOT NULL,
                product_id TEXT NOT NULL,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                quantity INTEGER NOT NULL
            )"
        ),
    ];
    for statement in &statements {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    debug!("🗃️ Schema is up to date");
    Ok(())
}
