//! Catalog queries. The catalog is owned by another system, so apart from the insert helpers used to stock a
//! database, these are plain table scans.
use sqlx::SqliteConnection;

use crate::{
    db::traits::StoreError,
    db_types::{Ad, Category, Product},
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, image_url, category_id";

pub async fn fetch_ads(table: &str, conn: &mut SqliteConnection) -> Result<Vec<Ad>, StoreError> {
    let q = format!("SELECT id, image_url, action, action_type FROM {table} ORDER BY rowid");
    Ok(sqlx::query_as::<_, Ad>(&q).fetch_all(conn).await?)
}

pub async fn fetch_categories(table: &str, conn: &mut SqliteConnection) -> Result<Vec<Category>, StoreError> {
    let q = format!("SELECT id, name, image_url FROM {table} ORDER BY rowid");
    Ok(sqlx::query_as::<_, Category>(&q).fetch_all(conn).await?)
}

pub async fn fetch_products_in_category(
    category_id: &str,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, StoreError> {
    let q = format!("SELECT {PRODUCT_COLUMNS} FROM {table} WHERE category_id = $1 ORDER BY rowid");
    Ok(sqlx::query_as::<_, Product>(&q).bind(category_id).fetch_all(conn).await?)
}

pub async fn fetch_product(
    product_id: &str,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, StoreError> {
    let q = format!("SELECT {PRODUCT_COLUMNS} FROM {table} WHERE id = $1");
    Ok(sqlx::query_as::<_, Product>(&q).bind(product_id).fetch_optional(conn).await?)
}

pub async fn insert_product(product: &Product, table: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let q = format!("INSERT INTO {table} ({PRODUCT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
    sqlx::query(&q)
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(&product.category_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_category(category: &Category, table: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let q = format!("INSERT INTO {table} (id, name, image_url) VALUES ($1, $2, $3)");
    sqlx::query(&q).bind(&category.id).bind(&category.name).bind(&category.image_url).execute(conn).await?;
    Ok(())
}

pub async fn insert_ad(ad: &Ad, table: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let q = format!("INSERT INTO {table} (id, image_url, action, action_type) VALUES ($1, $2, $3, $4)");
    sqlx::query(&q).bind(&ad.id).bind(&ad.image_url).bind(&ad.action).bind(&ad.action_type).execute(conn).await?;
    Ok(())
}
