use sqlx::SqliteConnection;

use crate::{
    db::traits::StoreError,
    db_types::{DeliveryAddress, UserId},
};

const ADDRESS_COLUMNS: &str = "id, user_id, name, address_line, latitude, longitude";

pub async fn insert_address(
    address: &DeliveryAddress,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<(), StoreError> {
    let q = format!("INSERT INTO {table} ({ADDRESS_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
    sqlx::query(&q)
        .bind(&address.id)
        .bind(&address.user_id)
        .bind(&address.name)
        .bind(&address.address_line)
        .bind(address.latitude)
        .bind(address.longitude)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_address(
    address_id: &str,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<DeliveryAddress>, StoreError> {
    let q = format!("SELECT {ADDRESS_COLUMNS} FROM {table} WHERE id = $1");
    let address = sqlx::query_as::<_, DeliveryAddress>(&q).bind(address_id).fetch_optional(conn).await?;
    Ok(address)
}

pub async fn fetch_addresses_for_user(
    user_id: &UserId,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<DeliveryAddress>, StoreError> {
    let q = format!("SELECT {ADDRESS_COLUMNS} FROM {table} WHERE user_id = $1 ORDER BY rowid");
    let addresses = sqlx::query_as::<_, DeliveryAddress>(&q).bind(user_id).fetch_all(conn).await?;
    Ok(addresses)
}
