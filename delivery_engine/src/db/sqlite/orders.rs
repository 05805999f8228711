use log::*;
use sqlx::SqliteConnection;

use crate::{
    db::traits::StoreError,
    db_types::{Order, OrderId, OrderItem, OrderStatusType, UserId},
};

const ORDER_COLUMNS: &str = "id, user_id, total, status, delivery_address_id, created_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, name, price, quantity";

/// Inserts a new order using the given connection. This is not atomic with respect to the order's items.
pub async fn insert_order(order: &Order, table: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let q = format!("INSERT INTO {table} ({ORDER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
    sqlx::query(&q)
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total)
        .bind(order.status)
        .bind(&order.delivery_address_id)
        .bind(order.created_at)
        .execute(conn)
        .await?;
    trace!("🗃️ Order {} inserted", order.id);
    Ok(())
}

pub async fn insert_order_item(item: &OrderItem, table: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let q = format!("INSERT INTO {table} ({ITEM_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
    sqlx::query(&q)
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_order(
    order_id: &OrderId,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, StoreError> {
    let q = format!("SELECT {ORDER_COLUMNS} FROM {table} WHERE id = $1");
    Ok(sqlx::query_as::<_, Order>(&q).bind(order_id).fetch_optional(conn).await?)
}

/// All orders for the user, oldest first.
pub async fn fetch_orders_for_user(
    user_id: &UserId,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, StoreError> {
    let q = format!("SELECT {ORDER_COLUMNS} FROM {table} WHERE user_id = $1 ORDER BY created_at, rowid");
    Ok(sqlx::query_as::<_, Order>(&q).bind(user_id).fetch_all(conn).await?)
}

pub async fn fetch_items_for_order(
    order_id: &OrderId,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, StoreError> {
    let q = format!("SELECT {ITEM_COLUMNS} FROM {table} WHERE order_id = $1 ORDER BY rowid");
    Ok(sqlx::query_as::<_, OrderItem>(&q).bind(order_id).fetch_all(conn).await?)
}

/// Updates the order status in a single statement. When `expected` is given, the status is only changed if it still
/// equals `expected`, so a concurrent change makes this return `None` rather than overwrite it.
pub async fn update_order_status(
    order_id: &OrderId,
    expected: Option<OrderStatusType>,
    new_status: OrderStatusType,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, StoreError> {
    let q = match expected {
        Some(_) => format!("UPDATE {table} SET status = $1 WHERE id = $2 AND status = $3 RETURNING {ORDER_COLUMNS}"),
        None => format!("UPDATE {table} SET status = $1 WHERE id = $2 RETURNING {ORDER_COLUMNS}"),
    };
    let mut query = sqlx::query_as::<_, Order>(&q).bind(new_status).bind(order_id);
    if let Some(expected) = expected {
        query = query.bind(expected);
    }
    let order = query.fetch_optional(conn).await?;
    match &order {
        Some(_) => debug!("🗃️ Order {order_id} status set to {new_status}"),
        None => debug!("🗃️ Order {order_id} status was not updated to {new_status}. Guard: {expected:?}"),
    }
    Ok(order)
}

pub async fn delete_items_for_order(
    order_id: &OrderId,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<u64, StoreError> {
    let q = format!("DELETE FROM {table} WHERE order_id = $1");
    let result = sqlx::query(&q).bind(order_id).execute(conn).await?;
    Ok(result.rows_affected())
}
