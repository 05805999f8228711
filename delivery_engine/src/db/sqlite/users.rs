use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqliteConnection;

use crate::{
    db::traits::StoreError,
    db_types::{User, UserId},
};

const USER_COLUMNS: &str = "id, name, phone, otp, otp_expires_at";

/// Inserts a new user. The unique phone index turns a duplicate phone into [`StoreError::ConditionFailed`].
pub async fn insert_user(user: &User, table: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let q = format!("INSERT INTO {table} ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5)");
    sqlx::query(&q)
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.otp)
        .bind(user.otp_expires_at)
        .execute(conn)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::ConditionFailed(_) => {
                StoreError::ConditionFailed(format!("A user with phone {} already exists", user.phone))
            },
            e => e,
        })?;
    trace!("🗃️ User {} inserted", user.id);
    Ok(())
}

pub async fn fetch_user_by_id(
    user_id: &UserId,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, StoreError> {
    let q = format!("SELECT {USER_COLUMNS} FROM {table} WHERE id = $1");
    let user = sqlx::query_as::<_, User>(&q).bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_user_by_phone(
    phone: &str,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, StoreError> {
    let q = format!("SELECT {USER_COLUMNS} FROM {table} WHERE phone = $1");
    let user = sqlx::query_as::<_, User>(&q).bind(phone).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn update_otp(
    user_id: &UserId,
    otp: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<(), StoreError> {
    let q = format!("UPDATE {table} SET otp = $1, otp_expires_at = $2 WHERE id = $3");
    let result = sqlx::query(&q).bind(otp).bind(expires_at).bind(user_id).execute(conn).await?;
    if result.rows_affected() == 0 {
        warn!("🗃️ Tried to update the OTP for user {user_id}, but the user does not exist");
    }
    Ok(())
}

/// Clears the OTP fields if the stored code is still `otp`. Returns whether a row was changed.
pub async fn consume_otp(
    user_id: &UserId,
    otp: &str,
    table: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, StoreError> {
    let q = format!("UPDATE {table} SET otp = NULL, otp_expires_at = NULL WHERE id = $1 AND otp = $2");
    let result = sqlx::query(&q).bind(user_id).bind(otp).execute(conn).await?;
    let consumed = result.rows_affected() == 1;
    if !consumed {
        debug!("🗃️ OTP for user {user_id} was not consumed. It has changed or was already used");
    }
    Ok(consumed)
}
