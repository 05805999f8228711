//! SQLite storage backend.
//!
//! Every entity lives in its own table, and the table names come from configuration (see [`TableNames`]). Since the
//! names are only known at runtime, queries are assembled with `format!` and executed with the unchecked sqlx query
//! functions. Table names are validated before any query is built.
pub mod db;

pub mod addresses;
pub mod catalog;
pub mod orders;
pub mod schema;
pub mod users;

mod tables;

use std::{str::FromStr, time::Duration};

use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
pub use tables::TableNames;

use crate::db::traits::StoreError;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if url.contains(":memory:") {
        // An in-memory database only lives as long as its connection
        debug!("🗃️ {url} is an in-memory database. Pinning the pool's connections.");
        pool_options =
            pool_options.min_connections(1).idle_timeout(None::<Duration>).max_lifetime(None::<Duration>);
    }
    let pool = pool_options.connect_with(options).await?;
    info!("🗃️ Connected to {url}");
    Ok(pool)
}
