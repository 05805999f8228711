//! # Delivery engine public API
//!
//! The `dlv_api` module exposes the programmatic API for the delivery engine. The API is modular, so that clients can
//! pick and choose the functionality they want.
//!
//! * [`auth_api`] handles registration and one-time password issue and verification.
//! * [`order_flow_api`] is the primary API for placing, reading and cancelling orders, and for recording fulfilment
//!   statuses that arrive from outside.
//! * [`address_api`] manages users' delivery addresses.
//! * [`catalog_api`] provides read access to the catalog.
//!
//! # API usage
//!
//! Every API is created by supplying a storage backend that implements the traits the API needs:
//!
//! ```rust,ignore
//! use delivery_engine::{OrderFlowApi, SqliteDatabase, TableNames};
//! let db = SqliteDatabase::new_with_url("sqlite://data/delivery.db", 5, TableNames::default()).await?;
//! let api = OrderFlowApi::new(db);
//! let orders = api.orders_for_user(&user_id).await?;
//! ```
pub mod address_api;
pub mod auth_api;
pub mod catalog_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
