//! Delivery Engine
//!
//! The delivery engine holds the core logic of a small food and grocery delivery backend: customers sign in with their
//! phone number and a one-time password, save delivery addresses, browse the catalog, place orders and cancel them.
//! Order status changes are announced on a queue and turned into customer notifications by a background consumer.
//!
//! The library is divided into three main sections:
//! 1. Data access ([`mod@db`]). Storage backends implement the traits in [`traits`]. SQLite is the supported backend.
//!    The data types used by the backends are defined in the `db_types` module and are public.
//! 2. The public API ([`mod@dlv_api`]). This is what servers should use. Every API is generic over the storage traits
//!    it needs, so that backends can be swapped or mocked.
//! 3. The order status pipeline ([`pipeline`]): the queue, the publisher the order API uses to announce status
//!    changes, and the consumer that dispatches notifications.
mod db;

pub mod db_types;
pub mod dlv_api;
pub mod pipeline;

pub mod traits {
    pub use crate::db::traits::*;
}

#[cfg(feature = "sqlite")]
pub use db::sqlite::{db::SqliteDatabase, TableNames};
pub use db::traits::StoreError;
pub use dlv_api::{
    address_api::AddressApi,
    auth_api::{AuthApi, OtpGenerator},
    catalog_api::CatalogApi,
    errors::{AddressApiError, AuthApiError, CatalogApiError, OrderFlowError},
    order_flow_api::OrderFlowApi,
    order_objects,
};
