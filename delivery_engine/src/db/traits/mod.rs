//! # Data access contracts
//!
//! This module defines the interface contracts that storage *backends* must satisfy for the delivery engine. The
//! engine APIs are generic over these traits, so any key-value style store that can honour them can be plugged in.
//!
//! * [`UserManagement`] stores customers and their one-time password state. Inserting a user is a conditional write
//!   that must fail with [`StoreError::ConditionFailed`] if the phone number is already taken.
//! * [`AddressManagement`] stores delivery addresses.
//! * [`CatalogManagement`] provides read access to the ads, categories and products.
//! * [`OrderManagement`] stores orders and their items and performs guarded status updates.
mod address_management;
mod catalog_management;
mod errors;
mod order_management;
mod user_management;

pub use address_management::AddressManagement;
pub use catalog_management::CatalogManagement;
pub use errors::StoreError;
pub use order_management::OrderManagement;
pub use user_management::UserManagement;
