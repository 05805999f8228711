use thiserror::Error;

use crate::{
    db::traits::StoreError,
    db_types::{OrderId, OrderStatusType},
};

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Phone number is already registered")]
    PhoneAlreadyRegistered,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid OTP")]
    InvalidOtp,
    #[error("OTP has expired")]
    OtpExpired,
}

impl From<StoreError> for AuthApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ConditionFailed(_) => Self::PhoneAlreadyRegistered,
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Delivery address {0} does not exist")]
    AddressNotFound(String),
    #[error("Delivery address {0} belongs to another user")]
    AddressNotOwned(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(String),
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),
    #[error("Order {0} belongs to another user")]
    NotOrderOwner(OrderId),
    #[error("Cannot change order status from {from} to {to}. Only pending orders can be canceled")]
    InvalidTransition { from: OrderStatusType, to: OrderStatusType },
}

impl From<StoreError> for OrderFlowError {
    fn from(e: StoreError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AddressApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    ValidationError(String),
}

impl From<StoreError> for AddressApiError {
    fn from(e: StoreError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for CatalogApiError {
    fn from(e: StoreError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
