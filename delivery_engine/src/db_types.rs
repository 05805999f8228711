use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

/// Generates a fresh random identifier. All entity ids in the store are v4 UUIDs in their hyphenated string form.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

//--------------------------------------        UserId         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn random() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------         User          ---------------------------------------------------------
/// A customer. The phone number is unique across all users.
///
/// The one-time password fields are never serialized, so a `User` can be handed straight back to API callers.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub otp: Option<String>,
    #[serde(skip_serializing, default)]
    pub otp_expires_at: Option<DateTime<Utc>>,
}

impl User {
    /// Removes any one-time password state from this copy of the user record.
    pub fn scrubbed(mut self) -> Self {
        self.otp = None;
        self.otp_expires_at = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
}

impl NewUser {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, phone: S2) -> Self {
        Self { name: name.into(), phone: phone.into() }
    }
}

//--------------------------------------    DeliveryAddress    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub id: String,
    pub user_id: UserId,
    pub name: String,
    pub address_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeliveryAddress {
    pub name: String,
    pub address_line: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl NewDeliveryAddress {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, address_line: S2) -> Self {
        Self { name: name.into(), address_line: address_line.into(), latitude: None, longitude: None }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

//--------------------------------------        Catalog        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    pub image_url: String,
    pub action: String,
    pub action_type: String,
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been placed and is waiting for the store to accept it.
    Pending,
    /// The store has accepted the order.
    Confirmed,
    /// A courier is on the way.
    Delivering,
    /// The order has reached the customer.
    Delivered,
    /// The customer cancelled the order before it was confirmed.
    Canceled,
}

impl OrderStatusType {
    /// Fulfilment statuses are driven by systems outside this service (the store, couriers) and arrive through the
    /// status queue rather than through customer requests.
    pub fn is_fulfilment(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Delivering | Self::Delivered)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Confirmed => write!(f, "confirmed"),
            OrderStatusType::Delivering => write!(f, "delivering"),
            OrderStatusType::Delivered => write!(f, "delivered"),
            OrderStatusType::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "delivering" => Ok(Self::Delivering),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn random() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
/// An order placed by a user.
///
/// `total` is the sum of `price * quantity` over the order's items, using the prices captured when the order was
/// created.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: f64,
    pub status: OrderStatusType,
    pub delivery_address_id: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       OrderItem       ---------------------------------------------------------
/// One line of an order. `name` and `price` are snapshots of the product at the time the order was placed.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: OrderId,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}
