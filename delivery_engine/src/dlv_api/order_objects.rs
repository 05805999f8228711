use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderItem};

/// One line of a new order, as submitted by the customer. Prices are never taken from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
}

impl OrderLine {
    pub fn new<S: Into<String>>(product_id: S, quantity: i64) -> Self {
        Self { product_id: product_id.into(), quantity }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub delivery_address_id: String,
    pub items: Vec<OrderLine>,
}

impl NewOrderRequest {
    pub fn new<S: Into<String>>(delivery_address_id: S) -> Self {
        Self { delivery_address_id: delivery_address_id.into(), items: Vec::new() }
    }

    pub fn with_item<S: Into<String>>(mut self, product_id: S, quantity: i64) -> Self {
        self.items.push(OrderLine::new(product_id, quantity));
        self
    }
}

/// An order together with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub order: Order,
    pub items: Vec<OrderItem>,
}
