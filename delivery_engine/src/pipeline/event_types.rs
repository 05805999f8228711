use serde::{Deserialize, Serialize};

use crate::db_types::{OrderId, OrderStatusType, UserId};

/// The body of an order status queue message: `{"orderId": "...", "status": "...", "userId": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusEvent {
    pub order_id: OrderId,
    pub status: OrderStatusType,
    pub user_id: UserId,
}

impl OrderStatusEvent {
    pub fn new(order_id: OrderId, status: OrderStatusType, user_id: UserId) -> Self {
        Self { order_id, status, user_id }
    }
}
