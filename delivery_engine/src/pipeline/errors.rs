use thiserror::Error;

use crate::db::traits::StoreError;

#[derive(Debug, Clone, Error)]
pub enum QueueError {
    #[error("Queue {0} is closed")]
    Closed(String),
    #[error("Queue {0} is full")]
    Full(String),
}

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} not found")]
    OrderNotFound(String),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Could not serialize notification. {0}")]
    SerializationError(String),
    #[error("Could not deliver notification. {0}")]
    DeliveryError(String),
}

impl From<StoreError> for NotificationError {
    fn from(e: StoreError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("Could not serialize order status event. {0}")]
    SerializationError(String),
    #[error("Malformed message. {0}")]
    PoisonMessage(String),
    #[error("Could not record order status. {0}")]
    StatusUpdateError(String),
    #[error(transparent)]
    QueueError(#[from] QueueError),
    #[error(transparent)]
    NotificationError(#[from] NotificationError),
}
