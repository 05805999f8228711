//! # Order status pipeline
//!
//! Order status changes are propagated to customers asynchronously:
//!
//! 1. The [`OrderStatusPublisher`] serializes an [`OrderStatusEvent`] onto the order status queue.
//! 2. An [`OrderStatusConsumer`], running in its own task, drains the queue in batches. Each message is handled in
//!    isolation. Malformed messages are dropped. For well-formed ones, the consumer records any fulfilment status the
//!    message carries and then asks the [`NotificationDispatcher`] to notify the customer.
//! 3. The dispatcher re-reads the order and user, composes the notification and publishes it on a
//!    [`NotificationChannel`].
//!
//! The queue is at-least-once: a message whose processing fails is redelivered until it reaches the configured
//! maximum receive count, and is then dead-lettered. Handlers must tolerate seeing the same message twice.
mod consumer;
mod errors;
mod event_types;
mod notification;
mod publisher;
mod queue;

pub use consumer::{BatchReport, OrderStatusConsumer};
pub use errors::{NotificationError, PipelineError, QueueError};
pub use event_types::OrderStatusEvent;
pub use notification::{
    BroadcastChannel,
    ConfiguredChannel,
    NotificationChannel,
    NotificationDispatcher,
    NotificationRequest,
    OrderNotification,
    WebhookChannel,
};
pub use publisher::OrderStatusPublisher;
pub use queue::{MessageQueue, QueueMessage, QueueProducer, QueueReceiver};
