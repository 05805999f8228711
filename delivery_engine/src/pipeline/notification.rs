use std::{collections::BTreeMap, fmt::Debug};

use log::*;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::{
    db::traits::{OrderManagement, UserManagement},
    db_types::{Order, OrderId, OrderStatusType, User, UserId},
    pipeline::{NotificationError, OrderStatusEvent},
};

/// The JSON payload that subscribers receive as the notification message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub order_id: OrderId,
    pub status: OrderStatusType,
    pub message: String,
    pub customer_id: UserId,
}

/// A message for a pub-sub topic. `attributes` carry `OrderId` and `Status`, so subscribers can filter on them
/// without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub topic: String,
    pub subject: String,
    pub message: String,
    pub attributes: BTreeMap<String, String>,
}

impl NotificationRequest {
    pub fn for_order(topic: &str, order: &Order, user: &User) -> Result<Self, NotificationError> {
        let payload = OrderNotification {
            order_id: order.id.clone(),
            status: order.status,
            message: format!("Your order #{} has been updated to {}", order.id, order.status),
            customer_id: user.id.clone(),
        };
        let message =
            serde_json::to_string(&payload).map_err(|e| NotificationError::SerializationError(e.to_string()))?;
        let attributes = BTreeMap::from([
            ("OrderId".to_string(), order.id.to_string()),
            ("Status".to_string(), order.status.to_string()),
        ]);
        let subject = format!("Order Status Update: {}", order.status);
        Ok(Self { topic: topic.to_string(), subject, message, attributes })
    }
}

/// A pub-sub channel that notifications can be published to.
#[allow(async_fn_in_trait)]
pub trait NotificationChannel {
    async fn publish(&self, request: &NotificationRequest) -> Result<(), NotificationError>;
}

//--------------------------------------   BroadcastChannel    ---------------------------------------------------------
/// In-process fan-out. Every subscriber gets a copy of every notification published after it subscribed.
#[derive(Clone, Debug)]
pub struct BroadcastChannel {
    sender: broadcast::Sender<NotificationRequest>,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationRequest> {
        self.sender.subscribe()
    }
}

impl NotificationChannel for BroadcastChannel {
    async fn publish(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        match self.sender.send(request.clone()) {
            Ok(n) => debug!("📣️ [{}] {} delivered to {n} subscribers", request.topic, request.subject),
            // Publishing to a topic with no subscribers is not an error
            Err(_) => debug!("📣️ [{}] {} published, but there are no subscribers", request.topic, request.subject),
        }
        Ok(())
    }
}

//--------------------------------------    WebhookChannel     ---------------------------------------------------------
/// Delivers each notification as a JSON `POST` to a fixed URL.
#[derive(Clone, Debug)]
pub struct WebhookChannel {
    client: reqwest::Client,
    url: String,
}

impl WebhookChannel {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { client: reqwest::Client::new(), url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NotificationChannel for WebhookChannel {
    async fn publish(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| NotificationError::DeliveryError(format!("POST to {} failed. {e}", self.url)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::DeliveryError(format!("{} responded with {status}", self.url)));
        }
        debug!("📣️ [{}] {} delivered to {}", request.topic, request.subject, self.url);
        Ok(())
    }
}

//--------------------------------------   ConfiguredChannel   ---------------------------------------------------------
/// The channel selected by configuration.
#[derive(Clone, Debug)]
pub enum ConfiguredChannel {
    Broadcast(BroadcastChannel),
    Webhook(WebhookChannel),
}

impl NotificationChannel for ConfiguredChannel {
    async fn publish(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        match self {
            Self::Broadcast(channel) => channel.publish(request).await,
            Self::Webhook(channel) => channel.publish(request).await,
        }
    }
}

//--------------------------------------  NotificationDispatcher  -----------------------------------------------------
/// Turns order status events into customer notifications.
pub struct NotificationDispatcher<B, C> {
    db: B,
    channel: C,
    topic: String,
}

impl<B, C> Debug for NotificationDispatcher<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationDispatcher ({})", self.topic)
    }
}

impl<B, C> NotificationDispatcher<B, C> {
    pub fn new<S: Into<String>>(db: B, channel: C, topic: S) -> Self {
        Self { db, channel, topic: topic.into() }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }
}

impl<B, C> NotificationDispatcher<B, C>
where
    B: OrderManagement + UserManagement,
    C: NotificationChannel,
{
    /// Notifies the customer about the order in `event`.
    ///
    /// The order and user are read from the store rather than taken from the event, so the notification describes the
    /// order as it is now. If either cannot be found, nothing is published and an error is returned.
    pub async fn notify(&self, event: &OrderStatusEvent) -> Result<NotificationRequest, NotificationError> {
        let order = self
            .db
            .fetch_order(&event.order_id)
            .await?
            .ok_or_else(|| NotificationError::OrderNotFound(event.order_id.to_string()))?;
        let user = self
            .db
            .fetch_user_by_id(&event.user_id)
            .await?
            .ok_or_else(|| NotificationError::UserNotFound(event.user_id.to_string()))?;
        if order.status != event.status {
            debug!(
                "📣️ Order {} is {} but the event said {}. Notifying with the current status",
                order.id, order.status, event.status
            );
        }
        let request = NotificationRequest::for_order(&self.topic, &order, &user)?;
        self.channel.publish(&request).await?;
        info!("📣️ Customer {} notified that order {} is {}", user.id, order.id, order.status);
        Ok(request)
    }
}
