use std::{fmt::Debug, time::Duration};

use log::*;

use crate::{
    db::traits::{OrderManagement, UserManagement},
    dlv_api::order_flow_api::OrderFlowApi,
    pipeline::{
        NotificationChannel,
        NotificationDispatcher,
        OrderStatusEvent,
        PipelineError,
        QueueMessage,
        QueueReceiver,
    },
};

const DEFAULT_REDELIVERY_DELAY: Duration = Duration::from_millis(500);

/// The outcome of processing one batch of messages.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Ids of messages that were handled completely. These are acknowledged.
    pub processed: Vec<String>,
    /// Ids of malformed messages. These are acknowledged too, since retrying cannot fix them.
    pub dropped: Vec<String>,
    /// Messages whose processing failed. They are not acknowledged.
    pub failed: Vec<QueueMessage>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.dropped.len() + self.failed.len()
    }
}

/// Drains the order status queue and notifies customers.
pub struct OrderStatusConsumer<B, C> {
    orders: OrderFlowApi<B>,
    dispatcher: NotificationDispatcher<B, C>,
    max_receive_count: u32,
    redelivery_delay: Duration,
}

impl<B, C> Debug for OrderStatusConsumer<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderStatusConsumer (max receives: {})", self.max_receive_count)
    }
}

impl<B: Clone, C> OrderStatusConsumer<B, C> {
    pub fn new<S: Into<String>>(db: B, channel: C, topic: S, max_receive_count: u32) -> Self {
        Self {
            orders: OrderFlowApi::new(db.clone()),
            dispatcher: NotificationDispatcher::new(db, channel, topic),
            max_receive_count: max_receive_count.max(1),
            redelivery_delay: DEFAULT_REDELIVERY_DELAY,
        }
    }

    /// How long to wait before putting failed messages back on the queue.
    pub fn with_redelivery_delay(mut self, delay: Duration) -> Self {
        self.redelivery_delay = delay;
        self
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher<B, C> {
        &self.dispatcher
    }
}

impl<B, C> OrderStatusConsumer<B, C>
where
    B: OrderManagement + UserManagement,
    C: NotificationChannel,
{
    /// Processes every message in the batch, one at a time. A failure in one message never affects the others.
    pub async fn process_batch(&self, batch: Vec<QueueMessage>) -> BatchReport {
        let mut report = BatchReport::default();
        for message in batch {
            match self.process_message(&message).await {
                Ok(()) => report.processed.push(message.message_id),
                Err(PipelineError::PoisonMessage(e)) => {
                    warn!("📬️ Dropping malformed message {}. {e}. Body: {}", message.message_id, message.body);
                    report.dropped.push(message.message_id);
                },
                Err(e) => {
                    warn!(
                        "📬️ Message {} failed on delivery attempt {}. {e}",
                        message.message_id, message.receive_count
                    );
                    report.failed.push(message);
                },
            }
        }
        debug!(
            "📬️ Batch of {} messages done. {} processed, {} dropped, {} failed",
            report.total(),
            report.processed.len(),
            report.dropped.len(),
            report.failed.len()
        );
        report
    }

    async fn process_message(&self, message: &QueueMessage) -> Result<(), PipelineError> {
        let event = serde_json::from_str::<OrderStatusEvent>(&message.body)
            .map_err(|e| PipelineError::PoisonMessage(e.to_string()))?;
        trace!("📬️ Message {} is for order {} [{}]", message.message_id, event.order_id, event.status);
        if event.status.is_fulfilment() {
            self.orders
                .apply_external_status(&event.order_id, event.status)
                .await
                .map_err(|e| PipelineError::StatusUpdateError(e.to_string()))?;
        }
        self.dispatcher.notify(&event).await?;
        Ok(())
    }

    /// Consumes the queue until it closes. Failed messages are redelivered until they have been received
    /// `max_receive_count` times, after which they are dead-lettered (logged and discarded).
    pub async fn run(&self, mut receiver: QueueReceiver, batch_size: usize) {
        info!("📬️ Order status consumer started on queue {}", receiver.name());
        while let Some(batch) = receiver.receive_batch(batch_size).await {
            let report = self.process_batch(batch).await;
            if report.failed.is_empty() {
                continue;
            }
            tokio::time::sleep(self.redelivery_delay).await;
            for message in report.failed {
                if message.receive_count >= self.max_receive_count {
                    error!(
                        "📬️☠️ Message {} failed {} times and is dead-lettered. Body: {}",
                        message.message_id, message.receive_count, message.body
                    );
                    continue;
                }
                let id = message.message_id.clone();
                if let Err(e) = receiver.redeliver(message) {
                    error!("📬️ Could not redeliver message {id}. It is lost. {e}");
                }
            }
        }
        info!("📬️ Queue {} closed. Order status consumer has shut down", receiver.name());
    }
}
