use log::*;

use crate::pipeline::{OrderStatusEvent, PipelineError, QueueProducer};

/// Puts order status events on the order status queue.
///
/// Unlike the engine APIs that call it, the publisher reports every failure to its caller.
#[derive(Clone, Debug)]
pub struct OrderStatusPublisher {
    producer: QueueProducer,
}

impl OrderStatusPublisher {
    pub fn new(producer: QueueProducer) -> Self {
        Self { producer }
    }

    /// Returns the id of the queued message.
    pub async fn publish(&self, event: &OrderStatusEvent) -> Result<String, PipelineError> {
        let body = serde_json::to_string(event).map_err(|e| PipelineError::SerializationError(e.to_string()))?;
        let message_id = self.producer.send(body).await?;
        trace!("📬️ Order {} [{}] queued as {message_id}", event.order_id, event.status);
        Ok(message_id)
    }
}
