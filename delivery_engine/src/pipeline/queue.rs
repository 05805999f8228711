//! A small in-process message queue.
//!
//! Producers and the receiver share a bounded tokio channel. The receiver only keeps a weak handle to the channel (for
//! redelivering failed messages), so once every [`QueueProducer`] has been dropped and the queue has drained,
//! [`QueueReceiver::receive_batch`] returns `None` and consumers shut down on their own.
use log::*;
use tokio::sync::{mpsc, mpsc::error::TrySendError};

use crate::{db_types::new_id, pipeline::QueueError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    pub body: String,
    /// The number of times this message has been handed to a consumer, including the current delivery.
    pub receive_count: u32,
}

pub struct MessageQueue {
    name: String,
    listener: mpsc::Receiver<QueueMessage>,
    sender: mpsc::Sender<QueueMessage>,
}

impl MessageQueue {
    pub fn new<S: Into<String>>(name: S, buffer_size: usize) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        Self { name: name.into(), listener: receiver, sender }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn producer(&self) -> QueueProducer {
        QueueProducer { queue: self.name.clone(), sender: self.sender.clone() }
    }

    /// Converts the queue into its receiving end. Producers created before (and cloned after) this call keep working.
    pub fn into_receiver(self) -> QueueReceiver {
        debug!("📬️ Queue {} is ready to be consumed", self.name);
        // Only a weak handle is kept, so the queue closes when the last producer goes away
        let redelivery = self.sender.downgrade();
        QueueReceiver { queue: self.name, listener: self.listener, redelivery }
    }
}

#[derive(Clone, Debug)]
pub struct QueueProducer {
    queue: String,
    sender: mpsc::Sender<QueueMessage>,
}

impl QueueProducer {
    /// Queues a message body, waiting for capacity if the queue is full. Returns the new message's id.
    pub async fn send(&self, body: String) -> Result<String, QueueError> {
        let message_id = new_id();
        let message = QueueMessage { message_id: message_id.clone(), body, receive_count: 0 };
        self.sender.send(message).await.map_err(|_| QueueError::Closed(self.queue.clone()))?;
        Ok(message_id)
    }
}

pub struct QueueReceiver {
    queue: String,
    listener: mpsc::Receiver<QueueMessage>,
    redelivery: mpsc::WeakSender<QueueMessage>,
}

impl QueueReceiver {
    pub fn name(&self) -> &str {
        &self.queue
    }

    /// Waits for at least one message and returns it along with any others that are immediately available, up to
    /// `max_messages` in total. Returns `None` once the queue is closed and empty.
    pub async fn receive_batch(&mut self, max_messages: usize) -> Option<Vec<QueueMessage>> {
        let mut batch = Vec::with_capacity(max_messages.max(1));
        let first = self.listener.recv().await?;
        batch.push(first);
        while batch.len() < max_messages {
            match self.listener.try_recv() {
                Ok(message) => batch.push(message),
                Err(_) => break,
            }
        }
        for message in &mut batch {
            message.receive_count += 1;
        }
        trace!("📬️ {} messages received from {}", batch.len(), self.queue);
        Some(batch)
    }

    /// Puts a message back on the queue so that it is delivered again.
    pub fn redeliver(&self, message: QueueMessage) -> Result<(), QueueError> {
        let sender = self.redelivery.upgrade().ok_or_else(|| QueueError::Closed(self.queue.clone()))?;
        sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full(self.queue.clone()),
            TrySendError::Closed(_) => QueueError::Closed(self.queue.clone()),
        })
    }
}
