use delivery_engine::{
    pipeline::{NotificationChannel, NotificationRequest, OrderStatusConsumer, QueueReceiver},
    traits::{OrderManagement, UserManagement},
};
use log::*;
use tokio::{sync::broadcast, task::JoinHandle};

/// Starts the order status worker. It runs until the queue closes, which happens once every publisher is dropped.
///
/// The worker runs on the current thread's local task set, since the storage futures are not `Send`.
pub fn start_status_worker<B, C>(
    consumer: OrderStatusConsumer<B, C>,
    receiver: QueueReceiver,
    batch_size: usize,
) -> JoinHandle<()>
where
    B: OrderManagement + UserManagement + 'static,
    C: NotificationChannel + 'static,
{
    actix_web::rt::spawn(async move {
        info!("📬️ Order status worker started. Batch size: {batch_size}");
        consumer.run(receiver, batch_size).await;
        info!("📬️ Order status worker stopped");
    })
}

/// Logs every notification published on the in-process channel.
pub fn start_notification_logger(mut subscriber: broadcast::Receiver<NotificationRequest>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match subscriber.recv().await {
                Ok(n) => info!("📣️ [{}] {}. {}", n.topic, n.subject, n.message),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!("📣️ Notification logger fell behind. {count} notifications were not logged");
                },
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("📣️ Notification channel closed");
    })
}
