use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db::traits::{AddressManagement, CatalogManagement, OrderManagement},
    db_types::{new_id, Order, OrderId, OrderItem, OrderStatusType, UserId},
    dlv_api::{
        errors::OrderFlowError,
        order_objects::{NewOrderRequest, OrderResult},
    },
    pipeline::{OrderStatusEvent, OrderStatusPublisher},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: placing orders, reading them back, customer
/// cancellation, and recording fulfilment statuses reported by the store or couriers.
///
/// If a publisher is attached, every status change made through this API is announced on the order status queue.
/// Publishing is best-effort: a failure is logged and never fails the operation that caused it.
pub struct OrderFlowApi<B> {
    db: B,
    publisher: Option<OrderStatusPublisher>,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db, publisher: None }
    }

    pub fn with_publisher(mut self, publisher: OrderStatusPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    async fn announce(&self, order: &Order) {
        let Some(publisher) = &self.publisher else {
            trace!("🔄️ No status publisher configured. Order {} status change is not announced", order.id);
            return;
        };
        let event = OrderStatusEvent::new(order.id.clone(), order.status, order.user_id.clone());
        match publisher.publish(&event).await {
            Ok(message_id) => {
                debug!("🔄️ Order {} status [{}] announced in message {message_id}", order.id, order.status)
            },
            Err(e) => warn!("🔄️ Could not announce order {} status [{}]. {e}", order.id, order.status),
        }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Fetches an order and its items. Only the owner of the order may read it.
    pub async fn order_details(&self, user_id: &UserId, order_id: &OrderId) -> Result<OrderResult, OrderFlowError> {
        let order = self.owned_order(user_id, order_id).await?;
        let items = self.db.fetch_items_for_order(order_id).await?;
        Ok(OrderResult { order, items })
    }

    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        trace!("🔄️ {} orders found for user {user_id}", orders.len());
        Ok(orders)
    }

    /// Cancels an order on behalf of its owner.
    ///
    /// Only `pending` orders can be canceled. Anything else, including an order that is already canceled, fails with
    /// [`OrderFlowError::InvalidTransition`].
    pub async fn cancel_order(&self, user_id: &UserId, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        let order = self.owned_order(user_id, order_id).await?;
        let to = OrderStatusType::Canceled;
        if order.status != OrderStatusType::Pending {
            debug!("🔄️❌️ Order {order_id} cannot be canceled. It is {}", order.status);
            return Err(OrderFlowError::InvalidTransition { from: order.status, to });
        }
        let updated = self.db.update_order_status(order_id, Some(OrderStatusType::Pending), to).await?;
        let updated = match updated {
            Some(o) => o,
            None => {
                // The status changed between the read and the guarded write
                let current = self.db.fetch_order(order_id).await?.ok_or_else(|| {
                    OrderFlowError::OrderNotFound(order_id.clone())
                })?;
                warn!("🔄️❌️ Order {order_id} changed to {} while it was being canceled", current.status);
                return Err(OrderFlowError::InvalidTransition { from: current.status, to });
            },
        };
        info!("🔄️❌️ Order {order_id} canceled by user {user_id}");
        self.announce(&updated).await;
        Ok(updated)
    }

    /// Records a fulfilment status (`confirmed`, `delivering` or `delivered`) reported by the store or a courier.
    ///
    /// These progressions are trusted and are not checked against the current status. `pending` and `canceled` can
    /// only be reached through [`Self::create_order`] and [`Self::cancel_order`] respectively.
    pub async fn apply_external_status(
        &self,
        order_id: &OrderId,
        status: OrderStatusType,
    ) -> Result<Order, OrderFlowError> {
        if !status.is_fulfilment() {
            let current =
                self.db.fetch_order(order_id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
            return Err(OrderFlowError::InvalidTransition { from: current.status, to: status });
        }
        let order = self
            .db
            .update_order_status(order_id, None, status)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        info!("🔄️🚚️ Order {order_id} is now {status}");
        Ok(order)
    }

    /// Removes the items of an order. The order itself is left untouched.
    pub async fn delete_order_items(&self, order_id: &OrderId) -> Result<u64, OrderFlowError> {
        let count = self.db.delete_items_for_order(order_id).await?;
        debug!("🔄️ {count} items deleted for order {order_id}");
        Ok(count)
    }

    async fn owned_order(&self, user_id: &UserId, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        let order =
            self.db.fetch_order(order_id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        if &order.user_id != user_id {
            warn!("🔄️ User {user_id} tried to access order {order_id}, which belongs to {}", order.user_id);
            return Err(OrderFlowError::NotOrderOwner(order_id.clone()));
        }
        Ok(order)
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement + AddressManagement + CatalogManagement
{
    /// Places a new order for `user_id`.
    ///
    /// Every line is priced from the catalog at the time of the call, and those prices are stored with the items, so
    /// that `order.total` is the sum of `price * quantity` over the stored items. The order is written first and the
    /// items after it. If an item write fails, the order is left in place with the items written so far and the error
    /// is returned.
    pub async fn create_order(
        &self,
        user_id: &UserId,
        request: NewOrderRequest,
    ) -> Result<OrderResult, OrderFlowError> {
        validate_request(&request)?;
        let address = self
            .db
            .fetch_address(&request.delivery_address_id)
            .await?
            .ok_or_else(|| OrderFlowError::AddressNotFound(request.delivery_address_id.clone()))?;
        if &address.user_id != user_id {
            warn!(
                "🔄️📦️ User {user_id} tried to order to address {}, which belongs to {}",
                address.id, address.user_id
            );
            return Err(OrderFlowError::AddressNotOwned(address.id));
        }
        let order_id = OrderId::random();
        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = self
                .db
                .fetch_product(&line.product_id)
                .await?
                .ok_or_else(|| OrderFlowError::ProductNotFound(line.product_id.clone()))?;
            items.push(OrderItem {
                id: new_id(),
                order_id: order_id.clone(),
                product_id: product.id,
                name: product.name,
                price: product.price,
                quantity: line.quantity,
            });
        }
        let total = items.iter().map(OrderItem::line_total).sum::<f64>();
        let order = Order {
            id: order_id,
            user_id: user_id.clone(),
            total,
            status: OrderStatusType::Pending,
            delivery_address_id: address.id,
            created_at: Utc::now(),
        };
        self.db.insert_order(&order).await?;
        for item in &items {
            self.db.insert_order_item(item).await.map_err(|e| {
                error!(
                    "🔄️📦️ Order {} was stored, but item {} could not be. The order is incomplete. {e}",
                    order.id, item.product_id
                );
                OrderFlowError::from(e)
            })?;
        }
        info!(
            "🔄️📦️ Order {} created for user {user_id}. {} items, total {:.2}",
            order.id,
            items.len(),
            order.total
        );
        self.announce(&order).await;
        Ok(OrderResult { order, items })
    }
}

fn validate_request(request: &NewOrderRequest) -> Result<(), OrderFlowError> {
    if request.delivery_address_id.trim().is_empty() {
        return Err(OrderFlowError::ValidationError("A delivery address is required".into()));
    }
    if request.items.is_empty() {
        return Err(OrderFlowError::ValidationError("An order must contain at least one item".into()));
    }
    if let Some(line) = request.items.iter().find(|line| line.quantity < 1) {
        return Err(OrderFlowError::ValidationError(format!(
            "Quantity for product {} must be at least 1",
            line.product_id
        )));
    }
    Ok(())
}
