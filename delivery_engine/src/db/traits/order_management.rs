use crate::{
    db::traits::StoreError,
    db_types::{Order, OrderId, OrderItem, OrderStatusType, UserId},
};

/// The `OrderManagement` trait defines the behaviour for storing and querying orders and their items.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError>;

    async fn insert_order_item(&self, item: &OrderItem) -> Result<(), StoreError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;

    async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, StoreError>;

    async fn fetch_items_for_order(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, StoreError>;

    /// Sets the status of an order.
    ///
    /// If `expected` is provided, the update only happens if the order's current status is still `expected` at the
    /// time of the write. Returns the updated order, or `None` if no order matched (it does not exist, or its status
    /// changed in the meantime).
    async fn update_order_status(
        &self,
        order_id: &OrderId,
        expected: Option<OrderStatusType>,
        new_status: OrderStatusType,
    ) -> Result<Option<Order>, StoreError>;

    /// Removes all the items for the given order. Returns the number of items deleted.
    async fn delete_items_for_order(&self, order_id: &OrderId) -> Result<u64, StoreError>;
}
