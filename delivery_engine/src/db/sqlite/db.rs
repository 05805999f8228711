use std::{fmt::Debug, sync::Arc};

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::{addresses, catalog, new_pool, orders, schema, users, TableNames};
use crate::{
    db::traits::{AddressManagement, CatalogManagement, OrderManagement, StoreError, UserManagement},
    db_types::{Ad, Category, DeliveryAddress, Order, OrderId, OrderItem, OrderStatusType, Product, User, UserId},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
    tables: Arc<TableNames>,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`, creating the database file if necessary. The tables themselves are created
    /// by [`Self::create_schema`].
    pub async fn new_with_url(url: &str, max_connections: u32, tables: TableNames) -> Result<Self, StoreError> {
        tables.validate()?;
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool, tables: Arc::new(tables) })
    }

    pub async fn create_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        schema::create_tables(&self.tables, &mut conn).await
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Connection pool for {} closed", self.url);
    }

    pub async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_product(product, &self.tables.products, &mut conn).await
    }

    pub async fn insert_category(&self, category: &Category) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_category(category, &self.tables.categories, &mut conn).await
    }

    pub async fn insert_ad(&self, ad: &Ad) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_ad(ad, &self.tables.ads, &mut conn).await
    }
}

impl UserManagement for SqliteDatabase {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &self.tables.users, &mut conn).await
    }

    async fn fetch_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_id(user_id, &self.tables.users, &mut conn).await
    }

    async fn fetch_user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_phone(phone, &self.tables.users, &mut conn).await
    }

    async fn update_otp(
        &self,
        user_id: &UserId,
        otp: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::update_otp(user_id, otp, expires_at, &self.tables.users, &mut conn).await
    }

    async fn consume_otp(&self, user_id: &UserId, otp: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::consume_otp(user_id, otp, &self.tables.users, &mut conn).await
    }
}

impl AddressManagement for SqliteDatabase {
    async fn insert_address(&self, address: &DeliveryAddress) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        addresses::insert_address(address, &self.tables.delivery_addresses, &mut conn).await
    }

    async fn fetch_address(&self, address_id: &str) -> Result<Option<DeliveryAddress>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        addresses::fetch_address(address_id, &self.tables.delivery_addresses, &mut conn).await
    }

    async fn fetch_addresses_for_user(&self, user_id: &UserId) -> Result<Vec<DeliveryAddress>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        addresses::fetch_addresses_for_user(user_id, &self.tables.delivery_addresses, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_ads(&self) -> Result<Vec<Ad>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_ads(&self.tables.ads, &mut conn).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_categories(&self.tables.categories, &mut conn).await
    }

    async fn fetch_products_in_category(&self, category_id: &str) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_products_in_category(category_id, &self.tables.products, &mut conn).await
    }

    async fn fetch_product(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_product(product_id, &self.tables.products, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &self.tables.orders, &mut conn).await
    }

    async fn insert_order_item(&self, item: &OrderItem) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order_item(item, &self.tables.order_items, &mut conn).await
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(order_id, &self.tables.orders, &mut conn).await
    }

    async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_user(user_id, &self.tables.orders, &mut conn).await
    }

    async fn fetch_items_for_order(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_items_for_order(order_id, &self.tables.order_items, &mut conn).await
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        expected: Option<OrderStatusType>,
        new_status: OrderStatusType,
    ) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(order_id, expected, new_status, &self.tables.orders, &mut conn).await
    }

    async fn delete_items_for_order(&self, order_id: &OrderId) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::delete_items_for_order(order_id, &self.tables.order_items, &mut conn).await
    }
}
