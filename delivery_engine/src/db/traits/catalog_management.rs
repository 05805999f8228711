use crate::{
    db::traits::StoreError,
    db_types::{Ad, Category, Product},
};

/// Read-only access to the catalog. Catalog records are maintained outside of this service.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_ads(&self) -> Result<Vec<Ad>, StoreError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn fetch_products_in_category(&self, category_id: &str) -> Result<Vec<Product>, StoreError>;

    async fn fetch_product(&self, product_id: &str) -> Result<Option<Product>, StoreError>;
}
