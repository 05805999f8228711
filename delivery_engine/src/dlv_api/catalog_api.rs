use std::fmt::Debug;

use crate::{
    db::traits::CatalogManagement,
    db_types::{Ad, Category, Product},
    dlv_api::errors::CatalogApiError,
};

/// Read-only access to the catalog.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn ads(&self) -> Result<Vec<Ad>, CatalogApiError> {
        Ok(self.db.fetch_ads().await?)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        Ok(self.db.fetch_categories().await?)
    }

    pub async fn products_in_category(&self, category_id: &str) -> Result<Vec<Product>, CatalogApiError> {
        Ok(self.db.fetch_products_in_category(category_id).await?)
    }
}
