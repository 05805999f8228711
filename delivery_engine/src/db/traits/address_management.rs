use crate::{
    db::traits::StoreError,
    db_types::{DeliveryAddress, UserId},
};

#[allow(async_fn_in_trait)]
pub trait AddressManagement {
    async fn insert_address(&self, address: &DeliveryAddress) -> Result<(), StoreError>;

    async fn fetch_address(&self, address_id: &str) -> Result<Option<DeliveryAddress>, StoreError>;

    async fn fetch_addresses_for_user(&self, user_id: &UserId) -> Result<Vec<DeliveryAddress>, StoreError>;
}
