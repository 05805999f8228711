use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::AddressManagement,
    db_types::{new_id, DeliveryAddress, NewDeliveryAddress, UserId},
    dlv_api::errors::AddressApiError,
};

/// Manages the delivery addresses that users order to. Addresses are immutable once created.
pub struct AddressApi<B> {
    db: B,
}

impl<B> Debug for AddressApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AddressApi")
    }
}

impl<B> AddressApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AddressApi<B>
where B: AddressManagement
{
    pub async fn create_address(
        &self,
        user_id: &UserId,
        address: NewDeliveryAddress,
    ) -> Result<DeliveryAddress, AddressApiError> {
        if address.name.trim().is_empty() || address.address_line.trim().is_empty() {
            return Err(AddressApiError::ValidationError("Name and address line are required".into()));
        }
        if address.latitude.is_some() != address.longitude.is_some() {
            return Err(AddressApiError::ValidationError("Latitude and longitude must be given together".into()));
        }
        let address = DeliveryAddress {
            id: new_id(),
            user_id: user_id.clone(),
            name: address.name.trim().to_string(),
            address_line: address.address_line.trim().to_string(),
            latitude: address.latitude,
            longitude: address.longitude,
        };
        self.db.insert_address(&address).await?;
        debug!("🏠️ Address {} created for user {user_id}", address.id);
        Ok(address)
    }

    pub async fn addresses_for_user(&self, user_id: &UserId) -> Result<Vec<DeliveryAddress>, AddressApiError> {
        Ok(self.db.fetch_addresses_for_user(user_id).await?)
    }
}
