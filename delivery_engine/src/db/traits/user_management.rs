use chrono::{DateTime, Utc};

use crate::{
    db::traits::StoreError,
    db_types::{User, UserId},
};

#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Stores a brand-new user.
    ///
    /// This is a conditional write: backends MUST reject the insert with [`StoreError::ConditionFailed`] if a user
    /// with the same phone number already exists at the time of the write. A prior lookup is not sufficient, since
    /// two registrations for the same phone can race.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn fetch_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, StoreError>;

    async fn fetch_user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError>;

    /// Overwrites the one-time password and its expiry. Passing `None` for both clears them.
    async fn update_otp(
        &self,
        user_id: &UserId,
        otp: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    /// Clears the one-time password, but only if it still equals `otp`.
    ///
    /// This is a conditional write. Returns `false` when the stored code no longer matches, e.g. because a concurrent
    /// verification already consumed it.
    async fn consume_otp(&self, user_id: &UserId, otp: &str) -> Result<bool, StoreError>;
}
