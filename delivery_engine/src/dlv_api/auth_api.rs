use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use chrono::{Duration, Utc};
use log::*;
use rand::Rng;

use crate::{
    db::traits::UserManagement,
    db_types::{NewUser, User, UserId},
    dlv_api::errors::AuthApiError,
};

/// The code handed out by [`OtpGenerator::Fixed`] unless another one is configured.
pub const DEFAULT_OTP: &str = "123456";
/// How long a one-time password stays valid, in seconds.
pub const OTP_VALIDITY_SECS: i64 = 120;

/// Produces one-time passwords.
///
/// There is no SMS integration, so the default generator always hands out [`DEFAULT_OTP`]. The `Random` generator
/// produces six uniformly random digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpGenerator {
    Fixed(String),
    Random,
}

impl Default for OtpGenerator {
    fn default() -> Self {
        Self::Fixed(DEFAULT_OTP.to_string())
    }
}

impl OtpGenerator {
    pub fn generate(&self) -> String {
        match self {
            Self::Fixed(otp) => otp.clone(),
            Self::Random => format!("{:06}", rand::thread_rng().gen_range(0..1_000_000)),
        }
    }
}

impl Display for OtpGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(_) => write!(f, "fixed"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl FromStr for OtpGenerator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::default()),
            "random" => Ok(Self::Random),
            s => Err(format!("Unknown OTP mode '{s}'. Expected 'fixed' or 'random'")),
        }
    }
}

/// `AuthApi` handles the phone-number based sign-in flow: registration, (re)sending one-time passwords and verifying
/// them. Issuing access tokens is left to the caller, once [`AuthApi::verify_otp`] succeeds.
pub struct AuthApi<B> {
    db: B,
    otp: OtpGenerator,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.otp)
    }
}

impl<B> AuthApi<B> {
    pub fn new(db: B) -> Self {
        Self { db, otp: OtpGenerator::default() }
    }

    pub fn with_otp_generator(mut self, otp: OtpGenerator) -> Self {
        self.otp = otp;
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    /// Registers a new user and issues their first one-time password.
    ///
    /// The returned user has the OTP fields scrubbed. Fails with [`AuthApiError::PhoneAlreadyRegistered`] if the phone
    /// number is taken, whether that is noticed by the initial lookup or by the conditional insert.
    pub async fn register(&self, new_user: NewUser) -> Result<User, AuthApiError> {
        let name = new_user.name.trim();
        let phone = new_user.phone.trim();
        if name.is_empty() || phone.is_empty() {
            return Err(AuthApiError::ValidationError("Name and phone are required".into()));
        }
        if self.db.fetch_user_by_phone(phone).await?.is_some() {
            debug!("🔑️ Registration rejected. {phone} is already registered");
            return Err(AuthApiError::PhoneAlreadyRegistered);
        }
        let user = User {
            id: UserId::random(),
            name: name.to_string(),
            phone: phone.to_string(),
            otp: Some(self.otp.generate()),
            otp_expires_at: Some(Utc::now() + Duration::seconds(OTP_VALIDITY_SECS)),
        };
        self.db.insert_user(&user).await.map_err(|e| {
            warn!("🔑️ Could not store new user with phone {phone}. {e}");
            AuthApiError::from(e)
        })?;
        info!("🔑️ New user {} registered", user.id);
        Ok(user.scrubbed())
    }

    /// Issues a fresh one-time password for the user with the given phone, replacing any previous one and restarting
    /// the validity window.
    pub async fn send_otp(&self, phone: &str) -> Result<(), AuthApiError> {
        let user = self.db.fetch_user_by_phone(phone.trim()).await?.ok_or(AuthApiError::UserNotFound)?;
        let expires_at = Utc::now() + Duration::seconds(OTP_VALIDITY_SECS);
        self.db.update_otp(&user.id, Some(self.otp.generate()), Some(expires_at)).await?;
        debug!("🔑️ OTP issued for user {}. Valid until {expires_at}", user.id);
        Ok(())
    }

    /// Checks the one-time password for the user with the given phone.
    ///
    /// On success the OTP is cleared (so it cannot be used twice) and the user record is returned.
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> Result<User, AuthApiError> {
        let user = self.db.fetch_user_by_phone(phone.trim()).await?.ok_or(AuthApiError::UserNotFound)?;
        if user.otp.as_deref() != Some(otp) {
            debug!("🔑️ Invalid OTP submitted for user {}", user.id);
            return Err(AuthApiError::InvalidOtp);
        }
        match user.otp_expires_at {
            Some(expiry) if Utc::now() <= expiry => {},
            _ => {
                debug!("🔑️ Expired OTP submitted for user {}", user.id);
                return Err(AuthApiError::OtpExpired);
            },
        }
        if !self.db.consume_otp(&user.id, otp).await? {
            debug!("🔑️ OTP for user {} was used by a concurrent verification", user.id);
            return Err(AuthApiError::InvalidOtp);
        }
        info!("🔑️ User {} verified their phone number", user.id);
        Ok(user.scrubbed())
    }
}
