use chrono::{Duration, Utc};
use delivery_engine::db_types::{User, UserId};
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    UntrustedToken,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError};

/// Access tokens are valid for 24 hours after issuance.
pub const ACCESS_TOKEN_VALIDITY_HOURS: i64 = 24;

/// The custom claims carried by an access token. `iss` and `sub` are checked on validation; `sub` always equals
/// `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub iss: String,
    pub sub: String,
}

impl JwtClaims {
    pub fn user_id(&self) -> UserId {
        UserId::from(self.user_id.as_str())
    }
}

/// Issues and validates HS256 access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    key: Hs256Key,
    issuer: String,
    time_options: TimeOptions,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenIssuer ({})", self.issuer)
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
        Self { key, issuer: config.issuer.clone(), time_options: TimeOptions::default() }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a new access token for the given user.
    /// This method DOES NOT check that the user is who they claim to be. The one-time password must be verified
    /// before calling `issue_token`.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let custom = JwtClaims {
            user_id: user.id.to_string(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            iss: self.issuer.clone(),
            sub: user.id.to_string(),
        };
        let claims = Claims::new(custom)
            .set_duration_and_issuance(&self.time_options, Duration::hours(ACCESS_TOKEN_VALIDITY_HOURS))
            .set_not_before(Utc::now());
        let header = Header::empty().with_token_type("JWT");
        let token = Hs256
            .token(&header, &claims, &self.key)
            .map_err(|e| AuthError::ValidationError(format!("Could not sign token. {e}")))?;
        trace!("🔑️ Access token issued for user {}", user.id);
        Ok(token)
    }

    /// Checks the signature, expiry, maturity and issuer of `token` and returns its claims.
    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted_token =
            UntrustedToken::new(token).map_err(|e| AuthError::PoorlyFormattedToken(format!("{e}")))?;
        let token = Hs256
            .validator::<JwtClaims>(&self.key)
            .validate(&untrusted_token)
            .map_err(|e| AuthError::ValidationError(format!("{e}")))?;
        let claims = token.claims();
        claims
            .validate_expiration(&self.time_options)
            .and_then(|c| c.validate_maturity(&self.time_options))
            .map_err(|e| AuthError::ValidationError(format!("{e}")))?;
        let custom = &claims.custom;
        if custom.iss != self.issuer {
            return Err(AuthError::ValidationError(format!("Unexpected token issuer '{}'", custom.iss)));
        }
        if custom.sub != custom.user_id {
            return Err(AuthError::ValidationError("Token subject does not match the user id".into()));
        }
        Ok(custom.clone())
    }
}
