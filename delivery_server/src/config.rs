use std::{env, fmt::Display, str::FromStr};

use delivery_engine::{OtpGenerator, TableNames};
use dlv_common::{parse_env_var, Secret};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_DLV_HOST: &str = "127.0.0.1";
const DEFAULT_DLV_PORT: u16 = 8470;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/delivery.db";
const DEFAULT_JWT_ISSUER: &str = "delivery-app";
const DEFAULT_ORDER_QUEUE: &str = "order-status-queue";
const DEFAULT_NOTIFICATION_TOPIC: &str = "order-status-notifications";
const DEFAULT_QUEUE_BUFFER_SIZE: usize = 256;
const DEFAULT_QUEUE_BATCH_SIZE: usize = 10;
const DEFAULT_QUEUE_MAX_RECEIVE_COUNT: u32 = 5;

/// Everything the server needs, read from the environment once at start-up and passed down from there.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub tables: TableNames,
    pub otp: OtpGenerator,
    pub pipeline: PipelineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DLV_HOST.to_string(),
            port: DEFAULT_DLV_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            tables: TableNames::default(),
            otp: OtpGenerator::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DLV_HOST").ok().unwrap_or_else(|| DEFAULT_DLV_HOST.into());
        let port = env_or_default("DLV_PORT", DEFAULT_DLV_PORT);
        let database_url = env::var("DLV_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ DLV_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let tables = table_names_from_env();
        let otp = env_or_default("DLV_OTP_MODE", OtpGenerator::default());
        if otp != OtpGenerator::Random {
            warn!(
                "🪛️ One-time passwords are fixed, so every user gets the same code. Set DLV_OTP_MODE=random to change \
                 this."
            );
        }
        let pipeline = PipelineConfig::from_env_or_default();
        Self { host, port, database_url, auth, tables, otp, pipeline }
    }
}

fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match parse_env_var::<T>(name) {
        Ok(Some(v)) => v,
        Ok(None) => default,
        Err(e) => {
            error!("🪛️ {e}. Using the default, {default}, instead.");
            default
        },
    }
}

fn table_names_from_env() -> TableNames {
    let defaults = TableNames::default();
    let tables = TableNames {
        users: env_or_default("DLV_USERS_TABLE", defaults.users.clone()),
        delivery_addresses: env_or_default("DLV_DELIVERY_ADDRESS_TABLE", defaults.delivery_addresses.clone()),
        products: env_or_default("DLV_PRODUCTS_TABLE", defaults.products.clone()),
        categories: env_or_default("DLV_CATEGORIES_TABLE", defaults.categories.clone()),
        ads: env_or_default("DLV_ADS_TABLE", defaults.ads.clone()),
        orders: env_or_default("DLV_ORDERS_TABLE", defaults.orders.clone()),
        order_items: env_or_default("DLV_ORDER_ITEMS_TABLE", defaults.order_items.clone()),
    };
    match tables.validate() {
        Ok(()) => tables,
        Err(e) => {
            error!("🪛️ {e}. Using the default table names instead.");
            defaults
        },
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify access tokens (HS256).
    pub jwt_secret: Secret<String>,
    /// The `iss` claim written into, and required of, every access token.
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT operate \
             on production like this, since every access token becomes invalid when the server restarts. Set \
             DLV_JWT_SECRET instead. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect::<String>();
        Self { jwt_secret: Secret::new(secret), issuer: DEFAULT_JWT_ISSUER.to_string() }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("DLV_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DLV_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("DLV_JWT_SECRET is empty".into()));
        }
        let issuer = env::var("DLV_JWT_ISSUER").ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| {
            debug!("🪛️ DLV_JWT_ISSUER is not set. Using {DEFAULT_JWT_ISSUER}");
            DEFAULT_JWT_ISSUER.to_string()
        });
        Ok(Self { jwt_secret: Secret::new(secret), issuer })
    }
}

//-----------------------------------------------  PipelineConfig  -----------------------------------------------------
/// Settings for the order status queue and the notification channel behind it.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub queue_name: String,
    pub buffer_size: usize,
    pub batch_size: usize,
    /// A failing message is delivered at most this many times before it is dead-lettered.
    pub max_receive_count: u32,
    pub notification_topic: String,
    /// When set, notifications are POSTed to this URL instead of going to the in-process channel.
    pub webhook_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_name: DEFAULT_ORDER_QUEUE.to_string(),
            buffer_size: DEFAULT_QUEUE_BUFFER_SIZE,
            batch_size: DEFAULT_QUEUE_BATCH_SIZE,
            max_receive_count: DEFAULT_QUEUE_MAX_RECEIVE_COUNT,
            notification_topic: DEFAULT_NOTIFICATION_TOPIC.to_string(),
            webhook_url: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_env_or_default() -> Self {
        let queue_name = env_or_default("DLV_ORDER_QUEUE", DEFAULT_ORDER_QUEUE.to_string());
        let buffer_size = env_or_default("DLV_QUEUE_BUFFER_SIZE", DEFAULT_QUEUE_BUFFER_SIZE).max(1);
        let batch_size = env_or_default("DLV_QUEUE_BATCH_SIZE", DEFAULT_QUEUE_BATCH_SIZE).max(1);
        let max_receive_count = env_or_default("DLV_QUEUE_MAX_RECEIVE_COUNT", DEFAULT_QUEUE_MAX_RECEIVE_COUNT).max(1);
        let notification_topic = env_or_default("DLV_NOTIFICATION_TOPIC", DEFAULT_NOTIFICATION_TOPIC.to_string());
        let webhook_url = env::var("DLV_NOTIFICATION_WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty());
        match &webhook_url {
            Some(url) => info!("🪛️ Order status notifications will be POSTed to {url}"),
            None => info!("🪛️ Order status notifications are published in-process on {notification_topic}"),
        }
        Self { queue_name, buffer_size, batch_size, max_receive_count, notification_topic, webhook_url }
    }
}
