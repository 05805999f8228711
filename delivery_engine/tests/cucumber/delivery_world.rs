use std::collections::HashMap;

use cucumber::World;
use delivery_engine::{
    db_types::{Order, User},
    AuthApi,
    OrderFlowApi,
    SqliteDatabase,
};
use log::*;

use crate::support::prepare_test_db;

#[derive(Default, Debug, World)]
pub struct DeliveryWorld {
    pub system: Option<DeliverySystem>,
    /// Registered customers, by name
    pub customers: HashMap<String, User>,
    /// Delivery address ids, by customer name and address label
    pub addresses: HashMap<(String, String), String>,
    pub last_order: Option<Order>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct DeliverySystem {
    pub db: SqliteDatabase,
    pub auth: AuthApi<SqliteDatabase>,
    pub orders: OrderFlowApi<SqliteDatabase>,
}

impl DeliveryWorld {
    pub fn system(&self) -> &DeliverySystem {
        self.system.as_ref().expect("Delivery system not initialised")
    }

    pub fn customer(&self, name: &str) -> &User {
        self.customers.get(name).unwrap_or_else(|| panic!("No customer named {name}"))
    }

    pub fn last_order(&self) -> &Order {
        self.last_order.as_ref().expect("No order has been placed")
    }

    pub fn record<T, E: std::fmt::Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(v) => {
                self.last_error = None;
                Some(v)
            },
            Err(e) => {
                debug!("🥒️ Step produced an error: {e}");
                self.last_error = Some(e.to_string());
                None
            },
        }
    }
}

impl DeliverySystem {
    pub async fn new() -> Self {
        let db = prepare_test_db().await;
        let auth = AuthApi::new(db.clone());
        let orders = OrderFlowApi::new(db.clone());
        debug!("🥒️ Delivery system ready");
        Self { db, auth, orders }
    }
}
