use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::{TimeZone, Utc};
use delivery_engine::{
    db_types::{Order, OrderId, OrderStatusType, User, UserId},
    pipeline::OrderStatusPublisher,
    AddressApi,
    AuthApi,
    CatalogApi,
    OrderFlowApi,
};
use dlv_common::Secret;
use log::debug;
use serde_json::Value;

use super::mocks::MockStore;
use crate::{
    auth::TokenIssuer,
    config::AuthConfig,
    routes::{build_router, DeliveryApis},
    server::{configure_dispatch, not_found},
};

// DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-secret-do-not-use".into()), issuer: "delivery-app".into() }
}

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(&get_auth_config())
}

pub fn alice() -> User {
    User {
        id: UserId::from("u-alice"),
        name: "Alice".into(),
        phone: "+15550001".into(),
        otp: None,
        otp_expires_at: None,
    }
}

pub fn bob() -> User {
    User { id: UserId::from("u-bob"), name: "Bob".into(), phone: "+15550002".into(), otp: None, otp_expires_at: None }
}

pub fn bearer(user: &User) -> (&'static str, String) {
    let token = token_issuer().issue_token(user).expect("Failed to issue token");
    ("Authorization", format!("Bearer {token}"))
}

pub fn order(id: &str, owner: &User, status: OrderStatusType) -> Order {
    Order {
        id: OrderId::from(id),
        user_id: owner.id.clone(),
        total: 10.0,
        status,
        delivery_address_id: "addr-1".into(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
    }
}

/// One mock store per engine API, so that each test only sets up the calls it expects.
#[derive(Default)]
pub struct TestStores {
    pub auth: MockStore,
    pub orders: MockStore,
    pub addresses: MockStore,
    pub catalog: MockStore,
    pub publisher: Option<OrderStatusPublisher>,
}

impl TestStores {
    pub fn into_apis(self) -> DeliveryApis<MockStore> {
        let orders = OrderFlowApi::new(self.orders);
        let orders = match self.publisher {
            Some(p) => orders.with_publisher(p),
            None => orders,
        };
        DeliveryApis {
            auth: AuthApi::new(self.auth),
            orders,
            addresses: AddressApi::new(self.addresses),
            catalog: CatalogApi::new(self.catalog),
        }
    }
}

/// Sends `req` through the full router and returns the status and JSON body.
pub async fn send(stores: TestStores, req: TestRequest) -> (StatusCode, Value) {
    let router = build_router(stores.into_apis(), token_issuer());
    let app = App::new().configure(configure_dispatch(router)).default_service(web::to(not_found));
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    debug!("Response: {status} {}", String::from_utf8_lossy(&body));
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).expect("Response is not JSON") };
    (status, json)
}
