//! Request handler definitions
//!
//! Define each route and its handler here, and register it in [`build_router`].
//! Handlers that are more than a line or two MUST go into the engine. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Each worker thread processes its requests on a single thread, so handlers which block the current thread will
//! cause the current worker to stop processing new requests. Every handler here is async and only awaits I/O.
use std::{future::Future, rc::Rc};

use actix_web::http::{Method, StatusCode};
use delivery_engine::{
    db_types::{NewDeliveryAddress, OrderId},
    order_objects::NewOrderRequest,
    pipeline::OrderStatusPublisher,
    traits::{AddressManagement, CatalogManagement, OrderManagement, UserManagement},
    AddressApi,
    AuthApi,
    CatalogApi,
    OrderFlowApi,
    OtpGenerator,
};
use log::*;
use serde_json::json;

use crate::{
    auth::TokenIssuer,
    data_objects::{JsonResponse, RegisterRequest, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse},
    dispatch::{handler, log_requests, require_bearer, ApiRequest, ApiResponse, Handler, Router},
    errors::ServerError,
};

/// The engine APIs the handlers call.
pub struct DeliveryApis<B> {
    pub auth: AuthApi<B>,
    pub orders: OrderFlowApi<B>,
    pub addresses: AddressApi<B>,
    pub catalog: CatalogApi<B>,
}

impl<B: Clone> DeliveryApis<B> {
    pub fn new(db: B, otp: OtpGenerator, publisher: Option<OrderStatusPublisher>) -> Self {
        let orders = OrderFlowApi::new(db.clone());
        let orders = match publisher {
            Some(p) => orders.with_publisher(p),
            None => orders,
        };
        Self {
            auth: AuthApi::new(db.clone()).with_otp_generator(otp),
            orders,
            addresses: AddressApi::new(db.clone()),
            catalog: CatalogApi::new(db),
        }
    }
}

/// Shared, read-only state for the handlers of one worker.
pub struct ApiState<B> {
    pub apis: DeliveryApis<B>,
    pub tokens: TokenIssuer,
}

/// Builds the route table. Everything except `/health` and the sign-in flow requires a bearer token.
pub fn build_router<B>(apis: DeliveryApis<B>, tokens: TokenIssuer) -> Router
where B: UserManagement + AddressManagement + CatalogManagement + OrderManagement + 'static {
    let bearer = require_bearer(tokens.clone());
    let state = Rc::new(ApiState { apis, tokens });
    let mut router = Router::new();
    router
        .use_middleware(log_requests())
        .add("/health", Some(Method::GET), handler(health), vec![])
        .add("/users/register", Some(Method::POST), endpoint(&state, register::<B>), vec![])
        .add("/users/send-otp", Some(Method::POST), endpoint(&state, send_otp::<B>), vec![])
        .add("/users/verify-otp", Some(Method::POST), endpoint(&state, verify_otp::<B>), vec![])
        .add("/ads", Some(Method::GET), endpoint(&state, ads::<B>), vec![bearer.clone()])
        .add("/categories", Some(Method::GET), endpoint(&state, categories::<B>), vec![bearer.clone()])
        .add("/products/{categoryId}", Some(Method::GET), endpoint(&state, products::<B>), vec![bearer.clone()])
        .add("/orders", Some(Method::POST), endpoint(&state, create_order::<B>), vec![bearer.clone()])
        .add("/orders", Some(Method::GET), endpoint(&state, my_orders::<B>), vec![bearer.clone()])
        .add("/orders/{orderId}", Some(Method::GET), endpoint(&state, order_by_id::<B>), vec![bearer.clone()])
        .add("/orders/{orderId}/cancel", Some(Method::POST), endpoint(&state, cancel_order::<B>), vec![bearer.clone()])
        .add("/delivery-addresses", Some(Method::POST), endpoint(&state, create_address::<B>), vec![bearer.clone()])
        .add("/delivery-addresses", Some(Method::GET), endpoint(&state, my_addresses::<B>), vec![bearer]);
    debug!("🧭️ Route table built with {} routes", router.len());
    router
}

/// Adapts a fallible handler that needs the shared state into a [`Handler`].
fn endpoint<B, F, Fut>(state: &Rc<ApiState<B>>, f: F) -> Handler
where
    B: 'static,
    F: Fn(Rc<ApiState<B>>, ApiRequest) -> Fut + 'static,
    Fut: Future<Output = Result<ApiResponse, ServerError>> + 'static,
{
    let state = Rc::clone(state);
    handler(move |req| {
        let fut = f(Rc::clone(&state), req);
        async move { fut.await.unwrap_or_else(ApiResponse::from) }
    })
}

async fn health(_req: ApiRequest) -> ApiResponse {
    ApiResponse::new(StatusCode::OK, json!({ "status": "👍️" }))
}

//----------------------------------------------  Sign-in  -------------------------------------------------------------
async fn register<B: UserManagement>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError> {
    let body = req.json::<RegisterRequest>()?;
    let user = state.apis.auth.register(body.into()).await?;
    ApiResponse::created(&user)
}

async fn send_otp<B: UserManagement>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError> {
    let body = req.json::<SendOtpRequest>()?;
    state.apis.auth.send_otp(&body.phone).await?;
    ApiResponse::ok(&JsonResponse::success("A one-time password has been sent."))
}

async fn verify_otp<B: UserManagement>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError> {
    let body = req.json::<VerifyOtpRequest>()?;
    let user = state.apis.auth.verify_otp(&body.phone, &body.otp).await?;
    let token =
        state.tokens.issue_token(&user).map_err(|e| ServerError::CouldNotSerializeAccessToken(e.to_string()))?;
    ApiResponse::ok(&VerifyOtpResponse { user, token })
}

//----------------------------------------------  Catalog  -------------------------------------------------------------
async fn ads<B: CatalogManagement>(state: Rc<ApiState<B>>, _req: ApiRequest) -> Result<ApiResponse, ServerError> {
    ApiResponse::ok(&state.apis.catalog.ads().await?)
}

async fn categories<B>(state: Rc<ApiState<B>>, _req: ApiRequest) -> Result<ApiResponse, ServerError>
where B: CatalogManagement {
    ApiResponse::ok(&state.apis.catalog.categories().await?)
}

async fn products<B: CatalogManagement>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError> {
    let category_id = req.param("categoryId")?;
    ApiResponse::ok(&state.apis.catalog.products_in_category(category_id).await?)
}

//----------------------------------------------  Orders  --------------------------------------------------------------
async fn create_order<B>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError>
where B: OrderManagement + AddressManagement + CatalogManagement {
    let user_id = req.user()?.user_id();
    let body = req.json::<NewOrderRequest>()?;
    let result = state.apis.orders.create_order(&user_id, body).await?;
    ApiResponse::created(&result)
}

async fn my_orders<B: OrderManagement>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError> {
    let user_id = req.user()?.user_id();
    ApiResponse::ok(&state.apis.orders.orders_for_user(&user_id).await?)
}

async fn order_by_id<B: OrderManagement>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError> {
    let user_id = req.user()?.user_id();
    let order_id = OrderId::from(req.param("orderId")?);
    ApiResponse::ok(&state.apis.orders.order_details(&user_id, &order_id).await?)
}

async fn cancel_order<B: OrderManagement>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError> {
    let user_id = req.user()?.user_id();
    let order_id = OrderId::from(req.param("orderId")?);
    ApiResponse::ok(&state.apis.orders.cancel_order(&user_id, &order_id).await?)
}

//----------------------------------------------  Delivery addresses  --------------------------------------------------
async fn create_address<B>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError>
where B: AddressManagement {
    let user_id = req.user()?.user_id();
    let body = req.json::<NewDeliveryAddress>()?;
    let address = state.apis.addresses.create_address(&user_id, body).await?;
    ApiResponse::created(&address)
}

async fn my_addresses<B>(state: Rc<ApiState<B>>, req: ApiRequest) -> Result<ApiResponse, ServerError>
where B: AddressManagement {
    let user_id = req.user()?.user_id();
    ApiResponse::ok(&state.apis.addresses.addresses_for_user(&user_id).await?)
}
