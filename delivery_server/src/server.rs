use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer};
use delivery_engine::{
    pipeline::{
        BroadcastChannel,
        ConfiguredChannel,
        MessageQueue,
        OrderStatusConsumer,
        OrderStatusPublisher,
        WebhookChannel,
    },
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::{PipelineConfig, ServerConfig},
    dispatch::{ApiRequest, ApiResponse, Dispatch, Router},
    errors::ServerError,
    routes::{build_router, DeliveryApis},
    status_worker::{start_notification_logger, start_status_worker},
};

const BROADCAST_CAPACITY: usize = 64;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25, config.tables.clone())
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.create_schema().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let queue = MessageQueue::new(config.pipeline.queue_name.as_str(), config.pipeline.buffer_size);
    let publisher = OrderStatusPublisher::new(queue.producer());
    let consumer = OrderStatusConsumer::new(
        db.clone(),
        configure_channel(&config.pipeline),
        config.pipeline.notification_topic.as_str(),
        config.pipeline.max_receive_count,
    );
    let worker = start_status_worker(consumer, queue.into_receiver(), config.pipeline.batch_size);
    let srv = create_server_instance(config, db.clone(), Some(publisher))?;
    let result = srv.await.map_err(ServerError::from);
    // The workers' publishers are gone now, so the queue closes once the consumer has drained it
    if let Err(e) = worker.await {
        warn!("💻️ The order status worker did not shut down cleanly. {e}");
    }
    db.close().await;
    result
}

/// Picks the notification channel. Without a webhook, notifications are published in-process and logged.
pub fn configure_channel(config: &PipelineConfig) -> ConfiguredChannel {
    match &config.webhook_url {
        Some(url) => ConfiguredChannel::Webhook(WebhookChannel::new(url.as_str())),
        None => {
            let channel = BroadcastChannel::new(BROADCAST_CAPACITY);
            start_notification_logger(channel.subscribe());
            ConfiguredChannel::Broadcast(channel)
        },
    }
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    publisher: Option<OrderStatusPublisher>,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let apis = DeliveryApis::new(db.clone(), config.otp.clone(), publisher.clone());
        let router = build_router(apis, TokenIssuer::new(&config.auth));
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dlv::access_log"))
            .configure(configure_dispatch(router))
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    info!("💻️ Server listening on {host}:{port}");
    Ok(srv)
}

/// Registers every route pattern of `router` with actix. actix only matches the pattern; the method check, the
/// middleware and the handler are all the router's job.
pub fn configure_dispatch(router: Router) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let patterns = router.patterns().into_iter().map(String::from).collect::<Vec<_>>();
        cfg.app_data(web::Data::new(router));
        for pattern in &patterns {
            cfg.route(pattern, web::route().to(dispatch_request));
        }
        trace!("💻️ {} route patterns registered", patterns.len());
    }
}

async fn dispatch_request(req: HttpRequest, body: web::Bytes, router: web::Data<Router>) -> HttpResponse {
    let api_request = ApiRequest::from_http(&req, body);
    match router.dispatch(api_request).await {
        Dispatch::Matched(res) => res.into_http_response(),
        Dispatch::NotFound => ApiResponse::not_found(req.method(), req.path()).into_http_response(),
    }
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    ApiResponse::not_found(req.method(), req.path()).into_http_response()
}
