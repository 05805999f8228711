//! # Delivery server
//! This crate hosts the HTTP server for the delivery backend. It is responsible for:
//! * Routing requests through the [dispatch](dispatch/index.html) layer, which also authenticates callers.
//! * Calling the delivery engine APIs and turning their results into JSON responses.
//! * Running the background worker that turns order status changes into customer notifications.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `POST /users/register`, `/users/send-otp`, `/users/verify-otp`: phone sign-in. `verify-otp` returns an access
//!   token.
//! * `GET /ads`, `/categories`, `/products/{categoryId}`: the catalog.
//! * `POST /orders`, `GET /orders`, `GET /orders/{orderId}`, `POST /orders/{orderId}/cancel`: orders.
//! * `POST /delivery-addresses`, `GET /delivery-addresses`: the caller's delivery addresses.
//!
//! Everything except the health check and the sign-in routes requires an `Authorization: Bearer <token>` header.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod dispatch;
pub mod errors;
pub mod routes;
pub mod server;
pub mod status_worker;

#[cfg(test)]
mod endpoint_tests;
