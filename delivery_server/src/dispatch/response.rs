use actix_web::{
    http::{Method, StatusCode},
    HttpResponse,
    ResponseError,
};
use log::*;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::ServerError;

/// A handler's answer: a status code and a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self, ServerError> {
        let body = serde_json::to_value(value)
            .map_err(|e| ServerError::BackendError(format!("Could not serialize response. {e}")))?;
        Ok(Self { status, body })
    }

    pub fn ok<T: Serialize>(value: &T) -> Result<Self, ServerError> {
        Self::json(StatusCode::OK, value)
    }

    pub fn created<T: Serialize>(value: &T) -> Result<Self, ServerError> {
        Self::json(StatusCode::CREATED, value)
    }

    pub fn not_found(method: &Method, path: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, json!({ "error": format!("No route for {method} {path}") }))
    }

    pub fn into_http_response(self) -> HttpResponse {
        HttpResponse::build(self.status).json(self.body)
    }
}

impl From<ServerError> for ApiResponse {
    fn from(e: ServerError) -> Self {
        let status = e.status_code();
        if status.is_server_error() {
            error!("🧭️ {e}");
        } else {
            debug!("🧭️ Request rejected ({status}). {e}");
        }
        Self::new(status, json!({ "error": e.to_string() }))
    }
}
