use std::collections::HashMap;

use actix_web::{
    http::{
        header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
        Method,
    },
    web::Bytes,
    HttpRequest,
};
use serde::de::DeserializeOwned;

use crate::{auth::JwtClaims, errors::ServerError};

/// Request-scoped state that middleware hands down to handlers.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// The authenticated caller, once a bearer token has been validated.
    pub user: Option<JwtClaims>,
}

/// A request as seen by the router. `pattern` is the route pattern the host matched (e.g. `/orders/{orderId}`) and
/// `params` holds the values of its path parameters.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub pattern: String,
    pub params: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub context: RequestContext,
}

impl ApiRequest {
    pub fn new<S: Into<String>>(method: Method, pattern: S) -> Self {
        let pattern = pattern.into();
        Self {
            method,
            path: pattern.clone(),
            pattern,
            params: HashMap::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            context: RequestContext::default(),
        }
    }

    /// Adapts an actix request. Requests that did not match any registered pattern keep their raw path as the pattern.
    pub fn from_http(req: &HttpRequest, body: Bytes) -> Self {
        let pattern = req.match_pattern().unwrap_or_else(|| req.path().to_string());
        let params = req.match_info().iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Self {
            method: req.method().clone(),
            path: req.path().to_string(),
            pattern,
            params,
            headers: req.headers().clone(),
            body,
            context: RequestContext::default(),
        }
    }

    pub fn with_param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    pub fn param(&self, name: &str) -> Result<&str, ServerError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ServerError::InvalidRequestPath(format!("Missing path parameter '{name}'")))
    }

    /// Deserializes the JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ServerError> {
        serde_json::from_slice(&self.body).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))
    }

    /// The token from an `Authorization: Bearer <token>` header, if there is one.
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }

    /// The authenticated caller. Only routes behind [`require_bearer`](super::require_bearer) have one.
    pub fn user(&self) -> Result<&JwtClaims, ServerError> {
        self.context.user.as_ref().ok_or_else(|| ServerError::Unauthorized(crate::errors::AuthError::MissingToken))
    }
}
