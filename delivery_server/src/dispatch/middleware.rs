use std::{future::ready, rc::Rc, time::Instant};

use futures::FutureExt;
use log::*;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    dispatch::{ApiRequest, ApiResponse, Handler, Middleware},
    errors::{AuthError, ServerError},
};

/// Rejects requests without a valid `Authorization: Bearer <token>` header with a 401. Otherwise the token's claims
/// are placed in the request context for the handlers further in.
///
/// Identity comes from the validated claims only; the user is not looked up in the store.
pub fn require_bearer(issuer: TokenIssuer) -> Middleware {
    let issuer = Rc::new(issuer);
    Rc::new(move |next: Handler| -> Handler {
        let issuer = Rc::clone(&issuer);
        Rc::new(move |mut req: ApiRequest| match authenticate(&issuer, &req) {
            Ok(claims) => {
                trace!("🔑️ {} {} authenticated as user {}", req.method, req.path, claims.user_id);
                req.context.user = Some(claims);
                next(req)
            },
            Err(e) => {
                debug!("🔑️ {} {} rejected. {e}", req.method, req.path);
                ready(ApiResponse::from(ServerError::Unauthorized(e))).boxed_local()
            },
        })
    })
}

fn authenticate(issuer: &TokenIssuer, req: &ApiRequest) -> Result<JwtClaims, AuthError> {
    let token = req.bearer_token().ok_or(AuthError::MissingToken)?;
    issuer.validate(token)
}

/// Logs the method, route pattern, status and duration of every request.
pub fn log_requests() -> Middleware {
    Rc::new(|next: Handler| -> Handler {
        Rc::new(move |req: ApiRequest| {
            let next = Rc::clone(&next);
            async move {
                let start = Instant::now();
                let method = req.method.clone();
                let pattern = req.pattern.clone();
                let res = next(req).await;
                let elapsed = start.elapsed().as_millis();
                if res.status.is_server_error() {
                    warn!("🧭️ {method} {pattern} {} ({elapsed} ms)", res.status.as_u16());
                } else {
                    info!("🧭️ {method} {pattern} {} ({elapsed} ms)", res.status.as_u16());
                }
                res
            }
            .boxed_local()
        })
    })
}
