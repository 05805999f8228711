use std::{future::Future, rc::Rc};

use actix_web::http::Method;
use futures::{future::LocalBoxFuture, FutureExt};
use log::*;

use crate::dispatch::{ApiRequest, ApiResponse};

/// A request handler. Handlers always produce a response; errors are turned into error responses before they get here.
pub type Handler = Rc<dyn Fn(ApiRequest) -> LocalBoxFuture<'static, ApiResponse>>;

/// A handler transformer. Middleware can inspect or modify the request, answer it without calling the wrapped
/// handler, or post-process the response.
pub type Middleware = Rc<dyn Fn(Handler) -> Handler>;

/// Wraps an async function as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(ApiRequest) -> Fut + 'static,
    Fut: Future<Output = ApiResponse> + 'static,
{
    Rc::new(move |req| f(req).boxed_local())
}

/// The result of routing a request.
#[derive(Debug)]
pub enum Dispatch {
    Matched(ApiResponse),
    /// No route matched. No handler or middleware ran.
    NotFound,
}

struct Route {
    pattern: String,
    /// `None` matches any method
    method: Option<Method>,
    /// The route handler, already wrapped in the route's own middleware
    handler: Handler,
}

/// An ordered route table.
///
/// A route matches when its pattern is equal to the request's pattern and its method is equal to the request's method
/// (or the route has no method). Routes are tried in the order they were added and the first match wins.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    global: Vec<Middleware>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds middleware that wraps every route, including routes added before this call.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.global.push(middleware);
        self
    }

    pub fn add<S: Into<String>>(
        &mut self,
        pattern: S,
        method: Option<Method>,
        handler: Handler,
        middleware: Vec<Middleware>,
    ) -> &mut Self {
        let pattern = pattern.into();
        trace!("🧭️ Route added: {} {pattern}", method.as_ref().map(Method::as_str).unwrap_or("*"));
        let handler = compose(handler, &middleware);
        self.routes.push(Route { pattern, method, handler });
        self
    }

    /// The distinct route patterns, in the order they were first added.
    pub fn patterns(&self) -> Vec<&str> {
        let mut patterns = Vec::new();
        for route in &self.routes {
            if !patterns.contains(&route.pattern.as_str()) {
                patterns.push(route.pattern.as_str());
            }
        }
        patterns
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn find(&self, pattern: &str, method: &Method) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.pattern == pattern && r.method.as_ref().map(|m| m == method).unwrap_or(true))
    }

    pub async fn dispatch(&self, req: ApiRequest) -> Dispatch {
        let Some(route) = self.find(&req.pattern, &req.method) else {
            debug!("🧭️ No route for {} {}", req.method, req.path);
            return Dispatch::NotFound;
        };
        let wrapped = compose(Rc::clone(&route.handler), &self.global);
        Dispatch::Matched(wrapped(req).await)
    }
}

/// Wraps `handler` so that the first middleware in the list is the outermost layer.
fn compose(handler: Handler, middleware: &[Middleware]) -> Handler {
    middleware.iter().rev().fold(handler, |inner, m| m(inner))
}
