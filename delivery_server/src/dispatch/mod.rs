//! The dispatch layer.
//!
//! actix-web hosts the server, but routing decisions, authentication and request logging happen here, in a small
//! router of our own. A [`Router`] is an ordered route table. Each route pairs a path pattern and an optional method
//! with a [`Handler`] and its own [`Middleware`]. Global middleware wraps every route.
//!
//! Middleware is a plain function from handler to handler, so composing it is just function composition. The first
//! middleware in a list is the outermost layer: it sees the request first and the response last. Global middleware
//! always sits outside per-route middleware.
mod middleware;
mod request;
mod response;
mod router;

pub use middleware::{log_requests, require_bearer};
pub use request::{ApiRequest, RequestContext};
pub use response::ApiResponse;
pub use router::{handler, Dispatch, Handler, Middleware, Router};
