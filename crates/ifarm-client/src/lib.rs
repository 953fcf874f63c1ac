//! HTTP client for the iFarm admin backend.
//!
//! Layers, bottom to top:
//! - [`transport`]: the wire seam ([`Transport`]) with the reqwest-backed
//!   production implementation.
//! - [`envelope`]: the `{code, message, data}` response envelope.
//! - [`http`]: [`ApiClient`], the single request pipeline with envelope
//!   unwrapping, failure classification, and single-shot 401 replay.
//! - [`session`]: [`Session`], the authenticated identity and the
//!   login/refresh/logout/profile operations.
//! - [`guard`]: the per-navigation route guard.
//! - [`api`]: request descriptor builders for every backend endpoint.
//!
//! User-visible side effects (notices, redirects) go through the traits in
//! [`notify`]; [`testing`] provides recording doubles for all seams.

pub mod api;
pub mod envelope;
pub mod guard;
pub mod http;
pub mod notify;
pub mod request;
pub mod session;
pub mod testing;
pub mod transport;

pub use envelope::Envelope;
pub use guard::{NavDecision, RouteLocation, RouteMeta, before_each, on_route_error, page_title};
pub use http::ApiClient;
pub use notify::{Navigator, Notifier, Redirect, TracingNavigator, TracingNotifier};
pub use request::{Method, RequestDescriptor};
pub use session::Session;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
