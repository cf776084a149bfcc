//! The interceptor pipeline: the middleware substrate every outbound
//! request, inbound response, and raised error passes through on its way
//! between a [`Client`](crate::client::Client) and a [`Transport`].
//!
//! Five cooperating pieces, leaves-first:
//! - [`envelope`] — the tagged (payload, verdict) pair threaded between
//!   invocations of a single track.
//! - [`handler`] — the single-shot control object handed to each hook.
//! - [`interceptor`] — the `Interceptor` trait itself.
//! - [`list`] — the ordered, mutable `InterceptorList`.
//! - [`dispatcher`] — drives one request through all three tracks.
//!
//! Everything else in this module — [`content_type`]'s built-in, and
//! [`retry`], [`timeout`], [`breaker`], [`rate_limit`] — are example
//! interceptors: users of the pipeline, not part of it (§1).

pub mod breaker;
pub mod cancellation;
pub mod content_type;
pub mod default;
pub mod dispatcher;
pub mod envelope;
pub mod func;
pub mod handler;
pub mod interceptor;
pub mod list;
pub mod queue;
pub mod rate_limit;
pub mod retry;
pub mod timeout;

pub use breaker::CircuitBreakerInterceptor;
pub use cancellation::{CancellationHandle, CancellationToken};
pub use content_type::ContentTypeInterceptor;
pub use default::{default_interceptors, DefaultInterceptorsBuilder};
pub use dispatcher::Dispatcher;
pub use func::InterceptorFn;
pub use handler::{ErrorHandler, RequestHandler, ResponseHandler};
pub use interceptor::Interceptor;
pub use list::InterceptorList;
pub use queue::QueuedInterceptor;
pub use rate_limit::RateLimitInterceptor;
pub use retry::RetryInterceptor;
pub use timeout::TimeoutInterceptor;
