//! The `Interceptor` trait: the unit of extension for all three tracks
//! (§3, §4.1). Default hook bodies simply call `next`, matching the "pass
//! through untouched" behaviour an interceptor gets for free by only
//! overriding the hooks it cares about.

use async_trait::async_trait;

use crate::types::{PipelineError, RequestOptions, Response};

use super::handler::{ErrorHandler, RequestHandler, ResponseHandler};

#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn on_request(&self, options: RequestOptions, handler: RequestHandler) {
        handler.next(options);
    }

    async fn on_response(&self, response: Response, handler: ResponseHandler) {
        handler.next(response);
    }

    async fn on_error(&self, error: PipelineError, handler: ErrorHandler) {
        handler.next(error);
    }

    /// A human-readable label used in diagnostics (§6). Defaults to the
    /// type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
