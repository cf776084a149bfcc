//! Closure-backed interceptors for quick ad-hoc pipelines in tests and
//! examples (§4.8). Each hook defaults to `handler.next(payload)` when the
//! corresponding closure is absent.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{PipelineError, RequestOptions, Response};

use super::handler::{ErrorHandler, RequestHandler, ResponseHandler};
use super::interceptor::Interceptor;

type RequestFn =
    Arc<dyn Fn(RequestOptions, RequestHandler) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;
type ResponseFn =
    Arc<dyn Fn(Response, ResponseHandler) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;
type ErrorFn =
    Arc<dyn Fn(PipelineError, ErrorHandler) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// An interceptor built from up to three closures, one per hook.
#[derive(Clone, Default)]
pub struct InterceptorFn {
    on_request: Option<RequestFn>,
    on_response: Option<ResponseFn>,
    on_error: Option<ErrorFn>,
    name: Option<Arc<str>>,
}

impl InterceptorFn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_request<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(RequestOptions, RequestHandler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_request = Some(Arc::new(move |options, handler| Box::pin(f(options, handler))));
        self
    }

    pub fn on_response<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Response, ResponseHandler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_response = Some(Arc::new(move |response, handler| Box::pin(f(response, handler))));
        self
    }

    pub fn on_error<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(PipelineError, ErrorHandler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_error = Some(Arc::new(move |error, handler| Box::pin(f(error, handler))));
        self
    }
}

#[async_trait]
impl Interceptor for InterceptorFn {
    async fn on_request(&self, options: RequestOptions, handler: RequestHandler) {
        match &self.on_request {
            Some(f) => f(options, handler).await,
            None => handler.next(options),
        }
    }

    async fn on_response(&self, response: Response, handler: ResponseHandler) {
        match &self.on_response {
            Some(f) => f(response, handler).await,
            None => handler.next(response),
        }
    }

    async fn on_error(&self, error: PipelineError, handler: ErrorHandler) {
        match &self.on_error {
            Some(f) => f(error, handler).await,
            None => handler.next(error),
        }
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("interceptor_fn")
    }
}
