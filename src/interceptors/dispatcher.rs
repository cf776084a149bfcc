//! The dispatcher: the engine that walks the three tracks for one request
//! against a snapshotted interceptor list and an external transport
//! (§4.3, §4.4).
//!
//! When cancellation fires mid-track, the rewritten `cancelled` error
//! preserves whatever the just-resolved handler produced as its prior
//! cause (`ErrorCause::PriorRequest`/`PriorResponse`/`PriorError`), per
//! §4.7's "preserving interceptor-produced payload as the prior cause".
//! There is no prior payload to preserve when cancellation is observed
//! before any interceptor has advanced, or while the transport itself is
//! in flight (nothing downstream of the transport has produced a payload
//! yet either) — those two cases still construct a bare `cancelled` error.

use std::sync::Arc;

use crate::metrics::{keys, Metrics, NoopMetrics};
use crate::transport::Transport;
use crate::types::error::{ErrorCause, ErrorKind};
use crate::types::{PipelineError, RequestOptions, Response};

use super::cancellation::CancellationToken;
use super::envelope::{ErrorVerdict, RequestVerdict, ResponseVerdict};
use super::handler::{ErrorHandler, RequestHandler, ResponseHandler};
use super::interceptor::Interceptor;
use super::list::InterceptorList;

enum RequestOutcome {
    ToTransport(RequestOptions),
    Success(Response),
    Failure(PipelineError),
    EnterResponse(usize, Response),
    EnterError(usize, PipelineError),
}

enum ResponseOutcome {
    Success(Response),
    Failure(PipelineError),
    EnterError(usize, PipelineError),
}

fn cancellation_fired(cancellation: Option<&CancellationToken>) -> bool {
    cancellation.map(|t| t.is_cancelled()).unwrap_or(false)
}

/// Drives one request through the request, response, and error tracks.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    metrics: Arc<dyn Metrics>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, metrics: Arc::new(NoopMetrics) }
    }

    /// Same as [`new`](Self::new), but reporting dispatch counts, duration,
    /// and success/failure through `metrics` instead of the no-op default.
    pub fn with_metrics(transport: Arc<dyn Transport>, metrics: Arc<dyn Metrics>) -> Self {
        Self { transport, metrics }
    }

    pub async fn dispatch(
        &self,
        list: &InterceptorList,
        options: RequestOptions,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, PipelineError> {
        self.metrics.incr_counter(&keys::requests("pipeline.dispatch"), 1).await;
        let timer = self.metrics.start_timer(&keys::request_duration_ms("pipeline.dispatch")).await;

        let outcome = self.dispatch_inner(list, options, cancellation).await;

        if let Some(t) = timer {
            t.stop();
        }
        self.metrics
            .record_success(&keys::success("pipeline.dispatch"), outcome.is_ok())
            .await;
        outcome
    }

    async fn dispatch_inner(
        &self,
        list: &InterceptorList,
        options: RequestOptions,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, PipelineError> {
        let snapshot: Vec<Arc<dyn Interceptor>> = list.iter().cloned().collect();
        let context = Arc::new(options.clone());
        let cancellation = cancellation.as_ref();

        if cancellation_fired(cancellation) {
            let err = PipelineError::cancelled(context.clone(), None);
            return self.run_error_phase(&snapshot, 0, err, &context).await;
        }

        let outcome = self
            .run_request_phase(&snapshot, 0, options, &context, cancellation)
            .await;

        let (response_start, response, error_start, error) = match outcome {
            RequestOutcome::Success(r) => return Ok(r),
            RequestOutcome::Failure(e) => return Err(e),
            RequestOutcome::EnterResponse(idx, r) => (Some(idx), Some(r), None, None),
            RequestOutcome::EnterError(idx, e) => (None, None, Some(idx), Some(e)),
            RequestOutcome::ToTransport(opts) => {
                if cancellation_fired(cancellation) {
                    let cause = ErrorCause::PriorRequest(opts);
                    let err = PipelineError::cancelled(context.clone(), Some(cause));
                    (None, None, Some(0), Some(err))
                } else {
                    match self.call_transport(&opts, &context, cancellation).await {
                        Ok(r) => (Some(0), Some(r), None, None),
                        Err(e) => (None, None, Some(0), Some(e)),
                    }
                }
            }
        };

        if let (Some(idx), Some(r)) = (response_start, response) {
            match self
                .run_response_phase(&snapshot, idx, r, &context, cancellation)
                .await
            {
                ResponseOutcome::Success(r) => Ok(r),
                ResponseOutcome::Failure(e) => Err(e),
                ResponseOutcome::EnterError(idx, e) => {
                    self.run_error_phase(&snapshot, idx, e, &context).await
                }
            }
        } else {
            let idx = error_start.unwrap();
            let err = error.unwrap();
            self.run_error_phase(&snapshot, idx, err, &context).await
        }
    }

    async fn call_transport(
        &self,
        options: &RequestOptions,
        context: &Arc<RequestOptions>,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Response, PipelineError> {
        match cancellation {
            Some(token) => {
                tokio::select! {
                    result = self.transport.send(options) => {
                        result.map_err(|e| PipelineError::from_transport(context.clone(), e))
                    }
                    _ = token.cancelled() => {
                        Err(PipelineError::new(context.clone(), ErrorKind::Cancelled)
                            .with_message("request cancelled while transport was in flight"))
                    }
                }
            }
            None => self
                .transport
                .send(options)
                .await
                .map_err(|e| PipelineError::from_transport(context.clone(), e)),
        }
    }

    async fn run_request_phase(
        &self,
        list: &[Arc<dyn Interceptor>],
        start: usize,
        mut options: RequestOptions,
        context: &Arc<RequestOptions>,
        cancellation: Option<&CancellationToken>,
    ) -> RequestOutcome {
        let mut index = start;
        while index < list.len() {
            let interceptor = list[index].clone();
            let (handler, ticket) = RequestHandler::new(context.clone());
            interceptor.on_request(options, handler).await;

            let verdict = match ticket.finish() {
                Ok(v) => v,
                Err(e) => return RequestOutcome::EnterError(0, e),
            };

            if cancellation_fired(cancellation) {
                let cause = match verdict {
                    RequestVerdict::Next(opts) => ErrorCause::PriorRequest(opts),
                    RequestVerdict::Resolve { response, .. } => ErrorCause::PriorResponse(response),
                    RequestVerdict::Reject { error, .. } => ErrorCause::PriorError(Box::new(error)),
                };
                let err = PipelineError::cancelled(context.clone(), Some(cause));
                return RequestOutcome::EnterError(0, err);
            }

            match verdict {
                RequestVerdict::Next(opts) => {
                    options = opts;
                    index += 1;
                }
                RequestVerdict::Resolve { response, call_following } => {
                    return if call_following {
                        RequestOutcome::EnterResponse(0, response)
                    } else {
                        RequestOutcome::Success(response)
                    };
                }
                RequestVerdict::Reject { error, call_following } => {
                    return if call_following {
                        RequestOutcome::EnterError(0, error)
                    } else {
                        RequestOutcome::Failure(error)
                    };
                }
            }
        }
        RequestOutcome::ToTransport(options)
    }

    async fn run_response_phase(
        &self,
        list: &[Arc<dyn Interceptor>],
        start: usize,
        mut response: Response,
        context: &Arc<RequestOptions>,
        cancellation: Option<&CancellationToken>,
    ) -> ResponseOutcome {
        let mut index = start;
        while index < list.len() {
            let interceptor = list[index].clone();
            let (handler, ticket) = ResponseHandler::new(context.clone());
            interceptor.on_response(response, handler).await;

            let verdict = match ticket.finish() {
                Ok(v) => v,
                Err(e) => return ResponseOutcome::EnterError(0, e),
            };

            if cancellation_fired(cancellation) {
                let cause = match verdict {
                    ResponseVerdict::Next(r) => ErrorCause::PriorResponse(r),
                    ResponseVerdict::Resolve(r) => ErrorCause::PriorResponse(r),
                    ResponseVerdict::Reject { error, .. } => ErrorCause::PriorError(Box::new(error)),
                };
                let err = PipelineError::cancelled(context.clone(), Some(cause));
                return ResponseOutcome::EnterError(0, err);
            }

            match verdict {
                ResponseVerdict::Next(r) => {
                    response = r;
                    index += 1;
                }
                ResponseVerdict::Resolve(r) => return ResponseOutcome::Success(r),
                ResponseVerdict::Reject { error, call_following } => {
                    return if call_following {
                        ResponseOutcome::EnterError(0, error)
                    } else {
                        ResponseOutcome::Failure(error)
                    };
                }
            }
        }
        ResponseOutcome::Success(response)
    }

    async fn run_error_phase(
        &self,
        list: &[Arc<dyn Interceptor>],
        start: usize,
        mut error: PipelineError,
        context: &Arc<RequestOptions>,
    ) -> Result<Response, PipelineError> {
        let mut index = start;
        while index < list.len() {
            let interceptor = list[index].clone();
            let (handler, ticket) = ErrorHandler::new(context.clone());
            interceptor.on_error(error, handler).await;

            let verdict = match ticket.finish() {
                Ok(v) => v,
                Err(e) => return Err(e),
            };

            match verdict {
                ErrorVerdict::Next(e) => {
                    error = e;
                    index += 1;
                }
                ErrorVerdict::Resolve(r) => return Ok(r),
                ErrorVerdict::Reject(e) => return Err(e),
            }
        }
        Err(error)
    }
}
