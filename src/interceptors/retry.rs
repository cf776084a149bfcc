//! Example retry interceptor (§1 lists retry policies as pipeline *users*,
//! not part of the pipeline itself). Lives on the error track: on a
//! retryable failure it re-sends the original request directly against the
//! transport (bypassing the rest of the pipeline, to avoid re-entering the
//! chain that produced the failure), backing off the same way
//! `HttpTransport::execute_with_retry` does elsewhere in this codebase —
//! `backoff::future::retry` driving a `backoff::ExponentialBackoff` — and
//! resolves the error track with whatever response it eventually gets.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backoff::{future::retry, Error as BackoffError, ExponentialBackoff};
use tracing::warn;

use crate::interceptors::handler::ErrorHandler;
use crate::interceptors::interceptor::Interceptor;
use crate::transport::Transport;
use crate::types::error::ErrorKind;
use crate::types::PipelineError;

pub struct RetryInterceptor {
    transport: Arc<dyn Transport>,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryInterceptor {
    pub fn new(
        transport: Arc<dyn Transport>,
        max_retries: u32,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        Self { transport, max_retries, base_delay, max_delay }
    }

    pub fn with_defaults(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, 3, Duration::from_secs(1), Duration::from_secs(10))
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.base_delay,
            max_interval: self.max_delay,
            max_elapsed_time: Some(self.max_delay * self.max_retries.max(1)),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Interceptor for RetryInterceptor {
    async fn on_error(&self, error: PipelineError, handler: ErrorHandler) {
        if !error.is_retryable() {
            handler.next(error);
            return;
        }

        let request = error.request.clone();
        let attempts = AtomicU32::new(0);
        let max_retries = self.max_retries;

        let outcome = retry(self.backoff(), || {
            let request = request.clone();
            async {
                let attempt = attempts.fetch_add(1, Ordering::Relaxed);
                if attempt >= max_retries {
                    return Err(BackoffError::permanent(
                        PipelineError::new(request.clone(), ErrorKind::Unknown)
                            .with_message("max retries exceeded"),
                    ));
                }
                warn!(attempt = attempt + 1, "retrying request after transient failure");
                match self.transport.send(request.as_ref()).await {
                    Ok(response) => Ok(response),
                    Err(transport_err) => {
                        let err = PipelineError::from_transport(request.clone(), transport_err)
                            .with_context(format!("retry attempt {} failed", attempt + 1));
                        if err.is_retryable() {
                            Err(BackoffError::transient(err))
                        } else {
                            Err(BackoffError::permanent(err))
                        }
                    }
                }
            }
        })
        .await;

        match outcome {
            Ok(response) => handler.resolve(response),
            Err(final_error) => handler.next(final_error),
        }
    }

    fn name(&self) -> &str {
        "retry"
    }
}
