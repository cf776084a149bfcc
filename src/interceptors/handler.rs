//! Single-shot handlers. Every interceptor hook is handed exactly one of
//! these; calling a handler operation records the verdict, and a second
//! call on the same handler is an invariant violation (§4.2, §8).
//!
//! The pipeline runs one hook invocation to completion (`.await`ed in
//! full) before inspecting what the handler recorded, so a plain
//! `Mutex`-guarded slot is enough — there is no need for a channel between
//! the hook and the dispatcher, since both run on the same task.

use crate::types::{PipelineError, RequestOptions, Response};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::envelope::{ErrorVerdict, RequestVerdict, ResponseVerdict};

enum Outcome<V> {
    NotCalled,
    Resolved(V),
    Violated(PipelineError),
}

struct Core<V> {
    used: AtomicBool,
    outcome: Mutex<Outcome<V>>,
    context: Arc<RequestOptions>,
}

impl<V> Core<V> {
    fn new(context: Arc<RequestOptions>) -> Self {
        Self {
            used: AtomicBool::new(false),
            outcome: Mutex::new(Outcome::NotCalled),
            context,
        }
    }

    /// Records `verdict` if this is the first call; otherwise records the
    /// stability-critical invariant violation and drops `verdict`.
    fn record(&self, verdict: V) {
        if self.used.swap(true, Ordering::SeqCst) {
            *self.outcome.lock().unwrap() =
                Outcome::Violated(PipelineError::invariant_violation(self.context.clone()));
        } else {
            *self.outcome.lock().unwrap() = Outcome::Resolved(verdict);
        }
    }

    /// Consumes the core, turning whatever was recorded into a verdict or
    /// an error. Called once per hook invocation after the hook future has
    /// been driven to completion.
    fn finish(self, never_called: PipelineError) -> Result<V, PipelineError> {
        match self.outcome.into_inner().unwrap() {
            Outcome::Resolved(v) => Ok(v),
            Outcome::Violated(e) => Err(e),
            Outcome::NotCalled => Err(never_called),
        }
    }
}

fn never_called_error(context: &Arc<RequestOptions>) -> PipelineError {
    PipelineError::new(context.clone(), crate::types::error::ErrorKind::Unknown)
        .with_message("interceptor hook returned without invoking its handler")
}

/// Handed to `Interceptor::on_request`. Exactly one of `next`, `resolve`,
/// or `reject` must be called before the hook returns.
pub struct RequestHandler {
    core: Arc<Core<RequestVerdict>>,
}

impl RequestHandler {
    pub(crate) fn new(context: Arc<RequestOptions>) -> (Self, RequestHandlerTicket) {
        let core = Arc::new(Core::new(context));
        (Self { core: core.clone() }, RequestHandlerTicket { core })
    }

    /// Hand the (possibly mutated) request options to the next interceptor
    /// in the list.
    pub fn next(&self, options: RequestOptions) {
        self.core.record(RequestVerdict::Next(options));
    }

    /// Short-circuit with a synthesized response, skipping the rest of the
    /// request track.
    pub fn resolve(&self, response: Response, call_following: bool) {
        self.core
            .record(RequestVerdict::Resolve { response, call_following });
    }

    /// Short-circuit with an error, diverting into the error track.
    pub fn reject(&self, error: PipelineError, call_following: bool) {
        self.core
            .record(RequestVerdict::Reject { error, call_following });
    }
}

/// Handed to `Interceptor::on_response`.
pub struct ResponseHandler {
    core: Arc<Core<ResponseVerdict>>,
}

impl ResponseHandler {
    pub(crate) fn new(context: Arc<RequestOptions>) -> (Self, ResponseHandlerTicket) {
        let core = Arc::new(Core::new(context));
        (Self { core: core.clone() }, ResponseHandlerTicket { core })
    }

    pub fn next(&self, response: Response) {
        self.core.record(ResponseVerdict::Next(response));
    }

    pub fn resolve(&self, response: Response) {
        self.core.record(ResponseVerdict::Resolve(response));
    }

    pub fn reject(&self, error: PipelineError, call_following: bool) {
        self.core
            .record(ResponseVerdict::Reject { error, call_following });
    }
}

/// Handed to `Interceptor::on_error`.
pub struct ErrorHandler {
    core: Arc<Core<ErrorVerdict>>,
}

impl ErrorHandler {
    pub(crate) fn new(context: Arc<RequestOptions>) -> (Self, ErrorHandlerTicket) {
        let core = Arc::new(Core::new(context));
        (Self { core: core.clone() }, ErrorHandlerTicket { core })
    }

    pub fn next(&self, error: PipelineError) {
        self.core.record(ErrorVerdict::Next(error));
    }

    /// Recover with a response, terminating the error track.
    pub fn resolve(&self, response: Response) {
        self.core.record(ErrorVerdict::Resolve(response));
    }

    pub fn reject(&self, error: PipelineError) {
        self.core.record(ErrorVerdict::Reject(error));
    }
}

/// The dispatcher-side counterpart of a handler: retained while the hook
/// future runs, then consumed to read back whatever the handler recorded.
/// Kept as a distinct type (rather than exposing `Core` directly) so the
/// public `*Handler` types can stay free of dispatcher-only methods.
macro_rules! ticket {
    ($ticket:ident, $verdict:ty) => {
        pub(crate) struct $ticket {
            core: Arc<Core<$verdict>>,
        }

        impl $ticket {
            pub(crate) fn finish(self) -> Result<$verdict, PipelineError> {
                let context = self.core.context.clone();
                match Arc::try_unwrap(self.core) {
                    Ok(core) => core.finish(never_called_error(&context)),
                    // Another clone of the handler is still alive (e.g. the
                    // interceptor squirreled it away) — fall back to reading
                    // through the shared reference instead of unwrapping.
                    Err(core) => match &*core.outcome.lock().unwrap() {
                        Outcome::NotCalled => Err(never_called_error(&context)),
                        Outcome::Violated(e) => Err(e.clone()),
                        Outcome::Resolved(_) => {
                            let mut guard = core.outcome.lock().unwrap();
                            match std::mem::replace(&mut *guard, Outcome::NotCalled) {
                                Outcome::Resolved(v) => Ok(v),
                                other => {
                                    *guard = other;
                                    Err(never_called_error(&context))
                                }
                            }
                        }
                    },
                }
            }
        }
    };
}

ticket!(RequestHandlerTicket, RequestVerdict);
ticket!(ResponseHandlerTicket, ResponseVerdict);
ticket!(ErrorHandlerTicket, ErrorVerdict);
