//! Error handling module: the pipeline's unified error type and the
//! taxonomy used to classify it for retry/observability decisions.
//!
//! `PipelineError` is the primary error type threaded through the error
//! track (see `crate::interceptors::dispatcher`), with the same
//! severity/error-code/context conveniences the rest of this codebase's
//! error types offer.

use crate::transport::TransportError;
use crate::types::request::RequestOptions;
use crate::types::response::Response;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Transient errors - safe to retry
    Transient,
    /// Client-side issues - fix the request
    Client,
    /// Server/peer-side issues
    Server,
    /// Fatal issues - do not retry automatically
    Fatal,
}

/// The error kind taxonomy. Every error that enters the error track carries
/// exactly one of these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("connection timeout")]
    ConnectionTimeout,
    #[error("send timeout")]
    SendTimeout,
    #[error("receive timeout")]
    ReceiveTimeout,
    #[error("bad certificate")]
    BadCertificate,
    #[error("bad response")]
    BadResponse,
    #[error("cancelled")]
    Cancelled,
    #[error("connection error")]
    ConnectionError,
    #[error("unknown")]
    Unknown,
}

impl ErrorKind {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorKind::ConnectionTimeout
            | ErrorKind::SendTimeout
            | ErrorKind::ReceiveTimeout
            | ErrorKind::ConnectionError => ErrorSeverity::Transient,
            ErrorKind::BadResponse => ErrorSeverity::Server,
            ErrorKind::BadCertificate => ErrorSeverity::Fatal,
            ErrorKind::Cancelled => ErrorSeverity::Client,
            ErrorKind::Unknown => ErrorSeverity::Fatal,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::ConnectionTimeout => "CONNECTION_TIMEOUT",
            ErrorKind::SendTimeout => "SEND_TIMEOUT",
            ErrorKind::ReceiveTimeout => "RECEIVE_TIMEOUT",
            ErrorKind::BadCertificate => "BAD_CERTIFICATE",
            ErrorKind::BadResponse => "BAD_RESPONSE",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::ConnectionError => "CONNECTION_ERROR",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

/// A marker cause attached to invariant violations (e.g. a handler called
/// twice). Kept distinct from a user-supplied cause so interceptors can
/// detect "the pipeline itself misbehaved" versus "the transport/peer
/// misbehaved".
#[derive(Debug, Clone, PartialEq)]
pub struct InvariantViolation {
    pub message: String,
}

/// Any payload an interceptor or the transport attaches as the cause of an
/// error. Left untyped (like the request/response bodies) since the
/// pipeline never interprets it.
#[derive(Debug, Clone)]
pub enum ErrorCause {
    Invariant(InvariantViolation),
    Transport(Arc<TransportError>),
    Value(serde_json::Value),
    /// The request options an interceptor handed to its handler, preserved
    /// as the prior cause when a cancellation fired after that handler
    /// resolved and overrode the verdict (§4.7).
    PriorRequest(RequestOptions),
    /// The response an interceptor handed to its handler, preserved as the
    /// prior cause under the same circumstance.
    PriorResponse(Response),
    /// The error an interceptor was already rejecting with when
    /// cancellation overrode it.
    PriorError(Box<PipelineError>),
}

impl PartialEq for ErrorCause {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorCause::Invariant(a), ErrorCause::Invariant(b)) => a == b,
            (ErrorCause::Transport(a), ErrorCause::Transport(b)) => a.to_string() == b.to_string(),
            (ErrorCause::Value(a), ErrorCause::Value(b)) => a == b,
            (ErrorCause::PriorRequest(a), ErrorCause::PriorRequest(b)) => a == b,
            (ErrorCause::PriorResponse(a), ErrorCause::PriorResponse(b)) => a == b,
            (ErrorCause::PriorError(a), ErrorCause::PriorError(b)) => a == b,
            _ => false,
        }
    }
}

/// The stability-critical message emitted when a handler is invoked more
/// than once. Observed verbatim by tests; do not reword.
pub const DUPLICATE_HANDLER_MESSAGE: &str =
    "The `handler` has already been called, make sure each handler gets called only once.";

/// The error type that flows through the error track. Immutable once
/// constructed except via `with_context`, which returns a new instance.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.display())]
pub struct PipelineError {
    pub request: Arc<RequestOptions>,
    pub response: Option<Response>,
    pub kind: ErrorKind,
    pub cause: Option<ErrorCause>,
    pub message: Option<String>,
}

impl PipelineError {
    pub fn new(request: Arc<RequestOptions>, kind: ErrorKind) -> Self {
        Self {
            request,
            response: None,
            kind,
            cause: None,
            message: None,
        }
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_cause(mut self, cause: ErrorCause) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach contextual information, returning a new instance (the error
    /// is otherwise immutable).
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        let message = match self.message {
            Some(m) if !m.is_empty() => format!("{ctx}: {m}"),
            _ => ctx,
        };
        Self {
            message: Some(message),
            ..self
        }
    }

    /// Build the invariant-violation error surfaced when a handler is
    /// invoked twice.
    pub fn invariant_violation(request: Arc<RequestOptions>) -> Self {
        Self::new(request, ErrorKind::Unknown)
            .with_cause(ErrorCause::Invariant(InvariantViolation {
                message: DUPLICATE_HANDLER_MESSAGE.to_string(),
            }))
            .with_message(DUPLICATE_HANDLER_MESSAGE)
    }

    pub fn from_transport(request: Arc<RequestOptions>, err: TransportError) -> Self {
        let kind = match &err {
            TransportError::Timeout(_) => ErrorKind::ReceiveTimeout,
            TransportError::ConnectTimeout(_) => ErrorKind::ConnectionTimeout,
            TransportError::BadCertificate(_) => ErrorKind::BadCertificate,
            TransportError::ServerError { .. } | TransportError::ClientError { .. } => {
                ErrorKind::BadResponse
            }
            TransportError::RateLimitExceeded => ErrorKind::BadResponse,
            TransportError::AuthenticationError(_) => ErrorKind::BadResponse,
            TransportError::InvalidUrl(_) | TransportError::HttpError(_) => {
                ErrorKind::ConnectionError
            }
            TransportError::JsonError(_) => ErrorKind::Unknown,
        };
        Self::new(request, kind).with_cause(ErrorCause::Transport(Arc::new(err)))
    }

    pub fn cancelled(request: Arc<RequestOptions>, prior_cause: Option<ErrorCause>) -> Self {
        let mut err = Self::new(request, ErrorKind::Cancelled).with_message("request cancelled");
        if let Some(cause) = prior_cause {
            err = err.with_cause(cause);
        }
        err
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.kind.severity()
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn error_code_with_severity(&self) -> String {
        format!("{:?}_{}", self.severity(), self.error_code()).to_uppercase()
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.severity(), ErrorSeverity::Transient)
    }

    /// `true` if this error is itself an invariant violation (e.g. a
    /// duplicate handler call) rather than a transport/peer failure.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self.cause, Some(ErrorCause::Invariant(_)))
    }

    fn display(&self) -> String {
        match &self.message {
            Some(m) => format!("{}: {}", self.kind, m),
            None => self.kind.to_string(),
        }
    }
}
