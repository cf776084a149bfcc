//! The state envelope: the tagged (payload, verdict) pair that travels
//! between interceptor invocations (§3, §9). Each track gets its own enum
//! so the payload stays monomorphic and a mis-typed envelope is a compile
//! error rather than a runtime check.

use crate::types::{PipelineError, RequestOptions, Response};

/// The request track's envelope. `resolve`/`reject` embed `call_following`
/// directly in the variant rather than as a separate field, since the two
/// booleans select genuinely different dispatcher actions (§4.3).
#[derive(Debug)]
pub enum RequestVerdict {
    Next(RequestOptions),
    Resolve { response: Response, call_following: bool },
    Reject { error: PipelineError, call_following: bool },
}

#[derive(Debug)]
pub enum ResponseVerdict {
    Next(Response),
    /// Terminal success; no `call_following` — there is nothing left to
    /// "follow into" from the last track.
    Resolve(Response),
    Reject { error: PipelineError, call_following: bool },
}

#[derive(Debug)]
pub enum ErrorVerdict {
    Next(PipelineError),
    /// Recovery: deliver success, no re-entry into the response track
    /// (§4.3 — the recovery is terminal).
    Resolve(Response),
    /// Terminate with this error; no further error-track processing.
    Reject(PipelineError),
}
