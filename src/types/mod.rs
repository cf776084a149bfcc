//! Core data types flowing through the interceptor pipeline: request
//! options, responses, and the pipeline error taxonomy.

pub mod error;
pub mod headers;
pub mod request;
pub mod response;

pub use error::{ErrorKind, PipelineError};
pub use headers::{HeaderValue, Headers};
pub use request::{FormData, FormPart, RequestBody, RequestOptions};
pub use response::Response;
