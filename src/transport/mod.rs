pub mod error;
pub mod http;

pub use error::TransportError;
pub use http::{HttpTransport, HttpTransportConfig, Transport};
