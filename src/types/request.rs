//! The request-track payload: `RequestOptions` and the body shapes the
//! built-in content-type interceptor inspects (§4.6 of the pipeline spec).

use crate::types::headers::Headers;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File { filename: String, mime: String, bytes: Vec<u8> },
}

/// A form-data container body. The pipeline itself never encodes this on
/// the wire (multipart encoding is out of scope, §1); it exists so the
/// built-in content-type interceptor can recognize the shape and so a
/// transport implementation has something concrete to serialize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    pub fields: Vec<(String, FormPart)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FormPart::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push((
            name.into(),
            FormPart::File {
                filename: filename.into(),
                mime: mime.into(),
                bytes,
            },
        ));
        self
    }
}

/// The untyped request body. The built-in content-type interceptor (§4.6)
/// switches on this shape; everything else about the body is opaque to the
/// pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A form-data container → `multipart/form-data`.
    Form(FormData),
    /// A plain text value → `application/json` per the content-type
    /// mapping table (the pipeline does not second-guess this choice).
    Text(String),
    /// A JSON value. `Value::Object` (key-value mapping) and
    /// `Value::Array` of objects (ordered sequence of key-value mappings)
    /// both map to `application/json`; any other `Value` variant (number,
    /// bool, bare string, null, or an array of non-objects) is "any other
    /// shape" and leaves content-type unset.
    Json(Value),
    /// Raw bytes with no inferable shape — always "any other shape".
    Bytes(Vec<u8>),
}

impl RequestBody {
    /// `true` if this shape is one the built-in interceptor maps to
    /// `application/json`.
    pub fn is_json_like(&self) -> bool {
        match self {
            RequestBody::Text(_) => true,
            RequestBody::Json(Value::Object(_)) => true,
            RequestBody::Json(Value::Array(items)) => {
                !items.is_empty() && items.iter().all(|v| v.is_object())
            }
            _ => false,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, RequestBody::Form(_))
    }
}

/// The unit of work on the request track. Owned by the dispatcher from
/// request intake until a response or terminal error is delivered (§3);
/// interceptors mutate it in place while it travels the request track.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    pub body: Option<RequestBody>,
    pub content_type: Option<String>,
    pub connect_timeout: Option<Duration>,
    pub send_timeout: Option<Duration>,
    pub receive_timeout: Option<Duration>,
    /// Opaque interceptor-to-interceptor communication channel; never
    /// inspected by the dispatcher itself.
    pub extras: HashMap<String, Value>,
}

impl RequestOptions {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Headers::new(),
            body: None,
            content_type: None,
            connect_timeout: None,
            send_timeout: None,
            receive_timeout: None,
            extras: HashMap::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self.send_timeout = Some(timeout);
        self.receive_timeout = Some(timeout);
        self
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extras.insert(key.into(), value);
    }
}
