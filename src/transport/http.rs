//! HTTP transport: the external collaborator the dispatcher hands
//! request options to and gets a response or error back from (§6 of the
//! pipeline spec). Encapsulates all `reqwest` detail so the interceptor
//! pipeline never touches the wire directly.

use super::error::TransportError;
use crate::types::request::{FormPart, RequestBody};
use crate::types::{Headers, RequestOptions, Response};
use async_trait::async_trait;
use reqwest::{multipart, Client, Proxy};
use serde_json::Value;
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Object-safe transport abstraction. Consumes request options, yields a
/// response or a transport error; never interprets the error taxonomy
/// (§7) — that normalization is the dispatcher's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, options: &RequestOptions) -> Result<Response, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            proxy: env::var("RELAY_HTTP_PROXY_URL").ok(),
        }
    }
}

/// `reqwest`-based transport implementation.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_config(HttpTransportConfig::default())
    }

    pub fn with_config(config: HttpTransportConfig) -> Self {
        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(url) = config.proxy {
            match Proxy::all(&url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(_) => {
                    tracing::warn!(proxy = %url, "ignoring invalid proxy URL");
                }
            }
        }
        let client = builder.build().expect("failed to build reqwest client");
        Self { client }
    }

    fn build_request(&self, options: &RequestOptions) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(options.method.clone(), &options.url);

        for (name, value) in options.headers.iter() {
            for v in value.values() {
                builder = builder.header(name, v);
            }
        }
        if let Some(ct) = &options.content_type {
            builder = builder.header("Content-Type", ct);
        }
        if let Some(t) = options.send_timeout {
            builder = builder.timeout(t);
        }

        builder = match &options.body {
            None => builder,
            Some(RequestBody::Json(v)) => builder.json(v),
            Some(RequestBody::Text(s)) => builder.body(s.clone()),
            Some(RequestBody::Bytes(b)) => builder.body(b.clone()),
            Some(RequestBody::Form(form)) => {
                let mut multipart_form = multipart::Form::new();
                for (name, part) in &form.fields {
                    multipart_form = match part {
                        FormPart::Text(text) => multipart_form.text(name.clone(), text.clone()),
                        FormPart::File { filename, mime, bytes } => {
                            let part = multipart::Part::bytes(bytes.clone())
                                .file_name(filename.clone())
                                .mime_str(mime)
                                .unwrap_or_else(|_| multipart::Part::bytes(bytes.clone()));
                            multipart_form.part(name.clone(), part)
                        }
                    };
                }
                builder.multipart(multipart_form)
            }
        };

        builder
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, options: &RequestOptions) -> Result<Response, TransportError> {
        let request = self.build_request(options);
        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else if e.is_connect() {
                TransportError::ConnectTimeout(e.to_string())
            } else {
                TransportError::HttpError(e)
            }
        })?;

        let status = resp.status().as_u16();
        let status_text = resp
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string();

        let mut headers = Headers::new();
        for (name, value) in resp.headers().iter() {
            if let Ok(v) = value.to_str() {
                headers.set(name.as_str().to_string(), v.to_string());
            }
        }

        let bytes = resp.bytes().await.map_err(TransportError::HttpError)?;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        if !(200..300).contains(&status) {
            let message = body
                .as_object()
                .and_then(|m| m.get("message"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| status_text.clone());
            return Err(TransportError::from_status(status, message));
        }

        let request_ref = Arc::new(options.clone());
        Ok(Response::new(request_ref, status, body)
            .with_status_text(status_text)
            .with_headers(headers))
    }
}
