//! `Client`/`ClientBuilder` plumbing (§6): the built-in content-type
//! interceptor's diagnostic reaches a configured log sink, and a relative
//! URL resolves against a configured base URL before dispatch.

mod support;

use std::sync::{Arc, Mutex};

use relay_http::{Client, InterceptorFn, RequestBody, RequestOptions};
use support::MockTransport;

#[tokio::test]
async fn unsupported_body_shape_is_forwarded_to_the_configured_log_sink() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let captured_for_sink = captured.clone();

    let client = Client::builder()
        .without_default_interceptors()
        .with_transport(Arc::new(MockTransport::ok()))
        .with_log_sink(Arc::new(move |message: &str| {
            captured_for_sink.lock().unwrap().push(message.to_string());
        }))
        .build();

    let options = RequestOptions::post("/things").with_body(RequestBody::Json(serde_json::json!(42)));
    client.dispatch(options, None).await.expect("dispatch succeeds");

    let messages = captured.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("does not imply a content-type"));
}

#[tokio::test]
async fn base_url_resolves_relative_request_urls() {
    let captured = Arc::new(Mutex::new(None));
    let captured_for_hook = captured.clone();

    let client = Client::builder()
        .without_default_interceptors()
        .with_base_url("https://api.example.com")
        .with_transport(Arc::new(MockTransport::ok()))
        .build();
    client.push_interceptor(Arc::new(InterceptorFn::new().on_request(move |options, handler| {
        let captured_for_hook = captured_for_hook.clone();
        async move {
            *captured_for_hook.lock().unwrap() = Some(options.url.clone());
            handler.next(options);
        }
    })));

    client
        .dispatch(RequestOptions::get("/v1/ping"), None)
        .await
        .expect("dispatch succeeds");

    assert_eq!(captured.lock().unwrap().as_deref(), Some("https://api.example.com/v1/ping"));
}
