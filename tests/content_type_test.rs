//! The built-in content-type implication interceptor (§4.6): json-object,
//! json-array-of-objects, and form bodies get a header set; any other
//! shape, including a null body, does not.

mod support;

use std::sync::Arc;

use relay_http::{ContentTypeInterceptor, FormData, InterceptorList, RequestBody, RequestOptions};
use relay_http::interceptors::dispatcher::Dispatcher;
use support::MockTransport;

fn content_type(headers: &relay_http::Headers) -> Option<&str> {
    headers.get("content-type").and_then(|v| v.first())
}

async fn dispatched_headers(options: RequestOptions) -> relay_http::Headers {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport);
    let mut list = InterceptorList::empty();
    list.push(Arc::new(ContentTypeInterceptor::new()));
    // MockTransport echoes nothing useful about the request headers back,
    // so capture them via a follow-up interceptor instead.
    let captured = Arc::new(std::sync::Mutex::new(None));
    let captured_for_hook = captured.clone();
    list.push(Arc::new(
        relay_http::InterceptorFn::new().on_request(move |options, handler| {
            let captured_for_hook = captured_for_hook.clone();
            async move {
                *captured_for_hook.lock().unwrap() = Some(options.headers.clone());
                handler.next(options);
            }
        }),
    ));

    dispatcher.dispatch(&list, options, None).await.expect("dispatch succeeds");
    captured.lock().unwrap().take().expect("capture hook ran")
}

#[tokio::test]
async fn json_object_body_gets_application_json() {
    let options = RequestOptions::post("/things").with_body(RequestBody::Json(serde_json::json!({"a": 1})));
    let headers = dispatched_headers(options).await;
    assert_eq!(content_type(&headers), Some("application/json"));
}

#[tokio::test]
async fn json_array_of_objects_gets_application_json() {
    let options = RequestOptions::post("/things")
        .with_body(RequestBody::Json(serde_json::json!([{"a": 1}, {"b": 2}])));
    let headers = dispatched_headers(options).await;
    assert_eq!(content_type(&headers), Some("application/json"));
}

#[tokio::test]
async fn json_array_of_scalars_does_not_imply_content_type() {
    let options = RequestOptions::post("/things").with_body(RequestBody::Json(serde_json::json!([1, 2, 3])));
    let headers = dispatched_headers(options).await;
    assert_eq!(content_type(&headers), None);
}

#[tokio::test]
async fn form_body_gets_multipart() {
    let form = FormData::new().text("field", "value");
    let options = RequestOptions::post("/upload").with_body(RequestBody::Form(form));
    let headers = dispatched_headers(options).await;
    assert_eq!(content_type(&headers), Some("multipart/form-data"));
}

#[tokio::test]
async fn null_body_gets_no_content_type_at_all() {
    let options = RequestOptions::get("/ping");
    let headers = dispatched_headers(options).await;
    assert_eq!(content_type(&headers), None);
}

#[tokio::test]
async fn existing_content_type_header_is_not_overridden() {
    let options = RequestOptions::post("/things")
        .with_header("Content-Type", "text/plain")
        .with_body(RequestBody::Json(serde_json::json!({"a": 1})));
    let headers = dispatched_headers(options).await;
    assert_eq!(content_type(&headers), Some("text/plain"));
}
