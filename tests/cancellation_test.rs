//! Cancellation (§4.7): a token fired before dispatch starts, and a token
//! fired while an interceptor is mid-flight, both divert to the error
//! track with a `cancelled` kind rather than whatever the interceptor or
//! transport would otherwise have produced.

mod support;

use std::sync::Arc;
use std::time::Duration;

use relay_http::interceptors::dispatcher::Dispatcher;
use relay_http::{
    CancellationToken, ErrorCause, ErrorKind, InterceptorFn, InterceptorList, RequestOptions,
};
use support::MockTransport;

#[tokio::test]
async fn cancellation_fired_before_dispatch_short_circuits_to_cancelled() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());
    let list = InterceptorList::new();

    let (token, handle) = CancellationToken::new();
    handle.cancel();

    let error = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), Some(token))
        .await
        .expect_err("pre-cancelled dispatch must fail");

    assert_eq!(error.kind, ErrorKind::Cancelled);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn cancellation_observed_after_handler_resolves_overrides_a_next_verdict() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());

    let (token, handle) = CancellationToken::new();

    let mut list = InterceptorList::empty();
    list.push(Arc::new(InterceptorFn::new().named("slow_next").on_request(
        move |options, handler| {
            // `cancel` takes `&self`, so capturing `handle` by move and
            // calling it here is fine even without `Clone` — the `Fn`
            // closure only needs shared access each time it runs.
            handle.cancel();
            async move {
                handler.next(options);
            }
        },
    )));

    let error = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), Some(token))
        .await
        .expect_err("cancellation observed after the handler resolves must win");

    assert_eq!(error.kind, ErrorKind::Cancelled);
    assert_eq!(transport.call_count(), 0);
    // The interceptor's `next(options)` verdict is preserved as the prior
    // cause rather than discarded (§4.7).
    assert!(matches!(error.cause, Some(ErrorCause::PriorRequest(_))));
}

#[tokio::test]
async fn cancellation_while_transport_in_flight_normalizes_to_cancelled() {
    let transport = Arc::new(MockTransport::slow(Duration::from_millis(200)));
    let dispatcher = Dispatcher::new(transport);
    let list = InterceptorList::new();

    let (token, handle) = CancellationToken::new();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        handle.cancel();
    });

    let error = dispatcher
        .dispatch(&list, RequestOptions::get("/slow"), Some(token))
        .await
        .expect_err("in-flight cancellation must normalize to cancelled");

    assert_eq!(error.kind, ErrorKind::Cancelled);
}

#[tokio::test]
async fn error_interceptor_may_recover_a_cancellation_like_any_other_error() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport);

    let (token, handle) = CancellationToken::new();
    handle.cancel();

    let mut list = InterceptorList::empty();
    list.push(Arc::new(InterceptorFn::new().named("recoverer").on_error(
        |_error, handler| async move {
            let request = Arc::new(RequestOptions::get("/unused"));
            let response = relay_http::Response::new(request, 200, serde_json::json!({"recovered": true}));
            handler.resolve(response);
        },
    )));

    let response = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), Some(token))
        .await
        .expect("error interceptor recovers the cancellation");

    assert_eq!(response.status, 200);
}
