//! Integration coverage for the dispatcher's three tracks: short-circuit
//! resolve, call-following accumulation, reject semantics, and the
//! duplicate-handler invariant.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use relay_http::interceptors::dispatcher::Dispatcher;
use relay_http::{InterceptorFn, InterceptorList, RequestOptions};
use support::MockTransport;

#[tokio::test]
async fn short_circuit_resolve_never_reaches_transport() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());

    let mut list = InterceptorList::empty();
    list.push(Arc::new(InterceptorFn::new().named("short_circuit").on_request(
        |_options, handler| async move {
            let request = Arc::new(RequestOptions::get("/unused"));
            let response = relay_http::Response::new(request, 204, serde_json::Value::Null);
            handler.resolve(response, false);
        },
    )));

    let response = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), None)
        .await
        .expect("resolved response");

    assert_eq!(response.status, 204);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn resolve_call_following_enters_response_track_at_index_zero() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());

    let seen = Arc::new(AtomicUsize::new(0));
    let seen_for_first = seen.clone();
    let seen_for_second = seen.clone();

    let mut list = InterceptorList::empty();
    // Index 0: resolves with call_following=true -> response track re-enters
    // at index 0, so this interceptor's own on_response also runs.
    list.push(Arc::new(
        InterceptorFn::new()
            .named("resolver")
            .on_request(move |_options, handler| {
                let seen_for_first = seen_for_first.clone();
                async move {
                    seen_for_first.fetch_add(1, Ordering::SeqCst);
                    let request = Arc::new(RequestOptions::get("/unused"));
                    let response = relay_http::Response::new(request, 200, serde_json::json!({"from": "resolver"}));
                    handler.resolve(response, true);
                }
            })
            .on_response(move |response, handler| {
                let seen_for_second = seen_for_second.clone();
                async move {
                    seen_for_second.fetch_add(1, Ordering::SeqCst);
                    handler.next(response);
                }
            }),
    ));

    let response = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), None)
        .await
        .expect("resolved response");

    assert_eq!(response.status, 200);
    // Both hooks on the single interceptor ran: once on the request track
    // (producing the resolve), once on the response track (index 0 again).
    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn reject_call_following_enters_error_track_at_index_zero() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());

    let error_track_ran = Arc::new(AtomicUsize::new(0));
    let error_track_ran_inner = error_track_ran.clone();

    let mut list = InterceptorList::empty();
    list.push(Arc::new(
        InterceptorFn::new()
            .named("rejecter")
            .on_request(|_options, handler| async move {
                let request = Arc::new(RequestOptions::get("/unused"));
                let error = relay_http::PipelineError::new(request, relay_http::ErrorKind::Unknown)
                    .with_message("rejected on purpose");
                handler.reject(error, true);
            })
            .on_error(move |_error, handler| {
                let error_track_ran_inner = error_track_ran_inner.clone();
                async move {
                    error_track_ran_inner.fetch_add(1, Ordering::SeqCst);
                    let request = Arc::new(RequestOptions::get("/unused"));
                    let response = relay_http::Response::new(request, 200, serde_json::Value::Null);
                    handler.resolve(response);
                }
            }),
    ));

    let response = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), None)
        .await
        .expect("recovered via error track");

    assert_eq!(response.status, 200);
    assert_eq!(error_track_ran.load(Ordering::SeqCst), 1);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn reject_without_call_following_fails_immediately() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());

    let error_track_ran = Arc::new(AtomicUsize::new(0));
    let error_track_ran_inner = error_track_ran.clone();

    let mut list = InterceptorList::empty();
    list.push(Arc::new(
        InterceptorFn::new()
            .named("rejecter")
            .on_request(|_options, handler| async move {
                let request = Arc::new(RequestOptions::get("/unused"));
                let error = relay_http::PipelineError::new(request, relay_http::ErrorKind::Unknown)
                    .with_message("rejected, no follow-on");
                handler.reject(error, false);
            })
            .on_error(move |error, handler| {
                let error_track_ran_inner = error_track_ran_inner.clone();
                async move {
                    error_track_ran_inner.fetch_add(1, Ordering::SeqCst);
                    handler.next(error);
                }
            }),
    ));

    let error = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), None)
        .await
        .expect_err("should fail without entering the error track");

    assert_eq!(error.message.as_deref(), Some("rejected, no follow-on"));
    // The same interceptor's on_error hook never ran: call_following=false
    // fails the dispatch directly.
    assert_eq!(error_track_ran.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_handler_call_raises_invariant_violation() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());

    let mut list = InterceptorList::empty();
    list.push(Arc::new(InterceptorFn::new().named("double_caller").on_request(
        |options, handler| async move {
            handler.next(options.clone());
            handler.next(options);
        },
    )));

    let error = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), None)
        .await
        .expect_err("duplicate handler call must fail the dispatch");

    assert!(error.is_invariant_violation());
    assert_eq!(
        error.message.as_deref(),
        Some(relay_http::types::error::DUPLICATE_HANDLER_MESSAGE)
    );
}

#[tokio::test]
async fn plain_pass_through_reaches_transport_and_succeeds() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(transport.clone());
    let list = InterceptorList::new();

    let response = dispatcher
        .dispatch(&list, RequestOptions::get("/ping"), None)
        .await
        .expect("transport call succeeds");

    assert!(response.is_success());
    assert_eq!(transport.call_count(), 1);
}
