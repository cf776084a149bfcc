//! The example retry interceptor: retries a retryable transport failure
//! directly against the transport and resolves the error track once it
//! eventually succeeds.

mod support;

use std::sync::Arc;
use std::time::Duration;

use relay_http::interceptors::dispatcher::Dispatcher;
use relay_http::{InterceptorList, RequestOptions, RetryInterceptor};
use support::MockTransport;

#[tokio::test]
async fn retry_recovers_after_transient_failures() {
    let transport = Arc::new(MockTransport::failing_first(2));
    let dispatcher = Dispatcher::new(transport.clone());

    let mut list = InterceptorList::empty();
    list.push(Arc::new(RetryInterceptor::new(
        transport.clone(),
        5,
        Duration::from_millis(1),
        Duration::from_millis(20),
    )));

    // The dispatcher's own first attempt against the transport fails, then
    // lands on the error track where the retry interceptor takes over.
    let options = RequestOptions::get("/flaky");
    let response = dispatcher.dispatch(&list, options, None).await.expect("eventually succeeds");

    assert!(response.is_success());
    // One failing dispatch-level attempt, two failing retry attempts, one
    // succeeding retry attempt.
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn retry_gives_up_after_max_attempts() {
    let transport = Arc::new(MockTransport::failing_first(100));
    let dispatcher = Dispatcher::new(transport.clone());

    let mut list = InterceptorList::empty();
    list.push(Arc::new(RetryInterceptor::new(
        transport.clone(),
        2,
        Duration::from_millis(1),
        Duration::from_millis(5),
    )));

    let options = RequestOptions::get("/always-fails");
    let error = dispatcher
        .dispatch(&list, options, None)
        .await
        .expect_err("exhausts retries and fails");

    assert!(!error.is_invariant_violation());
}
