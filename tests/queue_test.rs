//! Queued interceptor scheduling (§4.8): concurrent invocations of the
//! same queued interceptor instance serialize in FIFO arrival order.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use relay_http::{InterceptorFn, InterceptorList, QueuedInterceptor, RequestOptions};
use relay_http::interceptors::dispatcher::Dispatcher;
use support::MockTransport;

#[tokio::test]
async fn queued_interceptor_serializes_concurrent_calls_in_arrival_order() {
    let transport = Arc::new(MockTransport::ok());
    let dispatcher = Arc::new(Dispatcher::new(transport));

    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let next_ticket = Arc::new(AtomicUsize::new(0));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));

    let order_for_hook = order.clone();
    let in_flight_for_hook = in_flight.clone();
    let max_in_flight_for_hook = max_in_flight.clone();
    let inner = InterceptorFn::new().named("ordered").on_request(move |options, handler| {
        let order_for_hook = order_for_hook.clone();
        let in_flight_for_hook = in_flight_for_hook.clone();
        let max_in_flight_for_hook = max_in_flight_for_hook.clone();
        async move {
            // Track how many calls are inside the hook body at once. If the
            // queue did not serialize, two staggered spawns would both land
            // in this sleep concurrently and `max_in_flight` would exceed 1
            // regardless of how the sleep durations are tuned.
            let concurrent = in_flight_for_hook.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight_for_hook.fetch_max(concurrent, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            let my_ticket = options
                .extra("ticket")
                .and_then(|v| v.as_u64())
                .expect("ticket extra set by caller");
            order_for_hook.lock().unwrap().push(my_ticket);
            in_flight_for_hook.fetch_sub(1, Ordering::SeqCst);
            handler.next(options);
        }
    });

    let mut list = InterceptorList::empty();
    list.push(Arc::new(QueuedInterceptor::new(inner)));
    let list = Arc::new(list);

    let mut handles = Vec::new();
    for _ in 0..5 {
        let ticket = next_ticket.fetch_add(1, Ordering::SeqCst) as u64;
        let dispatcher = dispatcher.clone();
        let list = list.clone();
        handles.push(tokio::spawn(async move {
            let mut options = RequestOptions::get("/ping");
            options.set_extra("ticket", serde_json::json!(ticket));
            dispatcher.dispatch(&list, options, None).await.unwrap();
        }));
        // Stagger spawns slightly so arrival order is deterministic.
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);

    let recorded = order.lock().unwrap().clone();
    assert_eq!(recorded, vec![0, 1, 2, 3, 4]);
}
