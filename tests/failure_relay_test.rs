use small_svc::{FailableService, FailureCause, FailureEvent, FailureRelay, SubscriptionId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("request timed out after {0}ms")]
struct TimeoutError(u64);

/// A service that composes the relay instead of inheriting from it.
struct ProfileService {
    relay: FailureRelay,
}

impl ProfileService {
    fn new() -> Self {
        Self {
            relay: FailureRelay::new("ProfileService"),
        }
    }

    fn fetch_profile(&self, fail: bool) -> Option<String> {
        if fail {
            self.report_failure("FetchProfile", TimeoutError(500));
            None
        } else {
            Some("profile".to_string())
        }
    }
}

impl FailableService for ProfileService {
    fn failure_relay(&self) -> &FailureRelay {
        &self.relay
    }
}

#[test]
fn test_observer_receives_event_exactly_once() {
    let service = ProfileService::new();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();

    service.subscribe_failures(move |event: &FailureEvent| {
        let timeout = event.cause_as::<TimeoutError>().map(|e| e.0);
        sink.lock().unwrap().push((
            event.sender.clone(),
            event.operation_name.clone(),
            timeout,
        ));
    });

    assert_eq!(service.fetch_profile(false).as_deref(), Some("profile"));
    assert!(received.lock().unwrap().is_empty());

    assert_eq!(service.fetch_profile(true), None);
    assert_eq!(
        *received.lock().unwrap(),
        vec![(
            "ProfileService".to_string(),
            "FetchProfile".to_string(),
            Some(500)
        )]
    );
}

#[test]
fn test_service_reports_plain_messages_and_shared_causes() {
    let service = ProfileService::new();
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    service.subscribe_failures(move |event: &FailureEvent| {
        sink.lock().unwrap().push(event.cause.to_string());
    });

    service.report_failure("Op", "timed out");
    service.report_failure("Op", String::from("connection reset"));
    let shared: FailureCause = Arc::new(TimeoutError(3));
    service.report_failure_shared("Op", shared);

    assert_eq!(
        *messages.lock().unwrap(),
        vec![
            "timed out".to_string(),
            "connection reset".to_string(),
            "request timed out after 3ms".to_string(),
        ]
    );
}

#[test]
fn test_zero_subscribers_is_silent() {
    let service = ProfileService::new();
    assert_eq!(service.fetch_profile(true), None);
    assert_eq!(service.failure_relay().subscriber_count(), 0);
}

#[test]
fn test_fan_out_in_subscription_order_with_same_payload() {
    let relay = FailureRelay::new("svc");
    let order = Arc::new(Mutex::new(Vec::new()));
    let causes: Arc<Mutex<Vec<FailureCause>>> = Arc::new(Mutex::new(Vec::new()));

    for index in 0..5 {
        let order = order.clone();
        let causes = causes.clone();
        relay.subscribe(move |event: &FailureEvent| {
            assert_eq!(event.operation_name, "Sync");
            order.lock().unwrap().push(index);
            causes.lock().unwrap().push(event.cause.clone());
        });
    }

    relay.report_failure("Sync", TimeoutError(10));

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    let causes = causes.lock().unwrap();
    assert_eq!(causes.len(), 5);
    assert!(causes.iter().all(|cause| Arc::ptr_eq(cause, &causes[0])));
    assert_eq!(causes[0].to_string(), "request timed out after 10ms");
}

#[test]
fn test_unsubscribed_observer_is_not_called() {
    let relay = FailureRelay::new("svc");
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let first = relay.subscribe(move |_: &FailureEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = calls.clone();
    relay.subscribe(move |_: &FailureEvent| {
        counter.fetch_add(10, Ordering::SeqCst);
    });

    assert!(relay.unsubscribe(first));
    relay.report_failure("Op", "failed");

    assert_eq!(calls.load(Ordering::SeqCst), 10);
}

#[test]
fn test_panicking_observer_does_not_stop_delivery() {
    let relay = FailureRelay::new("svc");
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    relay.subscribe(move |_: &FailureEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    relay.subscribe(|_: &FailureEvent| {
        panic!("observer bug");
    });
    let counter = calls.clone();
    relay.subscribe(move |_: &FailureEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    relay.report_failure("Op", "failed");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // the relay stays usable after an observer panicked
    relay.report_failure("Op", "failed again");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(relay.subscriber_count(), 3);
}

#[test]
fn test_subscribe_from_inside_observer_applies_to_next_report() {
    let relay = Arc::new(FailureRelay::new("svc"));
    let late_calls = Arc::new(AtomicUsize::new(0));

    let relay_handle = relay.clone();
    let late = late_calls.clone();
    relay.subscribe(move |_: &FailureEvent| {
        let late = late.clone();
        relay_handle.subscribe(move |_: &FailureEvent| {
            late.fetch_add(1, Ordering::SeqCst);
        });
    });

    relay.report_failure("Op", "first");
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);
    assert_eq!(relay.subscriber_count(), 2);

    relay.report_failure("Op", "second");
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reports_from_many_threads() {
    let relay = Arc::new(FailureRelay::new("svc"));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    relay.subscribe(move |_: &FailureEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let relay = relay.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    relay.report_failure(&format!("Worker{}", i), "failed");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 200);
}

#[test]
fn test_unsubscribe_from_inside_observer_applies_to_next_report() {
    let relay = Arc::new(FailureRelay::new("svc"));
    let victim_calls = Arc::new(AtomicUsize::new(0));
    let victim_id: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

    let relay_handle = relay.clone();
    let target = victim_id.clone();
    relay.subscribe(move |_: &FailureEvent| {
        if let Some(id) = target.lock().unwrap().take() {
            assert!(relay_handle.unsubscribe(id));
        }
    });

    let counter = victim_calls.clone();
    let id = relay.subscribe(move |_: &FailureEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    *victim_id.lock().unwrap() = Some(id);

    // removed during this delivery, but still part of its snapshot
    relay.report_failure("Op", "first");
    assert_eq!(victim_calls.load(Ordering::SeqCst), 1);
    assert_eq!(relay.subscriber_count(), 1);

    relay.report_failure("Op", "second");
    assert_eq!(victim_calls.load(Ordering::SeqCst), 1);
}
