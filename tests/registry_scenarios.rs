use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use pubreg::{DeliveryFault, DeliveryFaultKind, FaultSink, Registry};
use serde_json::{Value, json};

fn recorder() -> (Arc<Mutex<Vec<Value>>>, impl Fn(&Value) -> pubreg::HandlerResult) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let handler = move |payload: &Value| -> pubreg::HandlerResult {
        sink.lock().unwrap().push(payload.clone());
        Ok(())
    };
    (received, handler)
}

#[test]
fn user_login_scenario() {
    let registry: Registry = Registry::new();
    let (first_seen, first) = recorder();
    let (second_seen, second) = recorder();

    let first_sub = registry.subscribe("user:login", first);
    let _second_sub = registry.subscribe("user:login", second);

    registry.publish("user:login", &json!({ "name": "Alice" }));
    assert_eq!(*first_seen.lock().unwrap(), vec![json!({ "name": "Alice" })]);
    assert_eq!(*second_seen.lock().unwrap(), vec![json!({ "name": "Alice" })]);

    first_sub.unsubscribe();
    registry.publish("user:login", &json!({ "name": "Bob" }));
    assert_eq!(first_seen.lock().unwrap().len(), 1);
    assert_eq!(
        *second_seen.lock().unwrap(),
        vec![json!({ "name": "Alice" }), json!({ "name": "Bob" })]
    );
    assert_eq!(registry.subscriber_count("user:login"), 1);

    registry.clear();
    assert_eq!(registry.subscriber_count("user:login"), 0);
    registry.publish("user:login", &json!({}));
    assert_eq!(second_seen.lock().unwrap().len(), 2);
}

#[test]
fn failing_subscriber_does_not_block_others() {
    let faults = Arc::new(Mutex::new(Vec::<DeliveryFault<String>>::new()));
    let collected = Arc::clone(&faults);
    let sink: Arc<dyn FaultSink<String>> = Arc::new(move |fault: &DeliveryFault<String>| {
        collected.lock().unwrap().push(fault.clone());
    });
    let registry: Registry = Registry::with_sink(sink);
    let (seen, handler) = recorder();

    registry.subscribe("orders", |payload: &Value| {
        let id = payload["id"].as_u64().ok_or("missing id")?;
        println!("order {id}");
        Ok(())
    });
    registry.subscribe("orders", handler);

    registry.publish("orders", &json!({ "sku": "A-1" }));

    assert_eq!(*seen.lock().unwrap(), vec![json!({ "sku": "A-1" })]);
    let faults = faults.lock().unwrap();
    assert_eq!(faults.len(), 1);
    assert_eq!(
        faults[0].kind,
        DeliveryFaultKind::Failed("missing id".to_string())
    );
}

#[test]
fn default_sink_swallows_faults() {
    let registry: Registry = Registry::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);

    registry.subscribe("topic", |_: &Value| -> pubreg::HandlerResult {
        panic!("subscriber exploded")
    });
    registry.subscribe("topic", move |_| {
        h.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    registry.publish("topic", &Value::Null);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn typed_topics_and_payloads() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Topic {
        Temperature,
        Humidity,
    }

    let registry: Registry<Topic, f64> = Registry::new();
    let total = Arc::new(Mutex::new(0.0_f64));
    let t = Arc::clone(&total);
    registry.subscribe(Topic::Temperature, move |value: &f64| {
        *t.lock().unwrap() += value;
        Ok(())
    });

    registry.publish(&Topic::Temperature, &21.5);
    registry.publish(&Topic::Humidity, &40.0);
    registry.publish(&Topic::Temperature, &0.5);

    assert_eq!(*total.lock().unwrap(), 22.0);
    assert_eq!(registry.subscriber_count(&Topic::Humidity), 0);
}

#[test]
fn concurrent_subscribe_publish_keeps_counts_consistent() {
    let registry: Registry<String, u64> = Registry::new();
    let delivered = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let registry = registry.clone();
            let delivered = Arc::clone(&delivered);
            thread::spawn(move || {
                let topic = format!("topic-{}", worker % 2);
                let mut subs = Vec::new();
                for _ in 0..50 {
                    let delivered = Arc::clone(&delivered);
                    subs.push(registry.subscribe(topic.clone(), move |_| {
                        delivered.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }));
                    registry.publish(topic.as_str(), &worker);
                }
                for sub in &subs {
                    sub.unsubscribe();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert!(delivered.load(Ordering::SeqCst) >= 8 * 50);
    assert_eq!(registry.subscriber_count("topic-0"), 0);
    assert_eq!(registry.subscriber_count("topic-1"), 0);
    assert!(registry.is_empty());
}
