mod support;

use std::sync::{Arc, Mutex};

use cartkeep::{CartEvent, Decimal, InMemoryStore, ItemChanges, ObserverError};
use support::{dollars, event_names, item, logged_cart, open};

#[test]
fn item_events_bracket_each_change() {
    let store = InMemoryStore::new();
    let (mut cart, buffer) = logged_cart(&store);

    let a = cart.add(item("a", 1, dollars(100))).unwrap();
    cart.update(a.row_id(), Decimal::from(3)).unwrap();
    cart.remove(a.row_id()).unwrap();

    assert_eq!(
        event_names(&buffer),
        vec![
            "cart.adding",
            "cart.added",
            "cart.updating",
            "cart.updated",
            "cart.removing",
            "cart.removed",
        ]
    );
}

#[test]
fn update_to_zero_emits_removal_events() {
    let store = InMemoryStore::new();
    let (mut cart, buffer) = logged_cart(&store);
    let a = cart.add(item("a", 1, dollars(100))).unwrap();
    buffer.lock().unwrap().clear();

    cart.update(a.row_id(), Decimal::ZERO).unwrap();
    assert_eq!(event_names(&buffer), vec!["cart.removing", "cart.removed"]);
}

#[test]
fn collision_down_to_zero_reports_both_rows() {
    let store = InMemoryStore::new();
    let (mut cart, buffer) = logged_cart(&store);
    cart.add(item("a", 1, dollars(100))).unwrap();
    let b = cart.add(item("b", 1, dollars(100))).unwrap();
    buffer.lock().unwrap().clear();

    cart.update(
        b.row_id(),
        ItemChanges::new().id("a").quantity(Decimal::from(-1)),
    )
    .unwrap();
    assert_eq!(
        event_names(&buffer),
        vec![
            "cart.removing",
            "cart.removing",
            "cart.removed",
            "cart.removed"
        ]
    );
}

#[test]
fn dispatch_false_skips_add_events() {
    let store = InMemoryStore::new();
    let (mut cart, buffer) = logged_cart(&store);

    cart.add_with(
        item("a", 1, dollars(100)),
        cartkeep::AddOptions::new().dispatch(false),
    )
    .unwrap();

    assert!(event_names(&buffer).is_empty());
    assert_eq!(cart.count_items(), 1);
}

#[test]
fn persistence_events() {
    let store = InMemoryStore::new();
    let (mut cart, buffer) = logged_cart(&store);
    cart.add(item("a", 1, dollars(100))).unwrap();
    buffer.lock().unwrap().clear();

    cart.store("user-1").unwrap();
    cart.destroy().unwrap();
    cart.restore("user-1").unwrap();

    assert_eq!(
        event_names(&buffer),
        vec!["cart.stored", "cart.destroyed", "cart.restored"]
    );
}

#[test]
fn events_carry_the_item() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut cart = open(&InMemoryStore::new(), "default").with_observer(
        move |event: &CartEvent| -> Result<(), ObserverError> {
            if let Some(item) = event.item() {
                sink.lock().unwrap().push((event.name(), item.quantity()));
            }
            Ok(())
        },
    );

    cart.add(item("a", 2, dollars(100))).unwrap();
    cart.add(item("a", 3, dollars(100))).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[3], ("cart.added", Decimal::from(5)));
}

#[test]
fn failing_observer_does_not_fail_the_operation() {
    let mut cart = open(&InMemoryStore::new(), "default").with_observer(
        |_: &CartEvent| -> Result<(), ObserverError> { Err(ObserverError::new("listener down")) },
    );

    let a = cart.add(item("a", 1, dollars(100))).unwrap();
    cart.update(a.row_id(), Decimal::from(2)).unwrap();
    cart.remove(a.row_id()).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn payload_is_tagged_json() {
    let store = InMemoryStore::new();
    let (mut cart, buffer) = logged_cart(&store);
    cart.add(item("sku-7", 1, dollars(100))).unwrap();

    let lines = buffer.lock().unwrap();
    let payload = lines[1].splitn(3, ' ').nth(2).unwrap();
    let json: serde_json::Value = serde_json::from_str(payload).unwrap();
    assert_eq!(json["event"], "after_add");
    assert_eq!(json["item"]["id"], "sku-7");
}

#[cfg(feature = "emitter")]
#[test]
fn emitter_observer_delivers_payloads() {
    use cartkeep::EmitterObserver;
    use std::sync::mpsc;
    use std::time::Duration;

    let (tx, rx) = mpsc::channel::<String>();
    let mut observer = EmitterObserver::default();
    observer.on("cart.added", move |payload: String| {
        let _ = tx.send(payload);
    });

    let mut cart = open(&InMemoryStore::new(), "default").with_observer(observer);
    cart.add(item("sku-3", 1, dollars(100))).unwrap();

    let payload = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(payload.contains("sku-3"));
}
