//! Ordering guarantees of the single-slot task queue.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use trendcast::queue::TaskQueue;

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Clone) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let record = move |event: &str| sink.lock().unwrap().push(event.to_string());
    (log, record)
}

#[test]
fn back_to_back_items_never_overlap() {
    let (log, record) = recorder();
    let notify = record.clone();
    let queue = TaskQueue::new(move || notify("delivered")).unwrap();

    let r1 = record.clone();
    let first = queue.submit("first", async move {
        r1("start first");
        tokio::time::sleep(Duration::from_millis(100)).await;
        r1("end first");
        Ok::<_, String>(1)
    });
    let r2 = record.clone();
    let second = queue.submit("second", async move {
        r2("start second");
        r2("end second");
        Ok::<_, String>(2)
    });

    assert_eq!(second.wait(), Ok(2));
    assert_eq!(first.wait(), Ok(1));

    // The notifier runs just after the result is sent.
    for _ in 0..200 {
        if log.lock().unwrap().len() == 6 {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "start first",
            "end first",
            "delivered",
            "start second",
            "end second",
            "delivered",
        ]
    );
}

#[test]
fn failures_come_back_as_display_text() {
    let queue = TaskQueue::new(|| {}).unwrap();
    let pending = queue.submit("trend generation", async { Err::<(), _>("boom") });
    assert_eq!(pending.wait(), Err("boom".to_string()));
}

#[test]
fn try_take_is_empty_until_done() {
    let queue = TaskQueue::new(|| {}).unwrap();
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(1);
    let pending = queue.submit("gated", async move {
        // Block the worker until the test lets it go.
        let _ = release_rx.recv();
        Ok::<_, String>("done")
    });

    assert!(pending.try_take().is_none());
    release_tx.send(()).unwrap();

    let outcome = loop {
        if let Some(outcome) = pending.try_take() {
            break outcome;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    assert_eq!(outcome, Ok("done"));
}

#[test]
fn a_failed_item_does_not_stall_the_next() {
    let queue = TaskQueue::new(|| {}).unwrap();
    let bad = queue.submit("bad", async { Err::<u8, _>("nope") });
    let good = queue.submit("good", async { Ok::<_, String>(7u8) });
    assert!(bad.wait().is_err());
    assert_eq!(good.wait(), Ok(7));
}
