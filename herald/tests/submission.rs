//! Deferred submission: FIFO batches, drain atomicity, fail-fast.

use herald::{BoxError, CommandDispatcher, testing::RecordingHandler};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::failing;

fn dispatcher() -> CommandDispatcher<&'static str, String, String> {
    CommandDispatcher::new()
}

fn tag_logger(
    tag: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
) -> impl herald::Handler<String, Output = String> {
    move |_param: String| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(tag);
            Ok::<_, BoxError>(tag.to_string())
        }
    }
}

#[tokio::test]
async fn submit_dispatches_in_enqueue_order_and_returns_the_last_result() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let d = dispatcher();
    d.register("A", tag_logger("A", log.clone()));
    d.register("B", tag_logger("B", log.clone()));
    d.register("C", tag_logger("C", log.clone()));

    d.dispatch_on_submit("A", "1".to_string());
    d.dispatch_on_submit("B", "2".to_string());
    d.dispatch_on_submit("C", "3".to_string());
    assert_eq!(d.pending_submissions(), 3);

    let last = d.submit().await.unwrap();
    assert_eq!(last, Some("C".to_string()));
    assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C"]);
    assert_eq!(
        d.pending_submissions(),
        0,
        "the queue must be empty immediately after a submit"
    );
}

#[tokio::test]
async fn submit_of_an_empty_queue_returns_none() {
    let d = dispatcher();
    assert_eq!(d.submit().await.unwrap(), None);
}

#[tokio::test]
async fn a_mid_batch_failure_aborts_the_rest_of_the_batch() {
    let d = dispatcher();
    let after = RecordingHandler::new("after".to_string());
    d.register("ok", |p: String| async move { Ok::<_, BoxError>(p) });
    d.register("bad", failing("mid-batch failure"));
    d.register("after", after.clone());

    d.dispatch_on_submit("ok", "1".to_string());
    d.dispatch_on_submit("bad", "2".to_string());
    d.dispatch_on_submit("after", "3".to_string());

    assert!(d.submit().await.is_err());
    assert_eq!(
        after.count(),
        0,
        "entries after the failure must not be dispatched"
    );
    assert_eq!(
        d.pending_submissions(),
        0,
        "the aborted remainder is discarded, not re-queued"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn entries_enqueued_during_a_submit_land_in_exactly_one_batch() {
    const TOTAL: usize = 500;

    let d = CommandDispatcher::<&'static str, usize, usize>::new();
    let processed = Arc::new(AtomicUsize::new(0));
    {
        let processed = processed.clone();
        d.register("N", move |n: usize| {
            let processed = processed.clone();
            async move {
                processed.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(n)
            }
        });
    }

    let writer = {
        let d = d.clone();
        tokio::spawn(async move {
            for i in 0..TOTAL {
                d.dispatch_on_submit("N", i);
                if i % 64 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        })
    };

    // Keep flushing while the writer races us, then flush the remainder.
    while !writer.is_finished() {
        d.submit().await.unwrap();
    }
    writer.await.unwrap();
    d.submit().await.unwrap();

    assert_eq!(
        processed.load(Ordering::SeqCst),
        TOTAL,
        "every enqueued entry must be dispatched exactly once"
    );
    assert_eq!(d.pending_submissions(), 0);
}
