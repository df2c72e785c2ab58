use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use panelkit_runtime::{Feed, Outbox, RequestKind, Response};

// A transport thread that answers every request with its epoch echoed back.
#[test]
fn feed_receives_answers_from_transport_thread() {
    let (outbox, requests) = Outbox::channel();
    let (resp_tx, resp_rx) = unbounded();
    let worker = thread::spawn(move || {
        let mut answered = 0u32;
        for req in requests.iter() {
            assert_eq!(req.kind, RequestKind::FamStats);
            answered += 1;
            if resp_tx
                .send(Response {
                    epoch: req.epoch,
                    payload: answered,
                })
                .is_err()
            {
                break;
            }
        }
        answered
    });

    let mut feed = Feed::new(
        RequestKind::FamStats,
        outbox,
        resp_rx,
        Duration::from_millis(10),
    );
    let t0 = Instant::now();
    feed.start(t0);
    assert!(feed.poll(t0));
    assert!(feed.poll(t0 + Duration::from_millis(10)));

    let mut got = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while got.len() < 2 && Instant::now() < deadline {
        got.extend(feed.drain());
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(got, vec![1, 2]);

    drop(feed);
    assert_eq!(worker.join().unwrap(), 2);
}
