//! Request/response plumbing between panels and the data transport.
//!
//! Requests are fire-and-forget; responses come back on a channel at any
//! later point, possibly never, possibly twice. Every request carries the
//! feed's epoch, and a response is only accepted while its epoch is current.
#![forbid(unsafe_code)]

mod cooldown;
mod poll;

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

pub use cooldown::CommandGate;
pub use poll::PollTimer;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    FamStats,
    Unbind,
    BindLast(String),
    ToggleCombat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub epoch: u64,
    pub kind: RequestKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Response<T> {
    pub epoch: u64,
    pub payload: T,
}

/// Sending half of the transport: one-way enqueue of typed requests.
#[derive(Clone, Debug)]
pub struct Outbox {
    tx: Sender<Request>,
}

impl Outbox {
    pub fn new(tx: Sender<Request>) -> Self {
        Self { tx }
    }

    /// Creates an outbox together with the receiver the transport drains.
    pub fn channel() -> (Self, Receiver<Request>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    /// Returns false when the transport has gone away.
    pub fn enqueue(&self, epoch: u64, kind: RequestKind) -> bool {
        log::trace!(target: "transport", "enqueue {:?} epoch={}", kind, epoch);
        match self.tx.send(Request { epoch, kind }) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("transport closed; dropped {:?}", e.into_inner().kind);
                false
            }
        }
    }
}

/// A periodically polled data source.
pub struct Feed<T> {
    kind: RequestKind,
    outbox: Outbox,
    inbox: Receiver<Response<T>>,
    timer: PollTimer,
    epoch: u64,
    active: bool,
    stale_dropped: u64,
}

impl<T> Feed<T> {
    pub fn new(
        kind: RequestKind,
        outbox: Outbox,
        inbox: Receiver<Response<T>>,
        interval: Duration,
    ) -> Self {
        Self {
            kind,
            outbox,
            inbox,
            timer: PollTimer::new(interval),
            epoch: 0,
            active: false,
            stale_dropped: 0,
        }
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Responses discarded because they belonged to an earlier epoch or
    /// arrived while the feed was stopped.
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    pub fn interval(&self) -> Duration {
        self.timer.interval()
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.timer.set_interval(interval);
    }

    /// Continues epoch numbering past `epoch`, so responses addressed to an
    /// earlier feed on the same channel stay stale. Ignored while active.
    pub fn resume_after(&mut self, epoch: u64) {
        if !self.active {
            self.epoch = self.epoch.max(epoch);
        }
    }

    /// Starts polling; the first request goes out on the next `poll`.
    pub fn start(&mut self, now: Instant) {
        if self.active {
            return;
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.active = true;
        self.timer.start(now);
        log::debug!("feed {:?} started (epoch {})", self.kind, self.epoch);
    }

    /// Cancels polling. Responses still in flight are ignored when they land.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.epoch = self.epoch.wrapping_add(1);
        self.timer.cancel();
        log::debug!("feed {:?} stopped (epoch now {})", self.kind, self.epoch);
    }

    /// Sends a request if the timer is due. Returns whether one was sent.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.active || !self.timer.due(now) {
            return false;
        }
        self.outbox.enqueue(self.epoch, self.kind.clone())
    }

    /// Drains every pending response, keeping only those of the current
    /// epoch while active, in arrival order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut accepted = Vec::new();
        loop {
            match self.inbox.try_recv() {
                Ok(response) => {
                    if self.active && response.epoch == self.epoch {
                        accepted.push(response.payload);
                    } else {
                        self.stale_dropped += 1;
                        log::debug!(
                            "feed {:?} dropped response (epoch {} vs {}, active={})",
                            self.kind,
                            response.epoch,
                            self.epoch,
                            self.active
                        );
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::trace!(target: "transport", "feed {:?} inbox disconnected", self.kind);
                    break;
                }
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> (
        Feed<u32>,
        Receiver<Request>,
        Sender<Response<u32>>,
    ) {
        let (outbox, requests) = Outbox::channel();
        let (tx, rx) = unbounded();
        let feed = Feed::new(RequestKind::FamStats, outbox, rx, Duration::from_secs(1));
        (feed, requests, tx)
    }

    #[test]
    fn first_poll_after_start_sends_immediately() {
        let (mut feed, requests, _tx) = feed();
        let t0 = Instant::now();
        assert!(!feed.poll(t0));
        feed.start(t0);
        assert!(feed.poll(t0));
        assert!(!feed.poll(t0 + Duration::from_millis(500)));
        assert!(feed.poll(t0 + Duration::from_secs(1)));
        let sent: Vec<Request> = requests.try_iter().collect();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|r| r.epoch == feed.epoch()));
    }

    #[test]
    fn responses_from_previous_epoch_are_ignored() {
        let (mut feed, _requests, tx) = feed();
        let t0 = Instant::now();
        feed.start(t0);
        let old = feed.epoch();
        feed.stop();
        feed.start(t0);
        tx.send(Response { epoch: old, payload: 1 }).unwrap();
        tx.send(Response {
            epoch: feed.epoch(),
            payload: 2,
        })
        .unwrap();
        assert_eq!(feed.drain(), vec![2]);
        assert_eq!(feed.stale_dropped(), 1);
    }

    #[test]
    fn stopped_feed_drops_late_responses() {
        let (mut feed, _requests, tx) = feed();
        feed.start(Instant::now());
        let epoch = feed.epoch();
        feed.stop();
        tx.send(Response { epoch, payload: 7 }).unwrap();
        assert!(feed.drain().is_empty());
        assert!(!feed.poll(Instant::now()));
    }

    #[test]
    fn repeated_responses_are_all_delivered() {
        let (mut feed, _requests, tx) = feed();
        feed.start(Instant::now());
        let epoch = feed.epoch();
        tx.send(Response { epoch, payload: 3 }).unwrap();
        tx.send(Response { epoch, payload: 3 }).unwrap();
        assert_eq!(feed.drain(), vec![3, 3]);
    }

    #[test]
    fn resumed_feed_ignores_previous_instance() {
        let (outbox, _requests) = Outbox::channel();
        let (tx, rx) = unbounded();
        let mut first = Feed::new(RequestKind::FamStats, outbox.clone(), rx.clone(), Duration::from_secs(1));
        first.start(Instant::now());
        let old = first.epoch();
        drop(first);

        let mut second = Feed::new(RequestKind::FamStats, outbox, rx, Duration::from_secs(1));
        second.resume_after(old);
        second.start(Instant::now());
        tx.send(Response { epoch: old, payload: 1u32 }).unwrap();
        assert!(second.drain().is_empty());
        assert_eq!(second.stale_dropped(), 1);
    }

    #[test]
    fn closed_transport_reports_failure() {
        let (mut feed, requests, _tx) = feed();
        drop(requests);
        feed.start(Instant::now());
        assert!(!feed.poll(Instant::now()));
    }
}
