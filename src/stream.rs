//! Lazy answer streams.
//!
//! Each query runs in its own producer thread and hands answers over a
//! zero-capacity channel, so the producer suspends exactly where it emits
//! an answer and resumes when the consumer pulls the next one. Dropping
//! or closing the stream disconnects the channel; the producer observes
//! the failed send at its next emission and abandons the search.

use crate::bindings::Bindings;
use crossbeam_channel::{bounded, Receiver};
use std::thread;

/// The answer-emission callback threaded through the search. Returns
/// false once the consumer is gone; the search unwinds promptly.
pub(crate) type Emit<'a> = &'a mut dyn FnMut(Bindings) -> bool;

/// The pull side of a query: a lazy sequence of answer bindings.
///
/// The stream ends when the search space is exhausted. `close` is
/// idempotent and also happens implicitly on drop.
pub struct AnswerStream {
    rx: Option<Receiver<Bindings>>,
}

impl AnswerStream {
    /// Pull the next answer, or `None` on exhaustion.
    pub fn next_answer(&mut self) -> Option<Bindings> {
        let rx = self.rx.as_ref()?;
        match rx.recv() {
            Ok(bds) => Some(bds),
            Err(_) => {
                self.rx = None;
                None
            }
        }
    }

    /// Stop the search. Further pulls return `None`.
    pub fn close(&mut self) {
        self.rx = None;
    }

    pub fn is_closed(&self) -> bool {
        self.rx.is_none()
    }
}

impl Iterator for AnswerStream {
    type Item = Bindings;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_answer()
    }
}

/// Run `search` on its own thread, yielding each emitted answer through
/// the returned stream.
pub(crate) fn spawn_producer<F>(search: F) -> AnswerStream
where
    F: FnOnce(Emit<'_>) -> bool + Send + 'static,
{
    let (tx, rx) = bounded::<Bindings>(0);
    thread::Builder::new()
        .name("sldlog-query".into())
        .spawn(move || {
            let mut emit = |bds: Bindings| tx.send(bds).is_ok();
            let _ = search(&mut emit);
        })
        .expect("failed to spawn query producer thread");
    AnswerStream { rx: Some(rx) }
}
