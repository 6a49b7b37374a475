//! Deferred one-shot timers for the turn sequencer.
//!
//! A [`Scheduler`] only stores events and reports which ones are due; it
//! never calls back into game code. The sequencer drains due events from a
//! single loop, so timers cannot interleave with a guess being handled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Timer events the sequencer schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum TimerEvent {
    /// Turn the drawn card face up.
    Reveal,
    /// Judge the face-up card.
    Resolve,
    /// Clear the row and pass the turn.
    EndTurn,
    /// Hide the notice with this sequence number, if it is still showing.
    DismissNotice(u64),
}

pub trait Scheduler {
    /// Queue `event` to fire once `delay` has elapsed.
    fn schedule(&mut self, delay: Duration, event: TimerEvent);
    /// Pop the earliest event whose deadline has passed.
    fn next_due(&mut self) -> Option<TimerEvent>;
    /// Number of events still waiting.
    fn pending(&self) -> usize;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        (**self).schedule(delay, event)
    }
    fn next_due(&mut self) -> Option<TimerEvent> {
        (**self).next_due()
    }
    fn pending(&self) -> usize {
        (**self).pending()
    }
}

/// Deadline-ordered queue; events sharing a deadline fire in insertion order.
#[derive(Debug, Default)]
struct TimerQueue {
    heap: BinaryHeap<Reverse<(Duration, u64, TimerEvent)>>,
    seq: u64,
}

impl TimerQueue {
    fn push(&mut self, deadline: Duration, event: TimerEvent) {
        self.heap.push(Reverse((deadline, self.seq, event)));
        self.seq += 1;
    }

    fn pop_due(&mut self, now: Duration) -> Option<TimerEvent> {
        match self.heap.peek() {
            Some(Reverse((deadline, _, _))) if *deadline <= now => {
                self.heap.pop().map(|Reverse((_, _, ev))| ev)
            }
            _ => None,
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse((d, _, _))| *d)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Virtual-clock scheduler; time only moves through [`ManualScheduler::advance`].
///
/// ```
/// use std::time::Duration;
/// use red_or_black::scheduler::{ManualScheduler, Scheduler, TimerEvent};
///
/// let mut s = ManualScheduler::new();
/// s.schedule(Duration::from_millis(10), TimerEvent::Reveal);
/// assert_eq!(s.next_due(), None);
/// s.advance(Duration::from_millis(10));
/// assert_eq!(s.next_due(), Some(TimerEvent::Reveal));
/// ```
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: TimerQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Jump the clock to the next deadline, if any is queued.
    pub fn advance_to_next(&mut self) -> bool {
        match self.queue.next_deadline() {
            Some(d) => {
                self.now = self.now.max(d);
                true
            }
            None => false,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        self.queue.push(self.now + delay, event);
    }

    fn next_due(&mut self) -> Option<TimerEvent> {
        self.queue.pop_due(self.now)
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Wall-clock scheduler used by the interactive frontend.
#[derive(Debug)]
pub struct SystemScheduler {
    started: Instant,
    queue: TimerQueue,
}

impl SystemScheduler {
    pub fn new() -> Self {
        Self { started: Instant::now(), queue: TimerQueue::default() }
    }
}

impl Default for SystemScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SystemScheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        self.queue.push(self.started.elapsed() + delay, event);
    }

    fn next_due(&mut self) -> Option<TimerEvent> {
        self.queue.pop_due(self.started.elapsed())
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut s = ManualScheduler::new();
        s.schedule(Duration::from_millis(30), TimerEvent::EndTurn);
        s.schedule(Duration::from_millis(10), TimerEvent::Reveal);
        s.schedule(Duration::from_millis(20), TimerEvent::Resolve);
        s.advance(Duration::from_millis(30));
        assert_eq!(s.next_due(), Some(TimerEvent::Reveal));
        assert_eq!(s.next_due(), Some(TimerEvent::Resolve));
        assert_eq!(s.next_due(), Some(TimerEvent::EndTurn));
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn equal_deadlines_fire_fifo() {
        let mut s = ManualScheduler::new();
        s.schedule(Duration::ZERO, TimerEvent::DismissNotice(2));
        s.schedule(Duration::ZERO, TimerEvent::DismissNotice(1));
        assert_eq!(s.next_due(), Some(TimerEvent::DismissNotice(2)));
        assert_eq!(s.next_due(), Some(TimerEvent::DismissNotice(1)));
    }

    #[test]
    fn advance_to_next_jumps_clock() {
        let mut s = ManualScheduler::new();
        assert!(!s.advance_to_next());
        s.schedule(Duration::from_millis(900), TimerEvent::EndTurn);
        assert_eq!(s.pending(), 1);
        assert!(s.advance_to_next());
        assert_eq!(s.now(), Duration::from_millis(900));
        assert_eq!(s.next_due(), Some(TimerEvent::EndTurn));
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn system_scheduler_fires_zero_delay_immediately() {
        let mut s = SystemScheduler::new();
        s.schedule(Duration::ZERO, TimerEvent::Reveal);
        s.schedule(Duration::from_secs(3600), TimerEvent::EndTurn);
        assert_eq!(s.next_due(), Some(TimerEvent::Reveal));
        assert_eq!(s.next_due(), None);
        assert_eq!(s.pending(), 1);
    }
}
