//! Game time
//!
//! Fixed-interval ticks for ambient effects (garden growth) and a per-engine
//! timeline of delayed transitions driven by a monotonic elapsed clock.

use std::time::Duration;

/// Fires once every `tick_interval` of accumulated time
#[derive(Debug, Clone)]
pub struct AmbientTime {
    /// Interval for effect ticks (in seconds)
    tick_interval: f32,
    /// Time since last tick
    since_last_tick: f32,
}

impl AmbientTime {
    /// Create a new ambient timer
    pub fn new(tick_interval: f32) -> Self {
        Self {
            tick_interval: tick_interval.max(f32::EPSILON),
            since_last_tick: 0.0,
        }
    }

    /// Advance the timer and return how many ticks became due.
    ///
    /// A long frame (e.g. after the terminal was suspended) can owe several
    /// ticks at once.
    pub fn update(&mut self, delta: Duration) -> u32 {
        self.since_last_tick += delta.as_secs_f32();

        let mut ticks = 0;
        while self.since_last_tick >= self.tick_interval {
            self.since_last_tick -= self.tick_interval;
            ticks += 1;
        }
        ticks
    }
}

impl Default for AmbientTime {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Handle for a scheduled transition, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

/// Delayed transitions for a single round engine.
///
/// The clock never moves backwards. Events come
/// out in due order; events with the same due time come out in the order
/// they were scheduled.
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current position of the monotonic clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` from now
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Cancel a pending event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Drop every pending event
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Clock position `delta` from now
    pub fn deadline(&self, delta: Duration) -> Duration {
        self.now + delta
    }

    /// Pop the earliest event due at or before `deadline`, moving the clock
    /// to that event's due time.
    ///
    /// Engines fire events one at a time through this, so anything an event
    /// handler schedules is timed from the moment the event fired rather than
    /// from the end of the frame.
    pub fn pop_until(&mut self, deadline: Duration) -> Option<E> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= deadline)
            .min_by_key(|(_, s)| (s.due, s.id.0))
            .map(|(i, _)| i)?;
        let scheduled = self.pending.remove(idx);
        self.now = self.now.max(scheduled.due);
        Some(scheduled.event)
    }

    /// Move the clock to `deadline` (never backwards)
    pub fn settle_at(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the timeline the way an engine's update does
    fn run<E>(timeline: &mut Timeline<E>, delta: Duration) -> Vec<E> {
        let deadline = timeline.deadline(delta);
        let mut fired = Vec::new();
        while let Some(event) = timeline.pop_until(deadline) {
            fired.push(event);
        }
        timeline.settle_at(deadline);
        fired
    }

    #[test]
    fn test_ambient_ticks() {
        let mut time = AmbientTime::new(1.0);
        assert_eq!(time.update(Duration::from_millis(500)), 0);
        assert_eq!(time.update(Duration::from_millis(600)), 1);
        assert_eq!(time.update(Duration::from_millis(2000)), 2);
    }

    #[test]
    fn test_timeline_fires_in_due_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(300), "late");
        timeline.schedule(Duration::from_millis(100), "early");
        timeline.schedule(Duration::from_millis(100), "early-second");

        assert!(run(&mut timeline, Duration::from_millis(50)).is_empty());
        assert_eq!(
            run(&mut timeline, Duration::from_millis(100)),
            vec!["early", "early-second"]
        );
        assert_eq!(run(&mut timeline, Duration::from_millis(200)), vec!["late"]);
        assert!(run(&mut timeline, Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_timeline_cancel() {
        let mut timeline = Timeline::new();
        let id = timeline.schedule(Duration::from_millis(100), 1);
        timeline.schedule(Duration::from_millis(100), 2);

        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));
        assert_eq!(run(&mut timeline, Duration::from_secs(1)), vec![2]);
    }

    #[test]
    fn test_timeline_clear_drops_everything() {
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(10), ());
        timeline.schedule(Duration::from_millis(20), ());
        timeline.clear();
        assert!(run(&mut timeline, Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_pop_until_moves_clock_to_due_time() {
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(100), "first");
        let deadline = timeline.deadline(Duration::from_secs(1));

        assert_eq!(timeline.pop_until(deadline), Some("first"));
        assert_eq!(timeline.now(), Duration::from_millis(100));

        // Scheduled from inside a handler: timed from the firing moment
        timeline.schedule(Duration::from_millis(100), "chained");
        assert_eq!(timeline.pop_until(deadline), Some("chained"));
        assert_eq!(timeline.now(), Duration::from_millis(200));

        assert_eq!(timeline.pop_until(deadline), None);
        timeline.settle_at(deadline);
        assert_eq!(timeline.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut timeline: Timeline<()> = Timeline::new();
        run(&mut timeline, Duration::from_millis(400));
        timeline.settle_at(Duration::from_millis(100));
        assert_eq!(timeline.now(), Duration::from_millis(400));
    }
}
