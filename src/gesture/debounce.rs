//! Majority-vote debouncer with a hysteresis hold
//!
//! Raw per-frame readings flicker at transitions and under occlusion. The
//! debouncer keeps the last ten samples, commits open/closed as soon as either
//! gathers enough votes, and only lets the stable value decay to none once the
//! hold deadline of the last committed reading has passed.
//!
//! Every transition is a pure function of (state, sample, now) so the filter
//! can be driven from tests with synthetic timestamps.

use super::Gesture;
use crate::consts::GESTURE_WINDOW;
use crate::tuning::GestureTuning;

/// Fixed-capacity FIFO of raw samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureWindow {
    buf: [Gesture; GESTURE_WINDOW],
    head: usize,
    len: usize,
}

impl Default for GestureWindow {
    fn default() -> Self {
        Self {
            buf: [Gesture::None; GESTURE_WINDOW],
            head: 0,
            len: 0,
        }
    }
}

impl GestureWindow {
    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, sample: Gesture) {
        if self.len < GESTURE_WINDOW {
            self.buf[(self.head + self.len) % GESTURE_WINDOW] = sample;
            self.len += 1;
        } else {
            self.buf[self.head] = sample;
            self.head = (self.head + 1) % GESTURE_WINDOW;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Gesture> + '_ {
        (0..self.len).map(move |i| self.buf[(self.head + i) % GESTURE_WINDOW])
    }

    pub fn counts(&self) -> GestureCounts {
        let mut counts = GestureCounts::default();
        for sample in self.iter() {
            match sample {
                Gesture::Open => counts.open += 1,
                Gesture::Closed => counts.closed += 1,
                Gesture::None => counts.none += 1,
            }
        }
        counts
    }
}

/// Vote tally over the window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureCounts {
    pub open: usize,
    pub closed: usize,
    pub none: usize,
}

impl GestureCounts {
    /// Strongest reading in the window
    ///
    /// Open outranks closed when both reach their threshold. A window without
    /// any clear majority also reads as none; the hold in [`resolve`] decides
    /// whether that is allowed to show.
    pub fn candidate(&self, tuning: &GestureTuning) -> Gesture {
        if self.open >= tuning.open_votes {
            Gesture::Open
        } else if self.closed >= tuning.closed_votes {
            Gesture::Closed
        } else {
            Gesture::None
        }
    }
}

/// Debounced gesture plus the time before which it may not decay to none
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StableGesture {
    pub gesture: Gesture,
    /// Milliseconds, same clock as the `now` passed to [`resolve`]
    pub hold_until: f64,
}

/// Apply one vote tally to the stable gesture
pub fn resolve(
    current: StableGesture,
    counts: GestureCounts,
    now: f64,
    tuning: &GestureTuning,
) -> StableGesture {
    match counts.candidate(tuning) {
        gesture @ (Gesture::Open | Gesture::Closed) => StableGesture {
            gesture,
            hold_until: now + tuning.hold_ms,
        },
        Gesture::None if now >= current.hold_until => StableGesture {
            gesture: Gesture::None,
            hold_until: current.hold_until,
        },
        Gesture::None => current,
    }
}

/// Rolling window plus stable output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Debouncer {
    window: GestureWindow,
    stable: StableGesture,
    raw: Gesture,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition: the state after observing `sample` at `now`
    pub fn step(self, sample: Gesture, now: f64, tuning: &GestureTuning) -> Self {
        let mut window = self.window;
        window.push(sample);
        let stable = resolve(self.stable, window.counts(), now, tuning);
        Self {
            window,
            stable,
            raw: sample,
        }
    }

    /// Feed one raw reading and return the stable gesture
    pub fn observe(&mut self, sample: Gesture, now: f64, tuning: &GestureTuning) -> Gesture {
        *self = self.step(sample, now, tuning);
        self.stable.gesture
    }

    #[inline]
    pub fn stable(&self) -> Gesture {
        self.stable.gesture
    }

    #[inline]
    pub fn stable_state(&self) -> StableGesture {
        self.stable
    }

    /// Most recent raw reading
    #[inline]
    pub fn raw(&self) -> Gesture {
        self.raw
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(d: &mut Debouncer, sample: Gesture, times: usize, start: f64, step: f64) -> f64 {
        let tuning = GestureTuning::default();
        let mut t = start;
        for _ in 0..times {
            d.observe(sample, t, &tuning);
            t += step;
        }
        t
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut w = GestureWindow::default();
        w.push(Gesture::Open);
        for _ in 0..GESTURE_WINDOW {
            w.push(Gesture::Closed);
        }
        assert_eq!(w.len(), GESTURE_WINDOW);
        assert_eq!(w.counts().open, 0);
        assert_eq!(w.counts().closed, GESTURE_WINDOW);

        w.push(Gesture::None);
        let order: Vec<Gesture> = w.iter().collect();
        assert_eq!(order.last(), Some(&Gesture::None));
        assert_eq!(order.len(), GESTURE_WINDOW);
    }

    #[test]
    fn test_open_commits_on_fourth_vote() {
        let tuning = GestureTuning::default();
        let mut d = Debouncer::new();
        for i in 0..3 {
            assert_eq!(d.observe(Gesture::Open, i as f64 * 30.0, &tuning), Gesture::None);
        }
        assert_eq!(d.observe(Gesture::Open, 90.0, &tuning), Gesture::Open);
        assert_eq!(d.stable_state().hold_until, 440.0);
    }

    #[test]
    fn test_hold_then_decay() {
        let tuning = GestureTuning::default();
        let mut d = Debouncer::new();
        // Four opens, the last at t=90
        let mut t = feed(&mut d, Gesture::Open, 4, 0.0, 30.0);
        assert_eq!(d.stable(), Gesture::Open);

        // Six nones keep four opens in the window: still an open majority
        for _ in 0..6 {
            assert_eq!(d.observe(Gesture::None, t, &tuning), Gesture::Open);
            t += 30.0;
        }
        let last_majority = t - 30.0;
        assert_eq!(d.stable_state().hold_until, last_majority + 350.0);

        // First open evicted; the hold keeps the reading alive
        assert_eq!(d.observe(Gesture::None, t, &tuning), Gesture::Open);
        assert_eq!(
            d.observe(Gesture::None, last_majority + 349.0, &tuning),
            Gesture::Open
        );
        assert_eq!(
            d.observe(Gesture::None, last_majority + 350.0, &tuning),
            Gesture::None
        );
    }

    #[test]
    fn test_new_majority_overrides_hold() {
        let tuning = GestureTuning::default();
        let mut d = Debouncer::new();
        let t = feed(&mut d, Gesture::Open, 4, 0.0, 10.0);
        // Closed takes over once the opens drop below four votes
        let mut t = t;
        let mut last = Gesture::Open;
        for _ in 0..7 {
            last = d.observe(Gesture::Closed, t, &tuning);
            t += 10.0;
        }
        assert_eq!(last, Gesture::Closed);
        assert!(t < 350.0);
    }

    #[test]
    fn test_open_outranks_closed_on_tie() {
        let tuning = GestureTuning::default();
        let counts = GestureCounts {
            open: 5,
            closed: 5,
            none: 0,
        };
        assert_eq!(counts.candidate(&tuning), Gesture::Open);
    }

    #[test]
    fn test_weak_window_reads_none() {
        let tuning = GestureTuning::default();
        let counts = GestureCounts {
            open: 3,
            closed: 3,
            none: 4,
        };
        assert_eq!(counts.candidate(&tuning), Gesture::None);
        let held = StableGesture {
            gesture: Gesture::Closed,
            hold_until: 500.0,
        };
        assert_eq!(resolve(held, counts, 499.0, &tuning), held);
        assert_eq!(resolve(held, counts, 500.0, &tuning).gesture, Gesture::None);
    }

    #[test]
    fn test_step_is_pure() {
        let tuning = GestureTuning::default();
        let d = Debouncer::new();
        let a = d.step(Gesture::Open, 0.0, &tuning);
        let b = d.step(Gesture::Open, 0.0, &tuning);
        assert_eq!(a, b);
        assert_eq!(d, Debouncer::new());
        assert_eq!(a.raw(), Gesture::Open);
    }
}
