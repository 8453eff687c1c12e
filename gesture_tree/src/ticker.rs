//! Tick sources.
//!
//! The scene loop pulls frames from a [`TickSource`] instead of scheduling
//! itself; stopping the source stops the scene.

use std::thread;
use std::time::{Duration, Instant};

pub trait TickSource {
    /// Seconds since the previous tick, or `None` to stop.
    fn next_tick(&mut self) -> Option<f32>;
}

/// Sleep-paced ticker with an optional frame limit.
pub struct FixedRateTicker {
    period:    Option<Duration>,
    remaining: Option<u64>,
    last:      Option<Instant>,
}

impl FixedRateTicker {
    pub fn new(fps: u32) -> Self {
        FixedRateTicker {
            period:    Some(Duration::from_secs(1) / fps.max(1)),
            remaining: None,
            last:      None,
        }
    }

    /// Never sleeps; every tick reports exactly one nominal frame.
    pub fn unpaced() -> Self {
        FixedRateTicker { period: None, remaining: None, last: None }
    }

    /// Stop after `frames` ticks.
    pub fn limited(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

/// Nominal frame length reported by an unpaced ticker.
const NOMINAL_DT: f32 = 1.0 / 60.0;

impl TickSource for FixedRateTicker {
    fn next_tick(&mut self) -> Option<f32> {
        if let Some(n) = self.remaining.as_mut() {
            if *n == 0 {
                return None;
            }
            *n -= 1;
        }

        let Some(period) = self.period else {
            return Some(NOMINAL_DT);
        };

        let now = Instant::now();
        let dt = match self.last {
            Some(last) => {
                let since = now.duration_since(last);
                if since < period {
                    thread::sleep(period - since);
                }
                Instant::now().duration_since(last)
            }
            None => period,
        };
        self.last = Some(Instant::now());
        Some(dt.as_secs_f32())
    }
}
