//! Fixed-interval pulse train.

/// Fires on the first tick after starting, then once per `interval` seconds.
/// A long tick fires at most once; missed pulses are not replayed.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseTrain {
    interval: f32,
    until_next: f32,
    running: bool,
}

impl PulseTrain {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            until_next: 0.0,
            running: false,
        }
    }

    pub fn from_millis(ms: u32) -> Self {
        Self::new(ms as f32 / 1000.0)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Returns true when a pulse is due this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            self.running = true;
            self.until_next = 0.0;
        }
        let mut fire = false;
        if self.until_next <= 0.0 {
            fire = true;
            self.until_next = self.interval;
        }
        if dt.is_finite() && dt > 0.0 {
            self.until_next -= dt;
        }
        fire
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.until_next = 0.0;
    }
}
