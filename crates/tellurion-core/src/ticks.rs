use std::time::{Duration, Instant};

/// Measures ticks-per-second over fixed windows.
///
/// Call [`record`](TickRate::record) once per tick; [`per_second`]
/// (TickRate::per_second) reports the rate computed over the most recently
/// completed window, so the reading is stable between window boundaries
/// instead of jittering every frame.
pub struct TickRate {
    window: Duration,
    window_start: Option<Instant>,
    ticks_in_window: u32,
    rate: f64,
}

impl Default for TickRate {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl TickRate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            window_start: None,
            ticks_in_window: 0,
            rate: 0.0,
        }
    }

    /// Record a tick; closes the window and updates the rate when a full
    /// window has elapsed.
    pub fn record(&mut self, now: Instant) {
        match self.window_start {
            None => {
                self.window_start = Some(now);
                self.ticks_in_window = 1;
            }
            Some(start) => {
                let elapsed = now.saturating_duration_since(start);
                if elapsed >= self.window {
                    self.rate = f64::from(self.ticks_in_window) / elapsed.as_secs_f64();
                    self.window_start = Some(now);
                    self.ticks_in_window = 1;
                } else {
                    self.ticks_in_window += 1;
                }
            }
        }
    }

    /// Rate from the last completed window; `0.0` until one has closed.
    pub fn per_second(&self) -> f64 {
        self.rate
    }
}
