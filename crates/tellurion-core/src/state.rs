use std::time::{Duration, Instant};

/// Shell-level state shared across frames.
pub struct AppState {
    pub started_at: Instant,
    pub status_line: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            status_line: "WHOAMI --LOCATION".to_string(),
        }
    }

    pub fn set_status(&mut self, line: impl Into<String>) {
        self.status_line = line.into();
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
