//! Timed two-state traffic signals
//!
//! Each signal cycles GREEN -> RED -> GREEN on its own durations, driven by
//! the simulation clock. Signals are created once at startup and never
//! destroyed.

/// A traffic signal at a fixed position along the corridor.
///
/// The initial state is GREEN with the phase timer starting at clock zero.
/// Tests rely on that being stable.
#[derive(Debug, Clone)]
pub struct SignalController {
    position: usize,
    name: &'static str,
    red: bool,
    green_ms: u64,
    red_ms: u64,
    last_transition_ms: u64,
}

impl SignalController {
    pub fn new(position: usize, name: &'static str, green_ms: u64, red_ms: u64) -> Self {
        Self {
            position,
            name,
            red: false,
            green_ms,
            red_ms,
            last_transition_ms: 0,
        }
    }

    /// Advance the state machine. A no-op until the duration for the current
    /// state has elapsed, then the state flips and the phase timer restarts.
    pub fn update(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.last_transition_ms);
        if self.red && elapsed >= self.red_ms {
            self.red = false;
            self.last_transition_ms = now_ms;
        } else if !self.red && elapsed >= self.green_ms {
            self.red = true;
            self.last_transition_ms = now_ms;
        }
    }

    /// Restore the initial GREEN phase. Used when the world clock restarts.
    pub fn reset_clock(&mut self) {
        self.red = false;
        self.last_transition_ms = 0;
    }

    pub fn is_red(&self) -> bool {
        self.red
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
