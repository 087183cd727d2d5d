//! Process-wide readiness and liveness flags
//!
//! Written once by the startup sequence, read by every probe and prediction.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct ReadinessState {
    ready: AtomicBool,
    alive: AtomicBool,
}

impl ReadinessState {
    /// Starts not ready and alive.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            alive: AtomicBool::new(true),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Slot for the hosting environment; nothing in the service clears it.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_initial_state() {
        let state = ReadinessState::new();
        assert!(!state.is_ready());
        assert!(state.is_alive());
    }

    #[test]
    fn test_readiness_does_not_touch_liveness() {
        let state = ReadinessState::new();
        state.set_ready(true);
        assert!(state.is_ready());
        assert!(state.is_alive());

        state.set_ready(false);
        assert!(!state.is_ready());
        assert!(state.is_alive());
    }

    #[test]
    fn test_visible_across_threads() {
        let state = Arc::new(ReadinessState::new());
        let writer = {
            let state = state.clone();
            std::thread::spawn(move || state.set_ready(true))
        };
        writer.join().unwrap();
        assert!(state.is_ready());
    }
}
