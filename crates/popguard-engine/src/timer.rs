//! Countdown timer bookkeeping
//!
//! At most one live timer exists per controller. Arming hands out a
//! generation-stamped handle and implicitly cancels the previous one,
//! so a tick from a cancelled countdown can never decrement the fresh
//! one. Resolutions cancel the handle before any other effect.

/// Opaque handle identifying one armed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug, Default)]
pub(crate) struct CountdownTimer {
    generation: u64,
    armed: Option<u64>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a fresh countdown, invalidating any previously issued handle.
    pub fn arm(&mut self) -> TimerHandle {
        self.generation += 1;
        self.armed = Some(self.generation);
        TimerHandle(self.generation)
    }

    /// Disarm the current countdown, if any.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Whether a tick carrying this handle belongs to the live countdown.
    pub fn accepts(&self, handle: TimerHandle) -> bool {
        self.armed == Some(handle.0)
    }

    /// Handle of the live countdown, if one is armed.
    pub fn current(&self) -> Option<TimerHandle> {
        self.armed.map(TimerHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_invalidates_previous_handle() {
        let mut timer = CountdownTimer::new();

        let first = timer.arm();
        assert!(timer.accepts(first));

        let second = timer.arm();
        assert!(!timer.accepts(first));
        assert!(timer.accepts(second));
    }

    #[test]
    fn test_cancel_disarms() {
        let mut timer = CountdownTimer::new();

        let handle = timer.arm();
        timer.cancel();

        assert!(timer.current().is_none());
        assert!(!timer.accepts(handle));
    }

    #[test]
    fn test_handle_from_before_cancel_stays_dead_after_rearm() {
        let mut timer = CountdownTimer::new();

        let stale = timer.arm();
        timer.cancel();
        let fresh = timer.arm();

        assert!(!timer.accepts(stale));
        assert!(timer.accepts(fresh));
    }
}
