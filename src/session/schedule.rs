//! One-shot deferred actions keyed on session time.
//!
//! Nothing ever sleeps: the frame tick asks the scheduler which actions are
//! due at the current elapsed time and runs them.

/// Actions that can be deferred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    EndSession,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<(f64, ScheduledAction)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once the elapsed time reaches `at`
    pub fn schedule(&mut self, at: f64, action: ScheduledAction) {
        log::debug!("scheduled {action:?} at {at:.2}s");
        self.pending.push((at, action));
    }

    pub fn is_pending(&self, action: ScheduledAction) -> bool {
        self.pending.iter().any(|(_, pending)| *pending == action)
    }

    /// Remove and return every action due at `now`, earliest first
    pub fn due(&mut self, now: f64) -> Vec<ScheduledAction> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = pending;
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, action)| action).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
