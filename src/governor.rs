use std::time::{Duration, Instant};

pub const DEFAULT_SCROLL_IDLE: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDecision {
    Run,
    Skip,
}

/// Decides per tick whether the field updates at all. Skips everything
/// while hidden and runs every other tick while a scroll is in progress.
#[derive(Debug)]
pub struct FrameGovernor {
    hidden: bool,
    last_scroll: Option<Instant>,
    scroll_idle: Duration,
    odd_tick: bool,
}

impl FrameGovernor {
    pub fn new(scroll_idle: Duration) -> Self {
        Self {
            hidden: false,
            last_scroll: None,
            scroll_idle,
            odd_tick: false,
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden != self.hidden {
            log::debug!("governor: hidden={hidden}");
        }
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Record scroll activity; each call restarts the idle timer.
    pub fn note_scroll(&mut self, now: Instant) {
        self.last_scroll = Some(now);
    }

    pub fn is_scrolling(&self, now: Instant) -> bool {
        self.last_scroll
            .is_some_and(|at| now.saturating_duration_since(at) < self.scroll_idle)
    }

    pub fn decide(&mut self, now: Instant) -> FrameDecision {
        if self.hidden {
            return FrameDecision::Skip;
        }
        if !self.is_scrolling(now) {
            self.odd_tick = false;
            return FrameDecision::Run;
        }
        self.odd_tick = !self.odd_tick;
        if self.odd_tick {
            FrameDecision::Run
        } else {
            FrameDecision::Skip
        }
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.hidden {
            "paused"
        } else if self.is_scrolling(now) {
            "half-rate"
        } else {
            "full"
        }
    }
}

impl Default for FrameGovernor {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_IDLE)
    }
}
