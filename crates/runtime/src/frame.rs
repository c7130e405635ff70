use foundation::time::Millis;

/// Render-loop frame stamp.
///
/// The viewer advances one frame per animation callback, passing the wall
/// clock. Events carry the frame index so a session log lines up with what
/// was on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Wall-clock time the frame started, `None` before the first tick.
    pub started_at: Option<Millis>,
    /// Milliseconds since the previous frame; zero for the first tick.
    pub dt_ms: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            index: 0,
            started_at: None,
            dt_ms: 0.0,
        }
    }
}

impl Frame {
    /// The frame after `self`, started at `now`.
    ///
    /// A clock that steps backwards yields `dt_ms == 0`.
    pub fn next(self, now: Millis) -> Self {
        let dt_ms = match self.started_at {
            Some(prev) if now.0 > prev.0 => now.0 - prev.0,
            _ => 0.0,
        };
        Self {
            index: self.index + 1,
            started_at: Some(now),
            dt_ms,
        }
    }
}
