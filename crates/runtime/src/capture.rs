//! Screenshot bookkeeping.
//!
//! The viewer hides its overlay, renders once, exports the canvas and then
//! restores the overlay after a short delay. This module owns the naming and
//! the restore deadline; the DOM work stays in the web app.

use foundation::time::Millis;

use crate::config::CaptureSettings;

/// `<prefix>-<unix millis>.png`
pub fn capture_file_name(prefix: &str, now: Millis) -> String {
    format!("{prefix}-{}.png", now.as_whole())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub file_name: String,
    /// When the overlay should come back.
    pub restore_at: Millis,
}

#[derive(Debug, Clone)]
pub struct Capture {
    prefix: String,
    restore_delay_ms: f64,
    restore_at: Option<Millis>,
}

impl Capture {
    pub fn new(prefix: impl Into<String>, restore_delay_ms: f64) -> Self {
        Self {
            prefix: prefix.into(),
            restore_delay_ms,
            restore_at: None,
        }
    }

    pub fn from_settings(prefix: &str, settings: &CaptureSettings) -> Self {
        Self::new(prefix, settings.restore_delay_ms)
    }

    /// Starts a capture. A capture already pending has its deadline moved.
    pub fn begin(&mut self, now: Millis) -> CaptureRequest {
        let restore_at = now.after(self.restore_delay_ms);
        self.restore_at = Some(restore_at);
        CaptureRequest {
            file_name: capture_file_name(&self.prefix, now),
            restore_at,
        }
    }

    /// True once the restore deadline has passed; the capture is then finished.
    pub fn poll(&mut self, now: Millis) -> bool {
        match self.restore_at {
            Some(at) if now.0 >= at.0 => {
                self.restore_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.restore_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Capture, capture_file_name};
    use crate::config::CaptureSettings;
    use foundation::time::Millis;

    #[test]
    fn file_name_uses_whole_milliseconds() {
        assert_eq!(
            capture_file_name("hopf-fibration", Millis(1_700_000_000_123.9)),
            "hopf-fibration-1700000000123.png"
        );
        assert_eq!(capture_file_name("capture", Millis(42.0)), "capture-42.png");
    }

    #[test]
    fn restores_after_the_delay() {
        let mut cap = Capture::from_settings("capture", &CaptureSettings::default());
        let req = cap.begin(Millis(1000.0));
        assert_eq!(req.file_name, "capture-1000.png");
        assert_eq!(req.restore_at, Millis(1150.0));
        assert!(cap.is_pending());

        assert!(!cap.poll(Millis(1100.0)));
        assert!(cap.poll(Millis(1150.0)));
        assert!(!cap.is_pending());
        assert!(!cap.poll(Millis(2000.0)));
    }

    #[test]
    fn retrigger_moves_the_deadline() {
        let mut cap = Capture::new("capture", 120.0);
        cap.begin(Millis(0.0));
        cap.begin(Millis(100.0));
        assert!(!cap.poll(Millis(150.0)));
        assert!(cap.poll(Millis(220.0)));
    }

    #[test]
    fn idle_capture_never_restores() {
        let mut cap = Capture::new("capture", 150.0);
        assert!(!cap.is_pending());
        assert!(!cap.poll(Millis(1e12)));
    }
}
