use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    Mode,
    Freeze,
    Reset,
    Selection,
    /// Shown to the user, e.g. a click too close to the projection pole.
    Warning,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Mode => "mode",
            EventKind::Freeze => "freeze",
            EventKind::Reset => "reset",
            EventKind::Selection => "selection",
            EventKind::Warning => "warning",
        }
    }
}

/// Interaction event, stamped with the frame it happened in.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Messages the user should see, oldest first.
    pub fn warnings(&self) -> impl Iterator<Item = &str> + '_ {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Warning)
            .map(|e| e.message.as_str())
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventKind};
    use crate::frame::Frame;
    use foundation::time::Millis;

    #[test]
    fn stamps_events_with_the_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::default().next(Millis(0.0)).next(Millis(5.0));
        bus.emit(f, EventKind::Mode, "none -> point");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
    }

    #[test]
    fn keeps_emission_order() {
        let mut bus = EventBus::new();
        bus.emit(Frame::default(), EventKind::Selection, "drew");
        bus.emit(Frame::default(), EventKind::Warning, "too close");
        let labels: Vec<_> = bus.events().iter().map(|e| e.kind.label()).collect();
        assert_eq!(labels, ["selection", "warning"]);
    }

    #[test]
    fn warnings_skip_other_kinds() {
        let mut bus = EventBus::new();
        bus.emit(Frame::default(), EventKind::Warning, "too close");
        bus.emit(Frame::default(), EventKind::Selection, "point at (1, 1, 0)");
        bus.emit(Frame::default(), EventKind::Warning, "still too close");
        let warnings: Vec<_> = bus.warnings().collect();
        assert_eq!(warnings, ["too close", "still too close"]);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Frame::default(), EventKind::Reset, "reset");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
