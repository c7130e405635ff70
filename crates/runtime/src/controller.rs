//! Mode and selection state machine shared by both visualizations.
//!
//! States are {Idle, Point, Longitude, Latitude} x {unfrozen, frozen}. The
//! controller owns the drawn artifacts, so a mode change and the clearing that
//! goes with it are a single transition.

use foundation::math::Vec3;
use foundation::time::Millis;
use scene::draw::{DrawList, DrawSink};
use scene::picking::Ray;
use tracing::{debug, warn};

use crate::color_cycle::ColorCycle;
use crate::config::{ConfigError, ViewerConfig};
use crate::event_bus::{Event, EventBus, EventKind};
use crate::frame::Frame;
use crate::mode::Mode;
use crate::tools::{Selection, Tool, ToolKind};

/// Result of feeding one click into the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The ray did not hit the sphere.
    Missed,
    Frozen,
    Idle,
    Drawn { polylines: usize, markers: usize },
    /// The tool had nothing to draw for this point.
    Ignored,
    /// Nothing drawn; the message was also emitted as a warning event.
    Warned(String),
}

#[derive(Debug)]
pub struct Controller<T: Tool> {
    tool: T,
    mode: Mode,
    frozen: bool,
    colors: ColorCycle,
    artifacts: DrawList,
    events: EventBus,
    frame: Frame,
}

impl Controller<Box<dyn Tool>> {
    /// Controller for `kind`, with tool geometry and palette taken from `config`.
    pub fn from_config(kind: ToolKind, config: &ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tool = kind.build(config)?;
        Ok(Self::with_colors(tool, ColorCycle::new(config.palette_colors()?)))
    }
}

impl<T: Tool> Controller<T> {
    pub fn new(tool: T) -> Self {
        Self::with_colors(tool, ColorCycle::default())
    }

    pub fn with_colors(tool: T, colors: ColorCycle) -> Self {
        Self {
            tool,
            mode: Mode::None,
            frozen: false,
            colors,
            artifacts: DrawList::new(),
            events: EventBus::new(),
            frame: Frame::default(),
        }
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn colors(&self) -> &ColorCycle {
        &self.colors
    }

    pub fn artifacts(&self) -> &DrawList {
        &self.artifacts
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// Warning messages still in the event log.
    pub fn warnings(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.warnings()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn advance_frame(&mut self, now: Millis) -> Frame {
        self.frame = self.frame.next(now);
        self.frame
    }

    /// Checkbox semantics: enabling a mode makes it the only active one and
    /// clears the drawing; unchecking the active mode returns to idle.
    pub fn set_mode(&mut self, mode: Mode, enabled: bool) {
        if mode.is_idle() {
            if self.mode.is_idle() {
                return;
            }
            self.enter(Mode::None);
            return;
        }
        if enabled {
            self.enter(mode);
        } else if self.mode == mode {
            self.enter(Mode::None);
        }
    }

    fn enter(&mut self, mode: Mode) {
        let previous = self.mode;
        self.mode = mode;
        self.artifacts.clear();
        debug!(tool = %self.tool.kind(), %previous, %mode, "mode changed");
        self.events
            .emit(self.frame, EventKind::Mode, format!("{previous} -> {mode}"));
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        if self.frozen == frozen {
            return;
        }
        self.frozen = frozen;
        debug!(tool = %self.tool.kind(), frozen, "freeze toggled");
        let message = if frozen { "frozen" } else { "unfrozen" };
        self.events.emit(self.frame, EventKind::Freeze, message);
    }

    pub fn toggle_frozen(&mut self) -> bool {
        self.set_frozen(!self.frozen);
        self.frozen
    }

    /// Back to the initial state: idle, unfrozen, nothing drawn, palette restarted.
    pub fn reset(&mut self) {
        self.mode = Mode::None;
        self.frozen = false;
        self.artifacts.clear();
        self.colors.reset();
        debug!(tool = %self.tool.kind(), "reset");
        self.events.emit(self.frame, EventKind::Reset, "reset");
    }

    /// Handles a click whose ray hit the sphere at `hit` (or missed it).
    pub fn select(&mut self, hit: Option<Vec3>) -> ClickOutcome {
        let Some(hit) = hit else {
            return ClickOutcome::Missed;
        };
        if self.frozen {
            return ClickOutcome::Frozen;
        }
        if self.mode.is_idle() {
            return ClickOutcome::Idle;
        }

        let selection = self
            .tool
            .select(self.mode, hit, &mut self.colors, &mut self.artifacts);
        match selection {
            Selection::Drawn { polylines, markers } => {
                debug!(
                    tool = %self.tool.kind(),
                    mode = %self.mode,
                    polylines,
                    markers,
                    "selection drawn"
                );
                self.events.emit(
                    self.frame,
                    EventKind::Selection,
                    format!("{} at ({:.3}, {:.3}, {:.3})", self.mode, hit.x, hit.y, hit.z),
                );
                ClickOutcome::Drawn { polylines, markers }
            }
            Selection::Refused(err) => {
                let message = err.to_string();
                warn!(tool = %self.tool.kind(), mode = %self.mode, "{message}");
                self.events
                    .emit(self.frame, EventKind::Warning, message.clone());
                ClickOutcome::Warned(message)
            }
            Selection::Ignored => ClickOutcome::Ignored,
        }
    }

    /// Ray-casts against the tool's sphere, then selects.
    pub fn pick_and_select(&mut self, ray: Ray) -> ClickOutcome {
        let hit = self.tool.pick(ray);
        self.select(hit)
    }
}
