//! The two visualizations, as implementations of `Tool`.
//!
//! A tool turns a selected surface point into drawing for the active mode.
//! Mode bookkeeping, freezing and clearing on mode switches live in the
//! controller, not here.

mod hopf;
mod stereo;

pub use hopf::HopfTool;
pub use stereo::StereoTool;

use foundation::math::Vec3;
use scene::draw::DrawSink;
use scene::picking::{Ray, ray_hit_sphere};
use scene::sphere::SphereFrame;
use scene::stereographic::ProjectionError;

use crate::color_cycle::ColorCycle;
use crate::config::{ConfigError, ViewerConfig};
use crate::mode::Mode;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Hopf,
    Stereographic,
}

impl ToolKind {
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Hopf => "hopf",
            ToolKind::Stereographic => "stereo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hopf" => Some(ToolKind::Hopf),
            "stereo" | "stereographic" => Some(ToolKind::Stereographic),
            _ => None,
        }
    }

    /// Capture file name prefix for this tool.
    pub fn capture_prefix(self, config: &ViewerConfig) -> &str {
        match self {
            ToolKind::Hopf => &config.capture.hopf_prefix,
            ToolKind::Stereographic => &config.capture.stereo_prefix,
        }
    }

    /// Builds the tool from `config`.
    pub fn build(self, config: &ViewerConfig) -> Result<Box<dyn Tool>, ConfigError> {
        Ok(match self {
            ToolKind::Hopf => Box::new(HopfTool::from_config(config)?),
            ToolKind::Stereographic => Box::new(StereoTool::from_config(config)?),
        })
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a tool did with a selection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Selection {
    Drawn { polylines: usize, markers: usize },
    /// Nothing drawn; the point cannot be used in this mode.
    Refused(ProjectionError),
    /// Nothing to do for this mode or point.
    Ignored,
}

pub trait Tool: std::fmt::Debug {
    fn kind(&self) -> ToolKind;

    /// The sphere the user clicks on.
    fn sphere(&self) -> SphereFrame;

    /// Draws the artifacts for `hit` (a world-space point on `sphere()`).
    fn select(
        &mut self,
        mode: Mode,
        hit: Vec3,
        colors: &mut ColorCycle,
        sink: &mut dyn DrawSink,
    ) -> Selection;

    /// Surface point under `ray`, if any.
    fn pick(&self, ray: Ray) -> Option<Vec3> {
        ray_hit_sphere(ray, self.sphere())
    }
}

impl<T: Tool + ?Sized> Tool for Box<T> {
    fn kind(&self) -> ToolKind {
        (**self).kind()
    }

    fn sphere(&self) -> SphereFrame {
        (**self).sphere()
    }

    fn select(
        &mut self,
        mode: Mode,
        hit: Vec3,
        colors: &mut ColorCycle,
        sink: &mut dyn DrawSink,
    ) -> Selection {
        (**self).select(mode, hit, colors, sink)
    }
}

/// Counts commands pushed through a sink, for `Selection::Drawn`.
struct Counting<'a> {
    inner: &'a mut dyn DrawSink,
    polylines: usize,
    markers: usize,
}

impl<'a> Counting<'a> {
    fn new(inner: &'a mut dyn DrawSink) -> Self {
        Self {
            inner,
            polylines: 0,
            markers: 0,
        }
    }

    fn finish(self) -> Selection {
        Selection::Drawn {
            polylines: self.polylines,
            markers: self.markers,
        }
    }
}

impl DrawSink for Counting<'_> {
    fn clear(&mut self) {
        self.inner.clear();
    }

    fn draw_polyline(&mut self, points: &[Vec3], color: foundation::color::Color) {
        self.polylines += 1;
        self.inner.draw_polyline(points, color);
    }

    fn draw_marker(&mut self, point: Vec3, color: foundation::color::Color) {
        self.markers += 1;
        self.inner.draw_marker(point, color);
    }
}
