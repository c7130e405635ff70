use foundation::color::Color;
use foundation::math::Vec3;
use scene::circles::{latitude_circle, longitude_circle, longitude_seed_count};
use scene::draw::DrawSink;
use scene::hopf::hopf_fiber;
use scene::sphere::SphereFrame;

use super::{Counting, Selection, Tool, ToolKind};
use crate::color_cycle::ColorCycle;
use crate::config::{ConfigError, ViewerConfig};
use crate::mode::Mode;

/// Clicks on the base sphere S² draw the Hopf fibers over the chosen points.
///
/// - Point: a marker and its fiber, accumulated across clicks.
/// - Longitude: the meridian through the click, with fibers over its first
///   half (north pole to south pole).
/// - Latitude: the parallel through the click, with fibers over every sample.
///
/// The longitude/latitude asymmetry in fiber count is deliberate and kept.
#[derive(Debug, Clone)]
pub struct HopfTool {
    base: SphereFrame,
    /// Frame the projected fibers are placed in (origin and scale).
    fibers: SphereFrame,
    fiber_segments: usize,
    circle_samples: usize,
    guide_color: Color,
}

impl HopfTool {
    pub fn new(base: SphereFrame, fibers: SphereFrame) -> Self {
        Self {
            base,
            fibers,
            fiber_segments: scene::hopf::DEFAULT_FIBER_SEGMENTS,
            circle_samples: scene::circles::DEFAULT_CIRCLE_SAMPLES,
            guide_color: Color::WHITE,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Result<Self, ConfigError> {
        let base = SphereFrame::new(config.hopf.base_center(), config.hopf.base_radius);
        let fibers = SphereFrame::new(config.hopf.fiber_origin(), config.hopf.fiber_scale);
        Ok(Self {
            fiber_segments: config.fiber_segments,
            circle_samples: config.circle_samples,
            guide_color: config.guide()?,
            ..Self::new(base, fibers)
        })
    }

    pub fn with_resolution(mut self, fiber_segments: usize, circle_samples: usize) -> Self {
        self.fiber_segments = fiber_segments;
        self.circle_samples = circle_samples;
        self
    }

    fn draw_fiber(&self, n: Vec3, color: Color, sink: &mut dyn DrawSink) {
        let world: Vec<Vec3> = hopf_fiber(n, self.fiber_segments)
            .into_iter()
            .map(|p| self.fibers.to_world(p))
            .collect();
        sink.draw_polyline(&world, color);
    }

    fn draw_guide(&self, circle: &[Vec3], sink: &mut dyn DrawSink) {
        let world: Vec<Vec3> = circle.iter().map(|&p| self.base.to_world(p)).collect();
        sink.draw_polyline(&world, self.guide_color);
    }
}

impl Tool for HopfTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Hopf
    }

    fn sphere(&self) -> SphereFrame {
        self.base
    }

    fn select(
        &mut self,
        mode: Mode,
        hit: Vec3,
        colors: &mut ColorCycle,
        sink: &mut dyn DrawSink,
    ) -> Selection {
        let Some(n) = self.base.surface_unit(hit) else {
            return Selection::Ignored;
        };
        let mut sink = Counting::new(sink);

        match mode {
            Mode::None => return Selection::Ignored,
            Mode::Point => {
                let color = colors.next_color();
                sink.draw_marker(self.base.to_world(n), color);
                self.draw_fiber(n, color, &mut sink);
            }
            Mode::Longitude => {
                sink.clear();
                let circle = longitude_circle(n, self.circle_samples);
                self.draw_guide(&circle, &mut sink);
                for &q in circle.iter().take(longitude_seed_count(self.circle_samples)) {
                    self.draw_fiber(q, colors.next_color(), &mut sink);
                }
            }
            Mode::Latitude => {
                sink.clear();
                let circle = latitude_circle(n, self.circle_samples);
                self.draw_guide(&circle, &mut sink);
                for &q in &circle {
                    self.draw_fiber(q, colors.next_color(), &mut sink);
                }
            }
        }

        sink.finish()
    }
}
