use foundation::color::Color;
use foundation::math::Vec3;
use scene::circles::{latitude_circle, longitude_circle};
use scene::draw::DrawSink;
use scene::sphere::SphereFrame;
use scene::stereographic::{ARC_SKIP_DISTANCE, StereoRig};

use super::{Counting, Selection, Tool, ToolKind};
use crate::color_cycle::ColorCycle;
use crate::config::{ConfigError, ViewerConfig};
use crate::mode::Mode;

/// A sphere resting on the ground plane, projected from its north pole.
///
/// Every mode replaces what was drawn before. Clicks within the pole guard
/// are refused in all modes and leave the current drawing alone.
#[derive(Debug, Clone)]
pub struct StereoTool {
    rig: StereoRig,
    circle_samples: usize,
    arc_skip: f64,
    overlay_scale: f64,
    guide_color: Color,
}

impl StereoTool {
    pub fn new(rig: StereoRig) -> Self {
        Self {
            rig,
            circle_samples: scene::circles::DEFAULT_CIRCLE_SAMPLES,
            arc_skip: ARC_SKIP_DISTANCE,
            overlay_scale: 1.005,
            guide_color: Color::WHITE,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Result<Self, ConfigError> {
        let s = &config.stereo;
        let rig = StereoRig::new(SphereFrame::new(s.sphere_center(), s.sphere_radius))
            .with_pole_guard(s.pole_guard);
        Ok(Self {
            circle_samples: config.circle_samples,
            arc_skip: s.arc_skip,
            overlay_scale: s.overlay_scale,
            guide_color: config.guide()?,
            ..Self::new(rig)
        })
    }

    /// Draws a sphere-side circle and its projected image in one color.
    fn draw_circle(&self, local: &[Vec3], color: Color, sink: &mut dyn DrawSink) {
        let sphere = self.rig.sphere;
        let overlay: Vec<Vec3> = local
            .iter()
            .map(|&p| sphere.to_world_scaled(p, self.overlay_scale))
            .collect();
        sink.draw_polyline(&overlay, color);

        let surface: Vec<Vec3> = local.iter().map(|&p| sphere.to_world(p)).collect();
        for run in self.rig.project_runs(&surface, self.arc_skip) {
            sink.draw_polyline(&run, color);
        }
    }
}

impl Tool for StereoTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Stereographic
    }

    fn sphere(&self) -> SphereFrame {
        self.rig.sphere
    }

    fn select(
        &mut self,
        mode: Mode,
        hit: Vec3,
        colors: &mut ColorCycle,
        sink: &mut dyn DrawSink,
    ) -> Selection {
        if mode.is_idle() {
            return Selection::Ignored;
        }
        if let Err(err) = self.rig.check_pole(hit) {
            return Selection::Refused(err);
        }
        let Some(n) = self.rig.sphere.surface_unit(hit) else {
            return Selection::Ignored;
        };
        let mut sink = Counting::new(sink);

        match mode {
            Mode::None => return Selection::Ignored,
            Mode::Point => {
                let projected = match self.rig.project(hit) {
                    Ok(p) => p,
                    Err(err) => return Selection::Refused(err),
                };
                sink.clear();
                let color = colors.next_color();
                sink.draw_marker(hit, color);
                sink.draw_polyline(&[self.rig.north_pole, projected], self.guide_color);
                sink.draw_marker(projected, color);
            }
            Mode::Longitude => {
                sink.clear();
                let circle = longitude_circle(n, self.circle_samples);
                self.draw_circle(&circle, colors.next_color(), &mut sink);
            }
            Mode::Latitude => {
                sink.clear();
                let circle = latitude_circle(n, self.circle_samples);
                self.draw_circle(&circle, colors.next_color(), &mut sink);
            }
        }

        sink.finish()
    }
}
