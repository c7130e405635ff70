//! Viewer configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config and
//! partial files only override what they name.

use foundation::color::{Color, ColorParseError};
use foundation::math::Vec3;
use scene::circles::DEFAULT_CIRCLE_SAMPLES;
use scene::hopf::DEFAULT_FIBER_SEGMENTS;
use scene::stereographic::{ARC_SKIP_DISTANCE, POLE_GUARD_DISTANCE};
use serde::{Deserialize, Serialize};

use crate::color_cycle::DEFAULT_PALETTE;

/// Bounds for the UI restore delay after a capture (milliseconds).
pub const CAPTURE_RESTORE_DELAY_RANGE_MS: (f64, f64) = (100.0, 150.0);

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Json(String),
    Invalid(String),
    Color(ColorParseError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "config is not valid JSON: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
            ConfigError::Color(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ColorParseError> for ConfigError {
    fn from(err: ColorParseError) -> Self {
        ConfigError::Color(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Samples per Hopf fiber.
    pub fiber_segments: usize,
    /// Samples per longitude/latitude circle.
    pub circle_samples: usize,
    /// `#rrggbb` colors handed out to successive fibers and circles.
    pub palette: Vec<String>,
    /// Color of guide circles and projection rays.
    pub guide_color: String,
    pub hopf: HopfSettings,
    pub stereo: StereoSettings,
    pub capture: CaptureSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopfSettings {
    /// Center of the clickable base sphere S².
    pub base_center: [f64; 3],
    pub base_radius: f64,
    /// Where the projected fibers are placed, and their scale.
    pub fiber_origin: [f64; 3],
    pub fiber_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoSettings {
    pub sphere_center: [f64; 3],
    pub sphere_radius: f64,
    /// Clicks closer than this to the north pole raise a warning.
    pub pole_guard: f64,
    /// Curve samples closer than this to the north pole are not projected.
    pub arc_skip: f64,
    /// Guide circles are drawn this much outside the sphere surface.
    pub overlay_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub restore_delay_ms: f64,
    pub hopf_prefix: String,
    pub stereo_prefix: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fiber_segments: DEFAULT_FIBER_SEGMENTS,
            circle_samples: DEFAULT_CIRCLE_SAMPLES,
            palette: DEFAULT_PALETTE
                .iter()
                .map(|hex| format!("#{hex:06x}"))
                .collect(),
            guide_color: "#ffffff".to_string(),
            hopf: HopfSettings::default(),
            stereo: StereoSettings::default(),
            capture: CaptureSettings::default(),
        }
    }
}

impl Default for HopfSettings {
    fn default() -> Self {
        Self {
            base_center: [-3.0, 0.0, 0.0],
            base_radius: 1.0,
            fiber_origin: [1.5, 0.0, 0.0],
            fiber_scale: 1.0,
        }
    }
}

impl Default for StereoSettings {
    fn default() -> Self {
        Self {
            sphere_center: [0.0, 1.0, 0.0],
            sphere_radius: 1.0,
            pole_guard: POLE_GUARD_DISTANCE,
            arc_skip: ARC_SKIP_DISTANCE,
            overlay_scale: 1.005,
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            restore_delay_ms: 150.0,
            hopf_prefix: "hopf-fibration".to_string(),
            stereo_prefix: "capture".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fiber_segments == 0 {
            return Err(ConfigError::Invalid("fiber_segments must be at least 1".into()));
        }
        if self.circle_samples < 2 {
            return Err(ConfigError::Invalid("circle_samples must be at least 2".into()));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must not be empty".into()));
        }
        self.palette_colors()?;
        self.guide()?;

        positive("hopf.base_radius", self.hopf.base_radius)?;
        positive("hopf.fiber_scale", self.hopf.fiber_scale)?;
        positive("stereo.sphere_radius", self.stereo.sphere_radius)?;
        positive("stereo.overlay_scale", self.stereo.overlay_scale)?;
        non_negative("stereo.pole_guard", self.stereo.pole_guard)?;
        non_negative("stereo.arc_skip", self.stereo.arc_skip)?;

        let pole_y = self.stereo.sphere_center[1] + self.stereo.sphere_radius;
        if pole_y <= 0.0 {
            return Err(ConfigError::Invalid(
                "stereo sphere must sit above the ground plane".into(),
            ));
        }

        let (lo, hi) = CAPTURE_RESTORE_DELAY_RANGE_MS;
        let delay = self.capture.restore_delay_ms;
        if !(lo..=hi).contains(&delay) {
            return Err(ConfigError::Invalid(format!(
                "capture.restore_delay_ms must be within {lo}..={hi}, got {delay}"
            )));
        }
        Ok(())
    }

    pub fn palette_colors(&self) -> Result<Vec<Color>, ConfigError> {
        self.palette
            .iter()
            .map(|s| Color::parse_hex(s).map_err(ConfigError::from))
            .collect()
    }

    pub fn guide(&self) -> Result<Color, ConfigError> {
        Ok(Color::parse_hex(&self.guide_color)?)
    }
}

impl HopfSettings {
    pub fn base_center(&self) -> Vec3 {
        Vec3::from_array(self.base_center)
    }

    pub fn fiber_origin(&self) -> Vec3 {
        Vec3::from_array(self.fiber_origin)
    }
}

impl StereoSettings {
    pub fn sphere_center(&self) -> Vec3 {
        Vec3::from_array(self.sphere_center)
    }
}

fn positive(name: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must not be negative, got {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewerConfig};
    use foundation::color::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = ViewerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.fiber_segments, 1000);
        assert_eq!(config.circle_samples, 200);
        assert_eq!(config.stereo.pole_guard, 0.08);
        assert_eq!(config.stereo.arc_skip, 0.05);
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = ViewerConfig::from_json_str("{}").expect("valid");
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = ViewerConfig::from_json_str(
            r##"{ "fiber_segments": 64, "stereo": { "sphere_radius": 2.0, "sphere_center": [0, 2, 0] } }"##,
        )
        .expect("valid");
        assert_eq!(config.fiber_segments, 64);
        assert_eq!(config.stereo.sphere_radius, 2.0);
        assert_eq!(config.stereo.pole_guard, 0.08);
        assert_eq!(config.circle_samples, 200);
    }

    #[test]
    fn default_round_trips_through_json() {
        let json = ViewerConfig::default().to_json_pretty().expect("serializable");
        let back = ViewerConfig::from_json_str(&json).expect("valid");
        assert_eq!(back, ViewerConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            r#"{ "fiber_segments": 0 }"#,
            r#"{ "circle_samples": 1 }"#,
            r#"{ "palette": [] }"#,
            r#"{ "stereo": { "sphere_radius": 0 } }"#,
            r#"{ "stereo": { "sphere_center": [0, -5, 0] } }"#,
            r#"{ "capture": { "restore_delay_ms": 900 } }"#,
        ];
        for case in cases {
            assert!(
                matches!(ViewerConfig::from_json_str(case), Err(ConfigError::Invalid(_))),
                "{case} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_colors_and_bad_json() {
        assert!(matches!(
            ViewerConfig::from_json_str(r##"{ "palette": ["#12345"] }"##),
            Err(ConfigError::Color(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn palette_parses_to_colors() {
        let config = ViewerConfig::default();
        let colors = config.palette_colors().expect("valid palette");
        assert_eq!(colors.len(), config.palette.len());
        assert_eq!(config.guide(), Ok(Color::WHITE));
    }
}
