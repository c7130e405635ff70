/// Display/selection behavior. At most one is active; `None` means idle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    None,
    Point,
    Longitude,
    Latitude,
}

impl Mode {
    /// Modes a user can switch on.
    pub const SELECTABLE: [Mode; 3] = [Mode::Point, Mode::Longitude, Mode::Latitude];

    pub fn label(self) -> &'static str {
        match self {
            Mode::None => "none",
            Mode::Point => "point",
            Mode::Longitude => "longitude",
            Mode::Latitude => "latitude",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "idle" => Some(Mode::None),
            "point" => Some(Mode::Point),
            "longitude" | "lon" => Some(Mode::Longitude),
            "latitude" | "lat" => Some(Mode::Latitude),
            _ => None,
        }
    }

    pub fn is_idle(self) -> bool {
        self == Mode::None
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
