use foundation::color::Color;

/// Palette used when the configuration does not provide one.
pub const DEFAULT_PALETTE: [u32; 10] = [
    0xff595e, 0xffca3a, 0x8ac926, 0x1982c4, 0x6a4c93, 0xff924c, 0x52a675, 0x4267ac, 0xc5ca30,
    0xf15bb5,
];

/// Fixed palette handed out in order, wrapping around.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCycle {
    palette: Vec<Color>,
    index: usize,
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.iter().map(|&hex| Color::from_hex(hex)).collect())
    }
}

impl ColorCycle {
    /// An empty palette falls back to `DEFAULT_PALETTE`.
    pub fn new(palette: Vec<Color>) -> Self {
        if palette.is_empty() {
            return Self::default();
        }
        Self { palette, index: 0 }
    }

    /// Color for the next fiber or circle.
    pub fn next_color(&mut self) -> Color {
        let color = self.peek();
        self.index += 1;
        color
    }

    fn peek(&self) -> Color {
        self.palette[self.index % self.palette.len()]
    }

    /// Number of colors handed out since the last reset.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorCycle, DEFAULT_PALETTE};
    use foundation::color::Color;

    #[test]
    fn wraps_around() {
        let red = Color::from_hex(0xff0000);
        let blue = Color::from_hex(0x0000ff);
        let mut cycle = ColorCycle::new(vec![red, blue]);
        assert_eq!(cycle.next_color(), red);
        assert_eq!(cycle.next_color(), blue);
        assert_eq!(cycle.next_color(), red);
        assert_eq!(cycle.index(), 3);
    }

    #[test]
    fn reset_restarts_at_first_color() {
        let mut cycle = ColorCycle::default();
        cycle.next_color();
        cycle.next_color();
        cycle.reset();
        assert_eq!(cycle.index(), 0);
        assert_eq!(cycle.next_color(), Color::from_hex(DEFAULT_PALETTE[0]));
    }

    #[test]
    fn empty_palette_uses_default() {
        let mut cycle = ColorCycle::new(Vec::new());
        for _ in 0..DEFAULT_PALETTE.len() {
            cycle.next_color();
        }
        assert_eq!(cycle.next_color(), Color::from_hex(DEFAULT_PALETTE[0]));
    }
}
