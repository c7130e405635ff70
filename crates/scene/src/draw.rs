//! Drawing capability handed to the geometry tools.
//!
//! Tools never talk to a renderer directly. They emit polylines and markers
//! into a `DrawSink`; the viewer uploads a `DrawList` to the GPU and tests
//! assert on the recorded commands.

use foundation::color::Color;
use foundation::math::Vec3;
use serde::Serialize;

pub trait DrawSink {
    /// Removes everything drawn so far.
    fn clear(&mut self);
    fn draw_polyline(&mut self, points: &[Vec3], color: Color);
    fn draw_marker(&mut self, point: Vec3, color: Color);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Polyline { points: Vec<Vec3>, color: Color },
    Marker { point: Vec3, color: Color },
}

/// Recorded draw commands in submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    /// Bumped on every mutation so uploaders can skip unchanged lists.
    #[serde(skip)]
    revision: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn polyline_count(&self) -> usize {
        self.polylines().count()
    }

    pub fn marker_count(&self) -> usize {
        self.markers().count()
    }

    pub fn polylines(&self) -> impl Iterator<Item = (&[Vec3], Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, color } => Some((points.as_slice(), *color)),
            DrawCommand::Marker { .. } => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = (Vec3, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Marker { point, color } => Some((*point, *color)),
            DrawCommand::Polyline { .. } => None,
        })
    }
}

impl DrawSink for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.revision += 1;
    }

    fn draw_polyline(&mut self, points: &[Vec3], color: Color) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
        });
        self.revision += 1;
    }

    fn draw_marker(&mut self, point: Vec3, color: Color) {
        self.commands.push(DrawCommand::Marker { point, color });
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, DrawList, DrawSink};
    use foundation::color::Color;
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_in_order_and_counts_by_kind() {
        let mut list = DrawList::new();
        let red = Color::from_hex(0xff0000);
        list.draw_marker(Vec3::new(1.0, 0.0, 0.0), red);
        list.draw_polyline(&[Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)], Color::WHITE);

        assert_eq!(list.len(), 2);
        assert_eq!(list.marker_count(), 1);
        assert_eq!(list.polyline_count(), 1);
        assert_eq!(
            list.commands()[0],
            DrawCommand::Marker {
                point: Vec3::new(1.0, 0.0, 0.0),
                color: red
            }
        );
    }

    #[test]
    fn degenerate_polylines_are_dropped() {
        let mut list = DrawList::new();
        list.draw_polyline(&[Vec3::ZERO], Color::WHITE);
        list.draw_polyline(&[], Color::WHITE);
        assert!(list.is_empty());
        assert_eq!(list.revision(), 0);
    }

    #[test]
    fn clear_empties_and_bumps_revision() {
        let mut list = DrawList::new();
        list.draw_marker(Vec3::ZERO, Color::WHITE);
        let before = list.revision();
        list.clear();
        assert!(list.is_empty());
        assert!(list.revision() > before);
    }
}
