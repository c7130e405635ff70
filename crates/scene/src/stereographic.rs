//! Stereographic projection of a sphere resting on the ground plane `y = 0`.
//!
//! Lines are cast from the sphere's north pole through a surface point down to
//! the plane. The pole itself has no image, and points close to it land
//! arbitrarily far away, so callers are expected to go through the guarded
//! entry points (`project`, `project_runs`).

use foundation::math::Vec3;
use tracing::debug;

use crate::sphere::SphereFrame;

/// A click closer than this to the pole is refused with a warning.
pub const POLE_GUARD_DISTANCE: f64 = 0.08;

/// Curve samples closer than this to the pole are left out of the projected image.
pub const ARC_SKIP_DISTANCE: f64 = 0.05;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ProjectionError {
    /// The point is within the guard distance of the projection pole.
    NearPole { distance: f64 },
    /// The line from the pole does not descend to the ground plane.
    Parallel,
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::NearPole { distance } => write!(
                f,
                "point is {distance:.3} from the north pole; its projection is undefined"
            ),
            ProjectionError::Parallel => write!(f, "projection line never reaches the ground plane"),
        }
    }
}

impl std::error::Error for ProjectionError {}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StereoRig {
    pub sphere: SphereFrame,
    pub north_pole: Vec3,
    pub pole_guard: f64,
}

impl StereoRig {
    /// Rig projecting from the top of `sphere`.
    pub fn new(sphere: SphereFrame) -> Self {
        Self {
            sphere,
            north_pole: sphere.north_pole(),
            pole_guard: POLE_GUARD_DISTANCE,
        }
    }

    pub fn with_pole_guard(mut self, pole_guard: f64) -> Self {
        self.pole_guard = pole_guard;
        self
    }

    /// Distance-to-pole check performed before any click is projected.
    pub fn check_pole(&self, p: Vec3) -> Result<(), ProjectionError> {
        let distance = p.distance(self.north_pole);
        if distance < self.pole_guard {
            return Err(ProjectionError::NearPole { distance });
        }
        Ok(())
    }

    /// Guarded projection of a selected surface point.
    pub fn project(&self, p: Vec3) -> Result<Vec3, ProjectionError> {
        self.check_pole(p)?;
        self.project_point(p)
    }

    /// Intersection of the pole->`p` line with `y = 0`, without the distance guard.
    pub fn project_point(&self, p: Vec3) -> Result<Vec3, ProjectionError> {
        let direction = p - self.north_pole;
        if !(direction.y < -f64::EPSILON) {
            return Err(ProjectionError::Parallel);
        }
        let t = -self.north_pole.y / direction.y;
        Ok(self.north_pole + direction.scale(t))
    }

    /// Projects a sampled curve, dropping samples within `skip` of the pole.
    ///
    /// Each dropped sample ends the current run, so the result is a list of
    /// unbroken polylines. Runs with fewer than two points are discarded.
    pub fn project_runs(&self, points: &[Vec3], skip: f64) -> Vec<Vec<Vec3>> {
        let mut runs = Vec::new();
        let mut current: Vec<Vec3> = Vec::new();
        let mut skipped = 0usize;

        for &p in points {
            let projected = if p.distance(self.north_pole) < skip {
                None
            } else {
                self.project_point(p).ok()
            };
            match projected {
                Some(q) => current.push(q),
                None => {
                    skipped += 1;
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
        }
        if current.len() >= 2 {
            runs.push(current);
        }

        if skipped > 0 {
            debug!(skipped, runs = runs.len(), "dropped samples near the projection pole");
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::{ARC_SKIP_DISTANCE, ProjectionError, StereoRig};
    use crate::circles::{latitude_circle, longitude_circle};
    use crate::sphere::SphereFrame;
    use foundation::math::{Vec3, points_close};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn resting_rig() -> StereoRig {
        StereoRig::new(SphereFrame::new(Vec3::new(0.0, 1.0, 0.0), 1.0))
    }

    #[test]
    fn pole_is_twice_the_radius_above_ground() {
        let rig = resting_rig();
        assert_eq!(rig.north_pole, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn contact_point_projects_to_itself() {
        let rig = StereoRig::new(SphereFrame::new(Vec3::new(3.0, 1.5, -2.0), 1.5));
        // Where the sphere touches the ground, directly below its center.
        let contact = Vec3::new(3.0, 0.0, -2.0);
        let projected = rig.project(contact).expect("contact point is far from the pole");
        assert!(points_close(projected, contact, 1e-12));
    }

    #[test]
    fn projection_lands_on_ground_and_on_the_pole_line() {
        let rig = resting_rig();
        let p = rig.sphere.to_world(Vec3::new(0.6, 0.0, 0.8));
        let q = rig.project(p).expect("projectable");
        assert_close(q.y, 0.0, 1e-12);

        let a = p - rig.north_pole;
        let b = q - rig.north_pole;
        assert!(a.cross(b).length() < 1e-9);
    }

    #[test]
    fn equator_projects_to_twice_the_radius() {
        let rig = resting_rig();
        let p = rig.sphere.to_world(Vec3::new(1.0, 0.0, 0.0));
        let q = rig.project(p).expect("projectable");
        assert!(points_close(q, Vec3::new(2.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn points_near_the_pole_are_refused() {
        let rig = resting_rig();
        let near = rig.sphere.to_world(Vec3::new(0.05, 0.0, 1.0).normalized().expect("unit"));
        assert!(near.distance(rig.north_pole) < 0.08);
        match rig.project(near) {
            Err(ProjectionError::NearPole { distance }) => assert!(distance < 0.08),
            other => panic!("expected NearPole, got {other:?}"),
        }
        assert!(matches!(
            rig.project(rig.north_pole),
            Err(ProjectionError::NearPole { .. })
        ));
    }

    #[test]
    fn the_pole_itself_has_no_raw_projection() {
        let rig = resting_rig();
        assert_eq!(rig.project_point(rig.north_pole), Err(ProjectionError::Parallel));
    }

    #[test]
    fn longitude_runs_split_at_the_pole() {
        let rig = resting_rig();
        let local = longitude_circle(Vec3::new(0.6, 0.0, 0.8), 200);
        let world: Vec<Vec3> = local.iter().map(|&p| rig.sphere.to_world(p)).collect();

        let runs = rig.project_runs(&world, ARC_SKIP_DISTANCE);
        // The circle starts and ends at the pole. Samples 0, 1, 199 and 200 are
        // within the skip distance, leaving one run.
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 197);
        for q in runs.iter().flatten() {
            assert_close(q.y, 0.0, 1e-9);
        }
    }

    #[test]
    fn latitude_projects_to_a_circle() {
        let rig = resting_rig();
        let local = latitude_circle(Vec3::new(0.8, 0.0, 0.0), 64);
        let world: Vec<Vec3> = local.iter().map(|&p| rig.sphere.to_world(p)).collect();
        let runs = rig.project_runs(&world, ARC_SKIP_DISTANCE);
        assert_eq!(runs.len(), 1);
        for q in &runs[0] {
            assert_close((q.x * q.x + q.z * q.z).sqrt(), 2.0, 1e-9);
        }
    }
}
