use foundation::math::Vec3;

/// A sphere placed in the world, with a local unit-sphere frame.
///
/// The geometry generators work on the unit sphere with +z as "up". The
/// viewer is y-up, so the local frame is rotated: local `(x, y, z)` is world
/// `(x, z, -y)` around `center`, scaled by `radius`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereFrame {
    pub center: Vec3,
    pub radius: f64,
}

impl SphereFrame {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn unit() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }

    pub fn to_local(&self, world: Vec3) -> Vec3 {
        let d = (world - self.center).scale(1.0 / self.radius);
        Vec3::new(d.x, -d.z, d.y)
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.to_world_scaled(local, 1.0)
    }

    /// Like `to_world`, pushed outward by `scale` (overlays drawn just above the surface).
    pub fn to_world_scaled(&self, local: Vec3, scale: f64) -> Vec3 {
        self.center + Vec3::new(local.x, local.z, -local.y).scale(self.radius * scale)
    }

    /// Local unit direction of a world-space hit; `None` for the center itself.
    pub fn surface_unit(&self, world_hit: Vec3) -> Option<Vec3> {
        self.to_local(world_hit).normalized()
    }

    /// World-space top of the sphere.
    pub fn north_pole(&self) -> Vec3 {
        self.center + Vec3::UP.scale(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::SphereFrame;
    use foundation::math::{Vec3, points_close};

    #[test]
    fn local_round_trip() {
        let frame = SphereFrame::new(Vec3::new(1.0, 2.0, -3.0), 2.5);
        let world = Vec3::new(0.3, 4.0, -2.2);
        let back = frame.to_world(frame.to_local(world));
        assert!(points_close(back, world, 1e-12));
    }

    #[test]
    fn local_up_is_world_up() {
        let frame = SphereFrame::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let top = frame.to_world(Vec3::new(0.0, 0.0, 1.0));
        assert!(points_close(top, Vec3::new(0.0, 2.0, 0.0), 1e-12));
        assert!(points_close(top, frame.north_pole(), 1e-12));
    }

    #[test]
    fn surface_unit_normalizes_hits() {
        let frame = SphereFrame::new(Vec3::ZERO, 2.0);
        let n = frame.surface_unit(Vec3::new(0.0, 2.0, 0.0)).expect("off-center");
        assert!(points_close(n, Vec3::new(0.0, 0.0, 1.0), 1e-12));
        assert_eq!(frame.surface_unit(Vec3::ZERO), None);
    }

    #[test]
    fn scaled_overlay_sits_outside() {
        let frame = SphereFrame::unit();
        let p = frame.to_world_scaled(Vec3::new(1.0, 0.0, 0.0), 1.005);
        assert!((p.length() - 1.005).abs() < 1e-12);
    }
}
