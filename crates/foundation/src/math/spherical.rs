use super::{Vec3, clamp_unit};

/// Polar/azimuthal angles of a direction, physics convention.
///
/// `theta` is measured from +z, `phi` is the azimuth in the xy-plane from +x.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub theta: f64,
    pub phi: f64,
}

impl Spherical {
    /// Angles of a unit vector. `n.z` is clamped, other components are used as-is.
    pub fn from_unit(n: Vec3) -> Self {
        Self {
            theta: clamp_unit(n.z).acos(),
            phi: n.y.atan2(n.x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Spherical;
    use crate::math::{Vec3, points_close};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn poles_and_equator() {
        let north = Spherical::from_unit(Vec3::new(0.0, 0.0, 1.0));
        assert_close(north.theta, 0.0, 1e-12);

        let south = Spherical::from_unit(Vec3::new(0.0, 0.0, -1.0));
        assert_close(south.theta, PI, 1e-12);

        let east = Spherical::from_unit(Vec3::new(0.0, 1.0, 0.0));
        assert_close(east.theta, FRAC_PI_2, 1e-12);
        assert_close(east.phi, FRAC_PI_2, 1e-12);
    }

    #[test]
    fn slightly_off_sphere_is_finite() {
        let s = Spherical::from_unit(Vec3::new(0.0, 0.0, 1.000_000_01));
        assert!(s.theta.is_finite());
    }

    #[test]
    fn unit_round_trip() {
        let n = Vec3::new(0.48, -0.6, 0.64);
        let Spherical { theta, phi } = Spherical::from_unit(n);
        let back = Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
        assert!(points_close(back, n, 1e-12));
    }
}
