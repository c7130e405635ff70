//! Hopf fibers, stereographically projected from S³ into R³.
//!
//! For a base point `n` on S² with polar angle `theta` and azimuth `phi`, the
//! fiber is the great circle on S³
//!
//! ```text
//! (cos(theta/2) e^{it}, sin(theta/2) e^{i(t+phi)}),  t in [0, 2pi]
//! ```
//!
//! written as `(x, y, z, w)` and projected from the pole `w = 1`.

use std::f64::consts::TAU;

use foundation::math::{Spherical, Vec3, Vec4};

/// Samples per fiber when nothing else is configured.
pub const DEFAULT_FIBER_SEGMENTS: usize = 1000;

/// Lower bound for the projection divisor `1 - w`.
pub const PROJECTION_DIVISOR_EPSILON: f64 = 1e-4;

/// Points of the fiber over `n` on the unit 3-sphere.
///
/// Returns `segments + 1` samples; the last one repeats the first. `segments`
/// of zero is treated as one.
pub fn fiber_4d(n: Vec3, segments: usize) -> Vec<Vec4> {
    let segments = segments.max(1);
    let Spherical { theta, phi } = Spherical::from_unit(n);
    let (sin_h, cos_h) = (0.5 * theta).sin_cos();

    (0..=segments)
        .map(|k| {
            let t = TAU * k as f64 / segments as f64;
            let (sin_t, cos_t) = t.sin_cos();
            let (sin_tp, cos_tp) = (t + phi).sin_cos();
            Vec4::new(cos_h * cos_t, cos_h * sin_t, sin_h * cos_tp, sin_h * sin_tp)
        })
        .collect()
}

/// Stereographic projection S³ -> R³ from `w = 1`, with the divisor clamped.
#[inline]
pub fn project_from_w_pole(q: Vec4) -> Vec3 {
    let d = (1.0 - q.w).max(PROJECTION_DIVISOR_EPSILON);
    Vec3::new(q.x / d, q.y / d, q.z / d)
}

/// The projected fiber over `n`: `segments + 1` points, all finite.
pub fn hopf_fiber(n: Vec3, segments: usize) -> Vec<Vec3> {
    fiber_4d(n, segments)
        .into_iter()
        .map(project_from_w_pole)
        .collect()
}

/// The Hopf map S³ -> S². Every point of `fiber_4d(n, _)` maps back to `n`.
pub fn hopf_map(q: Vec4) -> Vec3 {
    Vec3::new(
        2.0 * (q.z * q.x + q.w * q.y),
        2.0 * (q.w * q.x - q.z * q.y),
        q.x * q.x + q.y * q.y - q.z * q.z - q.w * q.w,
    )
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_FIBER_SEGMENTS, PROJECTION_DIVISOR_EPSILON, fiber_4d, hopf_fiber, hopf_map,
        project_from_w_pole,
    };
    use foundation::math::{Spherical, Vec3, Vec4, points_close};
    use std::f64::consts::TAU;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn sample_points() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.48, -0.6, 0.64),
            Vec3::new(-0.36, 0.48, -0.8),
        ]
    }

    #[test]
    fn fiber_has_segments_plus_one_points() {
        for n in sample_points() {
            assert_eq!(hopf_fiber(n, DEFAULT_FIBER_SEGMENTS).len(), 1001);
            assert_eq!(hopf_fiber(n, 16).len(), 17);
        }
    }

    #[test]
    fn zero_segments_still_yields_a_closed_pair() {
        let f = hopf_fiber(Vec3::new(1.0, 0.0, 0.0), 0);
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn every_point_is_finite_even_at_the_projection_pole() {
        // The south pole's fiber passes through w = 1.
        for n in sample_points() {
            for p in hopf_fiber(n, DEFAULT_FIBER_SEGMENTS) {
                assert!(p.is_finite(), "non-finite point {p:?} over {n:?}");
            }
        }
    }

    #[test]
    fn points_match_the_projection_formula() {
        let n = Vec3::new(0.48, -0.6, 0.64);
        let segments = 12;
        let Spherical { theta, phi } = Spherical::from_unit(n);
        let fiber = hopf_fiber(n, segments);

        for (k, p) in fiber.iter().enumerate() {
            let t = TAU * k as f64 / segments as f64;
            let x4 = (theta / 2.0).cos() * t.cos();
            let y4 = (theta / 2.0).cos() * t.sin();
            let z4 = (theta / 2.0).sin() * (t + phi).cos();
            let w4 = (theta / 2.0).sin() * (t + phi).sin();
            let d = (1.0 - w4).max(0.0001);
            assert!(points_close(*p, Vec3::new(x4 / d, y4 / d, z4 / d), 1e-9));
        }
    }

    #[test]
    fn fiber_is_closed() {
        for n in sample_points() {
            let f = hopf_fiber(n, 100);
            assert!(points_close(f[0], f[100], 1e-9));
        }
    }

    #[test]
    fn north_pole_fiber_is_the_unit_circle() {
        for p in hopf_fiber(Vec3::new(0.0, 0.0, 1.0), 64) {
            assert_close(p.z, 0.0, 1e-12);
            assert_close((p.x * p.x + p.y * p.y).sqrt(), 1.0, 1e-12);
        }
    }

    #[test]
    fn samples_lie_on_s3_and_map_back_to_the_base_point() {
        for n in sample_points() {
            for q in fiber_4d(n, 32) {
                assert_close(q.length(), 1.0, 1e-12);
                assert!(points_close(hopf_map(q), n, 1e-9));
            }
        }
    }

    #[test]
    fn divisor_is_clamped() {
        let p = project_from_w_pole(Vec4::new(0.5, 0.0, 0.0, 1.0));
        assert_close(p.x, 0.5 / PROJECTION_DIVISOR_EPSILON, 1e-6);
    }
}
