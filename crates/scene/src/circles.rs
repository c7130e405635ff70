//! Meridian and parallel through a point on the unit sphere.
//!
//! Both curves are sampled at `i / samples * 2pi` for `i` in `0..=samples`, so
//! the first and last samples land on the same angle and the path is closed.

use std::f64::consts::TAU;

use foundation::math::Vec3;

pub const DEFAULT_CIRCLE_SAMPLES: usize = 200;

/// Great circle through both poles and `p`.
///
/// Sample `i` sits at polar angle `i / samples * 2pi`: the first half runs
/// from the north pole down through `p` to the south pole, the second half
/// returns along the opposite meridian.
pub fn longitude_circle(p: Vec3, samples: usize) -> Vec<Vec3> {
    let samples = samples.max(1);
    let (sin_p, cos_p) = p.y.atan2(p.x).sin_cos();

    (0..=samples)
        .map(|i| {
            let theta = TAU * i as f64 / samples as f64;
            let (sin_t, cos_t) = theta.sin_cos();
            Vec3::new(sin_t * cos_p, sin_t * sin_p, cos_t)
        })
        .collect()
}

/// Circle of constant height `p.z`.
pub fn latitude_circle(p: Vec3, samples: usize) -> Vec<Vec3> {
    let samples = samples.max(1);
    let r = latitude_radius(p.z);

    (0..=samples)
        .map(|i| {
            let t = TAU * i as f64 / samples as f64;
            Vec3::new(r * t.cos(), r * t.sin(), p.z)
        })
        .collect()
}

pub fn latitude_radius(z: f64) -> f64 {
    (1.0 - z * z).max(0.0).sqrt()
}

/// Samples of `longitude_circle` that seed a fiber: the first half, both poles included.
pub fn longitude_seed_count(samples: usize) -> usize {
    samples.max(1) / 2 + 1
}
