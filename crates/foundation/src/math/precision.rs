//! Tolerance policies.
//!
//! Geometry in this workspace lives on or near the unit sphere, so absolute
//! tolerances are used throughout:
//! - `approx_eq` / `points_close` for comparing generated samples.
//! - `clamp_unit` before any `acos`/`asin`, since samples drift slightly off
//!   the sphere after normalization and ray hits.

use super::Vec3;

pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

pub fn points_close(a: Vec3, b: Vec3, eps: f64) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

/// Clamp into `[-1, 1]` so inverse trig never sees `1.0000000002`.
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    v.clamp(-1.0, 1.0)
}
