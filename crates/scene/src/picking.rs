use foundation::math::Vec3;

use crate::sphere::SphereFrame;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

/// Nearest intersection of `ray` with the sphere surface in front of the origin.
///
/// Returns `None` when the ray misses, points away, or has a zero direction.
/// Rays starting inside the sphere hit the far side.
pub fn ray_hit_sphere(ray: Ray, sphere: SphereFrame) -> Option<Vec3> {
    let dir = ray.dir.normalized()?;
    let oc = ray.origin - sphere.center;

    // |oc + t*dir|^2 = r^2 with |dir| = 1.
    let b = oc.dot(dir);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sdisc = disc.sqrt();
    let t0 = -b - sdisc;
    let t1 = -b + sdisc;

    let t = if t0 > 0.0 {
        t0
    } else if t1 > 0.0 {
        t1
    } else {
        return None;
    };

    Some(Ray::new(ray.origin, dir).at(t))
}
