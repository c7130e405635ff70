use foundation::math::Vec3;
use scene::picking::Ray;

pub type Mat4 = [[f32; 4]; 4];

const MIN_PITCH_RAD: f64 = -1.55;
const MAX_PITCH_RAD: f64 = 1.55;
const MIN_DISTANCE: f64 = 0.5;
const MAX_DISTANCE: f64 = 200.0;

/// Camera orbiting a target point, y-up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub distance: f64,
    pub target: Vec3,
    pub fov_y_rad: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw_rad: 0.6,
            pitch_rad: 0.3,
            distance: 6.0,
            target: Vec3::ZERO,
            fov_y_rad: 45f64.to_radians(),
        }
    }
}

impl OrbitCamera {
    pub fn looking_at(target: Vec3, distance: f64) -> Self {
        Self {
            target,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            ..Self::default()
        }
    }

    /// Unit vector from the target toward the eye.
    fn back(&self) -> Vec3 {
        Vec3::new(
            self.pitch_rad.cos() * self.yaw_rad.cos(),
            self.pitch_rad.sin(),
            -self.pitch_rad.cos() * self.yaw_rad.sin(),
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.back().scale(self.distance)
    }

    /// Pointer drag in pixels.
    pub fn orbit(&mut self, delta_x_px: f64, delta_y_px: f64) {
        let speed = 0.005;
        self.yaw_rad += delta_x_px * speed;
        self.pitch_rad = (self.pitch_rad + delta_y_px * speed).clamp(MIN_PITCH_RAD, MAX_PITCH_RAD);
    }

    /// Wheel delta; positive moves away.
    pub fn zoom(&mut self, wheel_delta_y: f64) {
        let factor = (wheel_delta_y * 0.0015).exp();
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn clip_planes(&self) -> (f64, f64) {
        let near = (self.distance * 0.01).max(0.01);
        let far = (self.distance * 4.0 + 100.0).max(near + 1.0);
        (near, far)
    }

    pub fn view_proj(&self, canvas_width: f64, canvas_height: f64) -> Mat4 {
        let aspect = aspect_ratio(canvas_width, canvas_height);
        let view = mat4_look_at_rh(self.eye(), self.target, Vec3::UP);
        let (near, far) = self.clip_planes();
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, aspect, near, far);
        mat4_mul(proj, view)
    }

    /// World ray under a canvas pixel, `None` for a degenerate canvas.
    pub fn screen_ray(&self, x_px: f64, y_px: f64, canvas_w: f64, canvas_h: f64) -> Option<Ray> {
        if canvas_w <= 1.0 || canvas_h <= 1.0 {
            return None;
        }
        let aspect = canvas_w / canvas_h;
        let tan = (0.5 * self.fov_y_rad).tan();

        let eye = self.eye();
        let forward = (self.target - eye).normalized()?;
        let right = forward.cross(Vec3::UP).normalized()?;
        let up = right.cross(forward);

        let ndc_x = (2.0 * (x_px / canvas_w) - 1.0) * aspect;
        let ndc_y = 1.0 - 2.0 * (y_px / canvas_h);
        let dir = forward + right.scale(ndc_x * tan) + up.scale(ndc_y * tan);

        Some(Ray::new(eye, dir.normalized()?))
    }
}

fn aspect_ratio(w: f64, h: f64) -> f64 {
    if h <= 0.0 { 1.0 } else { (w / h).max(1e-6) }
}

/// Column-major multiply: `a * b`.
pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Right-handed perspective, depth range [0, 1].
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(up).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, -f.x as f32, 0.0],
        [s.y as f32, u.y as f32, -f.y as f32, 0.0],
        [s.z as f32, u.z as f32, -f.z as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::{Mat4, OrbitCamera};
    use foundation::math::{Vec3, points_close};
    use scene::picking::ray_hit_sphere;
    use scene::sphere::SphereFrame;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn to_ndc(m: Mat4, p: Vec3) -> [f64; 3] {
        let v = [p.x as f32, p.y as f32, p.z as f32, 1.0];
        let mut clip = [0.0f32; 4];
        for (row, out) in clip.iter_mut().enumerate() {
            *out = (0..4).map(|col| m[col][row] * v[col]).sum();
        }
        let w = clip[3] as f64;
        [clip[0] as f64 / w, clip[1] as f64 / w, clip[2] as f64 / w]
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = OrbitCamera::looking_at(Vec3::new(1.0, 2.0, -3.0), 8.0);
        let ndc = to_ndc(cam.view_proj(800.0, 600.0), cam.target);
        assert_close(ndc[0], 0.0, 1e-5);
        assert_close(ndc[1], 0.0, 1e-5);
        assert!(ndc[2] > 0.0 && ndc[2] < 1.0);
    }

    #[test]
    fn center_ray_hits_sphere_head_on() {
        let sphere = SphereFrame::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let cam = OrbitCamera::looking_at(sphere.center, 6.0);
        let ray = cam.screen_ray(400.0, 300.0, 800.0, 600.0).expect("canvas");

        let hit = ray_hit_sphere(ray, sphere).expect("hit");
        let expected = sphere.center + (cam.eye() - sphere.center).normalized().expect("eye");
        assert!(points_close(hit, expected, 1e-9));
    }

    #[test]
    fn corner_ray_misses_a_small_sphere() {
        let cam = OrbitCamera::looking_at(Vec3::ZERO, 10.0);
        let ray = cam.screen_ray(0.0, 0.0, 800.0, 600.0).expect("canvas");
        assert_eq!(ray_hit_sphere(ray, SphereFrame::unit()), None);
    }

    #[test]
    fn degenerate_canvas_has_no_ray() {
        assert_eq!(OrbitCamera::default().screen_ray(0.0, 0.0, 1.0, 600.0), None);
    }

    #[test]
    fn orbit_and_zoom_are_clamped() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 1e6);
        assert_close(cam.pitch_rad, 1.55, 1e-12);
        cam.zoom(1e6);
        assert_close(cam.distance, 200.0, 1e-9);
        cam.zoom(-1e6);
        assert_close(cam.distance, 0.5, 1e-9);
    }
}
