//! Packs scene geometry into GPU-ready vertex arrays.

use foundation::color::Color;
use foundation::math::Vec3;
use scene::draw::DrawList;
use scene::sphere::SphereFrame;

/// Lit triangle vertex (spheres and markers).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// `LineList` vertex; consecutive pairs form one segment.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

/// UV sphere placed by `frame`. Indexed with `u16`, so keep the segment counts modest.
pub fn sphere_mesh(
    frame: SphereFrame,
    color: [f32; 4],
    lat_segments: u32,
    lon_segments: u32,
) -> SphereMesh {
    let lat_segments = lat_segments.max(3);
    let lon_segments = lon_segments.max(3);

    let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
    for lat in 0..=lat_segments {
        let theta = std::f64::consts::PI * lat as f64 / lat_segments as f64;
        let (sin_t, cos_t) = theta.sin_cos();
        for lon in 0..=lon_segments {
            let phi = std::f64::consts::TAU * lon as f64 / lon_segments as f64;
            let (sin_p, cos_p) = phi.sin_cos();
            let n = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
            vertices.push(MeshVertex {
                position: (frame.center + n.scale(frame.radius)).as_f32(),
                normal: n.as_f32(),
                color,
            });
        }
    }

    let stride = lon_segments + 1;
    let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let i0 = lat * stride + lon;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            indices.extend([i0, i2, i1, i1, i2, i3].map(|i| i as u16));
        }
    }

    SphereMesh { vertices, indices }
}

/// Square grid on the ground plane `y = 0`, centered under `center`.
pub fn ground_grid(center: Vec3, half_extent: f64, step: f64, color: [f32; 4]) -> Vec<LineVertex> {
    let mut verts = Vec::new();
    if !(step > 0.0) || !(half_extent > 0.0) {
        return verts;
    }
    let lines = (half_extent / step).floor() as i64;
    for i in -lines..=lines {
        let o = i as f64 * step;
        let (cx, cz) = (center.x, center.z);
        for (a, b) in [
            (Vec3::new(cx + o, 0.0, cz - half_extent), Vec3::new(cx + o, 0.0, cz + half_extent)),
            (Vec3::new(cx - half_extent, 0.0, cz + o), Vec3::new(cx + half_extent, 0.0, cz + o)),
        ] {
            verts.push(LineVertex { position: a.as_f32(), color });
            verts.push(LineVertex { position: b.as_f32(), color });
        }
    }
    verts
}

/// Everything the line and marker pipelines draw for one `DrawList`.
#[derive(Debug, Default)]
pub struct RenderFrame {
    pub lines: Vec<LineVertex>,
    pub markers: Vec<MeshVertex>,
}

pub struct Renderer;

impl Renderer {
    /// Low-resolution sphere per marker, emitted as an unindexed triangle list.
    pub const MARKER_LAT_SEGMENTS: u32 = 6;
    pub const MARKER_LON_SEGMENTS: u32 = 10;

    pub fn collect(list: &DrawList, marker_radius: f64) -> RenderFrame {
        let mut frame = RenderFrame::default();
        for (points, color) in list.polylines() {
            push_polyline(&mut frame.lines, points, color);
        }
        for (point, color) in list.markers() {
            let mesh = sphere_mesh(
                SphereFrame::new(point, marker_radius),
                color.to_rgba(1.0),
                Self::MARKER_LAT_SEGMENTS,
                Self::MARKER_LON_SEGMENTS,
            );
            frame
                .markers
                .extend(mesh.indices.iter().map(|&i| mesh.vertices[i as usize]));
        }
        frame
    }
}

fn push_polyline(out: &mut Vec<LineVertex>, points: &[Vec3], color: Color) {
    let color = color.to_rgba(1.0);
    for pair in points.windows(2) {
        out.push(LineVertex { position: pair[0].as_f32(), color });
        out.push(LineVertex { position: pair[1].as_f32(), color });
    }
}

#[cfg(test)]
mod tests {
    use super::{Renderer, ground_grid, sphere_mesh};
    use foundation::color::Color;
    use foundation::math::Vec3;
    use scene::draw::{DrawList, DrawSink};
    use scene::sphere::SphereFrame;

    #[test]
    fn polylines_become_segment_pairs() {
        let mut list = DrawList::new();
        let red = Color::from_hex(0xff0000);
        list.draw_polyline(
            &[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
            red,
        );
        let frame = Renderer::collect(&list, 0.05);
        assert_eq!(frame.lines.len(), 4);
        assert_eq!(frame.lines[1].position, frame.lines[2].position);
        assert_eq!(frame.lines[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert!(frame.markers.is_empty());
    }

    #[test]
    fn markers_become_small_spheres() {
        let mut list = DrawList::new();
        list.draw_marker(Vec3::new(2.0, 0.0, 0.0), Color::WHITE);
        let frame = Renderer::collect(&list, 0.1);
        let tris = (Renderer::MARKER_LAT_SEGMENTS * Renderer::MARKER_LON_SEGMENTS * 6) as usize;
        assert_eq!(frame.markers.len(), tris);
        for v in &frame.markers {
            let d = Vec3::new(v.position[0] as f64 - 2.0, v.position[1] as f64, v.position[2] as f64);
            assert!((d.length() - 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn sphere_mesh_sits_on_the_frame() {
        let frame = SphereFrame::new(Vec3::new(0.0, 1.0, 0.0), 2.0);
        let mesh = sphere_mesh(frame, [1.0; 4], 8, 16);
        assert_eq!(mesh.vertices.len(), 9 * 17);
        assert_eq!(mesh.indices.len(), 8 * 16 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert_eq!(mesh.vertices[0].position, [0.0, 3.0, 0.0]);
    }

    #[test]
    fn grid_lies_on_the_ground() {
        let grid = ground_grid(Vec3::new(0.0, 1.0, 0.0), 2.0, 1.0, [0.5; 4]);
        // 5 lines per axis, 2 vertices each.
        assert_eq!(grid.len(), 5 * 2 * 2);
        assert!(grid.iter().all(|v| v.position[1] == 0.0));
        assert!(ground_grid(Vec3::ZERO, 2.0, 0.0, [0.5; 4]).is_empty());
    }
}
