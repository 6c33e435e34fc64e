use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list.
pub(crate) struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Flat annulus in the XY plane.
///
/// Surface coordinates use the planar mapping `uv = (p / outer + 1) / 2`, so
/// `2 * |uv - 0.5|` equals the distance from the center over `outer`.
pub(crate) fn ring(inner: f32, outer: f32, theta_segments: u32, phi_segments: u32) -> Mesh {
    let mut vertices = Vec::with_capacity(((theta_segments + 1) * (phi_segments + 1)) as usize);
    let mut indices = Vec::with_capacity((theta_segments * phi_segments * 6) as usize);

    let radius_step = (outer - inner) / phi_segments as f32;
    for j in 0..=phi_segments {
        let radius = inner + j as f32 * radius_step;
        for i in 0..=theta_segments {
            let (sin, cos) = (i as f32 / theta_segments as f32 * TAU).sin_cos();
            let x = radius * cos;
            let y = radius * sin;
            vertices.push(MeshVertex {
                position: [x, y, 0.0],
                uv: [(x / outer + 1.0) / 2.0, (y / outer + 1.0) / 2.0],
            });
        }
    }

    let row = theta_segments + 1;
    for j in 0..phi_segments {
        for i in 0..theta_segments {
            let a = j * row + i;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh { vertices, indices }
}

/// Latitude/longitude sphere centered at the origin.
pub(crate) fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
    let mut indices = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_u, cos_u) = (u * TAU).sin_cos();
            let (sin_v, cos_v) = (v * PI).sin_cos();
            vertices.push(MeshVertex {
                position: [-radius * cos_u * sin_v, radius * cos_v, radius * sin_u * sin_v],
                uv: [u, 1.0 - v],
            });
        }
    }

    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // The pole rows collapse to single triangles
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_counts_and_uv_band() {
        let mesh = ring(1.5, 8.0, 64, 8);
        assert_eq!(mesh.vertices.len(), 65 * 9);
        assert_eq!(mesh.indices.len(), 64 * 8 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));

        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            let distance = (x * x + y * y).sqrt();
            let du = vertex.uv[0] - 0.5;
            let dv = vertex.uv[1] - 0.5;
            let uv_radius = (du * du + dv * dv).sqrt() * 2.0;

            assert_eq!(z, 0.0);
            assert!((uv_radius - distance / 8.0).abs() < 1e-5);
            assert!(uv_radius >= 1.5 / 8.0 - 1e-5 && uv_radius <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let mesh = uv_sphere(1.2, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        // Two triangles per quad minus one per quad on each pole row
        assert_eq!(mesh.indices.len(), (32 * 32 * 2 - 2 * 32) * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));

        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            assert!(((x * x + y * y + z * z).sqrt() - 1.2).abs() < 1e-5);
        }
    }
}
