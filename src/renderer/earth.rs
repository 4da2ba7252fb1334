//! Globe mesh - textured unit sphere

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl GlobeVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlobeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Generate a UV sphere for the globe.
///
/// Longitude runs from -180 at `u = 0` to +180 at `u = 1`, measured from +Z
/// towards +X, and `v = 0` is the north pole, matching an equirectangular map.
/// Returns (vertices, indices).
pub fn generate_globe_sphere(segments: u32, rings: u32) -> (Vec<GlobeVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = std::f32::consts::PI * v;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = std::f32::consts::TAU * u - std::f32::consts::PI;
            let position = Vec3::new(ring_radius * theta.sin(), y, ring_radius * theta.cos());

            vertices.push(GlobeVertex {
                position: position.to_array(),
                normal: position.normalize_or_zero().to_array(),
                uv: [u, v],
            });
        }
    }

    // Counter-clockwise when seen from outside the sphere
    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_sizes() {
        let (vertices, indices) = generate_globe_sphere(16, 8);
        assert_eq!(vertices.len(), 17 * 9);
        assert_eq!(indices.len(), 16 * 8 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let (vertices, _) = generate_globe_sphere(32, 16);
        for vertex in &vertices {
            let len = Vec3::from_array(vertex.position).length();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_prime_meridian_faces_plus_z() {
        let (vertices, _) = generate_globe_sphere(4, 2);
        // Equator ring, middle segment: u = 0.5, longitude 0
        let equator_mid = vertices[(4 + 1) + 2];
        assert_eq!(equator_mid.uv, [0.5, 0.5]);
        assert!((Vec3::from_array(equator_mid.position) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_triangles_face_outwards() {
        let (vertices, indices) = generate_globe_sphere(16, 8);
        for tri in indices.chunks_exact(3) {
            let a = Vec3::from_array(vertices[tri[0] as usize].position);
            let b = Vec3::from_array(vertices[tri[1] as usize].position);
            let c = Vec3::from_array(vertices[tri[2] as usize].position);
            let normal = (b - a).cross(c - a);
            // Degenerate pole triangles have no orientation
            if normal.length() > 1e-6 {
                assert!(normal.dot(a + b + c) > 0.0);
            }
        }
    }
}
