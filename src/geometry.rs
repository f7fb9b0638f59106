use std::f32::consts::PI;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Direction of increasing `u` on the surface.
    pub tangent: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2, 3 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Index list drawing every triangle edge as a line segment.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            lines.extend_from_slice(&[tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]]);
        }
        lines
    }
}

/// UV sphere parameters. The vertex grid runs from the north pole (`v = 0`)
/// to the south pole, with one duplicated seam column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn build(&self) -> MeshData {
        let (ws, hs) = (self.width_segments, self.height_segments);
        let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            // Pole rows sample the middle of their texel column.
            let u_offset = if iy == 0 {
                0.5 / ws as f32
            } else if iy == hs {
                -0.5 / ws as f32
            } else {
                0.0
            };
            let theta = v * PI;

            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = u * 2.0 * PI;

                let position = glam::Vec3::new(
                    -self.radius * phi.cos() * theta.sin(),
                    self.radius * theta.cos(),
                    self.radius * phi.sin() * theta.sin(),
                );
                let normal = position.normalize_or_zero();
                let normal = if normal == glam::Vec3::ZERO {
                    glam::Vec3::new(0.0, theta.cos().signum(), 0.0)
                } else {
                    normal
                };
                let tangent = glam::Vec3::new(phi.sin(), 0.0, phi.cos());

                vertices.push(MeshVertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    uv: [u + u_offset, 1.0 - v],
                    tangent: tangent.to_array(),
                });
            }
        }

        let row = ws + 1;
        let mut indices = Vec::with_capacity((6 * ws * hs) as usize);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // The pole rows collapse to a point; only one triangle per quad there.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        MeshData { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_and_index_counts() {
        let mesh = SphereGeometry::new(0.5, 64, 64).build();
        assert_eq!(mesh.vertices.len(), 65 * 65);
        assert_eq!(mesh.indices.len(), 6 * 64 * 63);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn vertices_sit_on_the_radius_with_unit_normals() {
        let mesh = SphereGeometry::new(0.5, 16, 8).build();
        for vertex in &mesh.vertices {
            let p = glam::Vec3::from(vertex.position);
            let n = glam::Vec3::from(vertex.normal);
            assert!((p.length() - 0.5).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn poles_are_on_the_y_axis() {
        let mesh = SphereGeometry::new(1.0, 4, 2).build();
        let north = mesh.vertices.first().unwrap();
        let south = mesh.vertices.last().unwrap();
        assert!((north.position[1] - 1.0).abs() < 1e-6);
        assert!((south.position[1] + 1.0).abs() < 1e-6);
        assert!((north.uv[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wireframe_has_three_segments_per_triangle() {
        let mesh = SphereGeometry::new(1.0, 4, 2).build();
        assert_eq!(mesh.indices.len(), 6 * 4 * 1);
        assert_eq!(mesh.wireframe_indices().len(), mesh.indices.len() * 2);
    }

    #[test]
    fn segment_counts_have_a_floor() {
        let geometry = SphereGeometry::new(1.0, 1, 1);
        assert_eq!(geometry.width_segments, 3);
        assert_eq!(geometry.height_segments, 2);
    }
}
