use serde::{Deserialize, Serialize};

/// Joint influences emitted per vertex in [`MeshData`].
pub const WEIGHTS_PER_VERTEX: usize = 3;

/// Flat, index-addressable render arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<f32>,       // 3 per vertex
    pub texture_coords: Vec<f32>, // 2 per vertex, V already flipped
    pub normals: Vec<f32>,        // 3 per vertex
    pub indices: Vec<u32>,
    pub joint_ids: Vec<i32>,      // WEIGHTS_PER_VERTEX per vertex
    pub vertex_weights: Vec<f32>, // WEIGHTS_PER_VERTEX per vertex
    /// Largest distance of any vertex from the origin.
    pub furthest_point: f32,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let i = vertex * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }

    pub fn tex_coord(&self, vertex: usize) -> [f32; 2] {
        let i = vertex * 2;
        [self.texture_coords[i], self.texture_coords[i + 1]]
    }

    pub fn normal(&self, vertex: usize) -> [f32; 3] {
        let i = vertex * 3;
        [self.normals[i], self.normals[i + 1], self.normals[i + 2]]
    }

    // Byte views for buffer upload.

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn texture_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texture_coords)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn joint_id_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.joint_ids)
    }

    pub fn vertex_weight_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertex_weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_and_byte_views_follow_layout() {
        let mesh = MeshData {
            vertices: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            texture_coords: vec![0.0, 1.0, 0.5, 0.5],
            normals: vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 1],
            joint_ids: vec![0, 0, 0, 1, 0, 0],
            vertex_weights: vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            furthest_point: 0.0,
        };
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.position(1), [3.0, 4.0, 5.0]);
        assert_eq!(mesh.tex_coord(1), [0.5, 0.5]);
        assert_eq!(mesh.normal(1), [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertex_bytes().len(), 6 * 4);
        assert_eq!(mesh.texture_coord_bytes().len(), 4 * 4);
        assert_eq!(mesh.normal_bytes().len(), 6 * 4);
        assert_eq!(mesh.index_bytes().len(), 3 * 4);
        assert_eq!(mesh.joint_id_bytes().len(), 6 * 4);
        assert_eq!(mesh.vertex_weight_bytes().len(), 6 * 4);
        assert_eq!(&mesh.index_bytes()[4..8], &1u32.to_ne_bytes());
    }
}
