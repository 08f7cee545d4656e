//! Indexed triangle mesh buffers

use serde::{Deserialize, Serialize};

/// Triangle-list mesh in the layout the renderer uploads directly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let mesh = MeshData {
            positions: vec![[0.0, -1.0, 2.0], [3.0, 1.0, -2.0], [1.0, 0.5, 0.0]],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            uvs: vec![[0.0, 0.0]; 3],
            indices: vec![0, 1, 2],
        };

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [0.0, -1.0, -2.0]);
        assert_eq!(max, [3.0, 1.0, 2.0]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_empty_bounds() {
        assert!(MeshData::default().bounds().is_none());
    }
}
