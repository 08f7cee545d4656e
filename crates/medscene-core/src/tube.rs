//! Tube meshes swept along a curve
//!
//! Rings of `radial_segments + 1` vertices are placed at `tubular_segments + 1`
//! arc-length-uniform stations. Ring orientation comes from parallel-transported
//! frames so the tube does not twist where the curve bends.

use glam::{Quat, Vec3};

use crate::curve::Curve;
use crate::mesh::MeshData;

/// Sweep parameters for [`sweep`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeParams {
    pub tubular_segments: u32,
    pub radius: f32,
    pub radial_segments: u32,
    pub closed: bool,
}

/// Tangent, normal and binormal at each station along a curve
#[derive(Debug, Clone)]
pub struct FrenetFrames {
    pub tangents: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
}

impl FrenetFrames {
    /// Frames at `segments + 1` stations
    pub fn compute(curve: &Curve, segments: u32, closed: bool) -> Self {
        let count = segments as usize + 1;
        let tangents: Vec<Vec3> = (0..count)
            .map(|i| curve.tangent_at(i as f32 / segments as f32))
            .collect();

        let mut normals = Vec::with_capacity(count);
        let mut binormals = Vec::with_capacity(count);

        // Initial normal: cross with the axis the tangent is least aligned with
        let t0 = tangents[0];
        let abs = t0.abs();
        let axis = if abs.x <= abs.y && abs.x <= abs.z {
            Vec3::X
        } else if abs.y <= abs.z {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let side = t0.cross(axis).normalize_or_zero();
        normals.push(t0.cross(side));
        binormals.push(t0.cross(normals[0]));

        for i in 1..count {
            let mut normal = normals[i - 1];
            let axis = tangents[i - 1].cross(tangents[i]);

            if axis.length() > f32::EPSILON {
                let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
                normal = Quat::from_axis_angle(axis.normalize(), theta) * normal;
            }

            normals.push(normal);
            binormals.push(tangents[i].cross(normal));
        }

        // Closed curves distribute the leftover twist across all stations
        if closed && segments > 0 {
            let last = count - 1;
            let mut theta = normals[0].dot(normals[last]).clamp(-1.0, 1.0).acos() / segments as f32;
            if tangents[0].dot(normals[0].cross(normals[last])) > 0.0 {
                theta = -theta;
            }
            for i in 1..count {
                normals[i] = Quat::from_axis_angle(tangents[i], theta * i as f32) * normals[i];
                binormals[i] = tangents[i].cross(normals[i]);
            }
        }

        Self {
            tangents,
            normals,
            binormals,
        }
    }
}

/// Sweep a circular cross-section of `params.radius` along `curve`
pub fn sweep(curve: &Curve, params: TubeParams) -> MeshData {
    let tubular = params.tubular_segments.max(1);
    let radial = params.radial_segments.max(3);
    let frames = FrenetFrames::compute(curve, tubular, params.closed);

    let ring = radial as usize + 1;
    let stations = tubular as usize + 1;
    let mut mesh = MeshData {
        positions: Vec::with_capacity(ring * stations),
        normals: Vec::with_capacity(ring * stations),
        uvs: Vec::with_capacity(ring * stations),
        indices: Vec::with_capacity(tubular as usize * radial as usize * 6),
    };

    for i in 0..=tubular {
        // A closed tube's last ring repeats the first
        let station = if params.closed && i == tubular { 0 } else { i };
        let center = curve.point_at(station as f32 / tubular as f32);
        let n = frames.normals[station as usize];
        let b = frames.binormals[station as usize];

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * std::f32::consts::TAU;
            let sin = v.sin();
            let cos = -v.cos();

            let normal = (n * cos + b * sin).normalize_or_zero();
            let position = center + normal * params.radius;

            mesh.positions.push(position.to_array());
            mesh.normals.push(normal.to_array());
            mesh.uvs
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    let ring = ring as u32;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;

            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight() -> Curve {
        Curve::new(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)]).unwrap()
    }

    #[test]
    fn test_tube_buffer_sizes() {
        let params = TubeParams {
            tubular_segments: 10,
            radius: 0.5,
            radial_segments: 8,
            closed: false,
        };
        let mesh = sweep(&straight(), params);

        assert_eq!(mesh.vertex_count(), 11 * 9);
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        assert_eq!(mesh.indices.len(), 10 * 8 * 6);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_vertices_sit_on_radius() {
        let params = TubeParams {
            tubular_segments: 4,
            radius: 0.25,
            radial_segments: 12,
            closed: false,
        };
        let mesh = sweep(&straight(), params);

        for p in &mesh.positions {
            let radial = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((radial - 0.25).abs() < 1e-4);
        }
    }

    #[test]
    fn test_frames_are_orthonormal() {
        let curve = Curve::new(vec![
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(3.0, 1.0, 2.0),
        ])
        .unwrap();
        let frames = FrenetFrames::compute(&curve, 32, false);

        for i in 0..frames.tangents.len() {
            let t = frames.tangents[i];
            let n = frames.normals[i];
            let b = frames.binormals[i];
            assert!(t.dot(n).abs() < 1e-3, "station {i}");
            assert!(t.dot(b).abs() < 1e-3, "station {i}");
            assert!((n.length() - 1.0).abs() < 1e-3, "station {i}");
        }
    }
}
