//! Scene graph arena
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]. The root
//! group is always node 0. Topology is fixed once the builder has run: the
//! graph offers no removal or reparenting, only transform access.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::AnimationTag;
use crate::mesh::MeshData;

/// Index of a node in its [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Local transform: translation, Euler XYZ rotation (radians), scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion, applying X then Y then Z in the local frame
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// Shape of a mesh node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Tapered cylinder along the local Y axis
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    /// Pre-swept tube; the source curve is not kept
    Tube(MeshData),
}

/// Blinn-Phong style surface description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// 24-bit sRGB hex, e.g. `0xC22028`
    pub color: u32,
    pub specular: u32,
    pub shininess: f32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub flat_shading: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: 0xFFFFFF,
            specular: 0x111111,
            shininess: 30.0,
            emissive: 0x000000,
            emissive_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
            flat_shading: false,
        }
    }
}

impl Material {
    pub fn color(color: u32) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_specular(mut self, specular: u32, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    pub fn with_emissive(mut self, emissive: u32, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = opacity < 1.0;
        self
    }
}

/// Split a 24-bit hex color into sRGB components in [0, 1]
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// What a node renders as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Mesh { geometry: Geometry, material: Material },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub animation: Option<AnimationTag>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            transform,
            animation: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(
        name: impl Into<String>,
        geometry: Geometry,
        material: Material,
        transform: Transform,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh { geometry, material },
            transform,
            animation: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_animation(mut self, tag: AnimationTag) -> Self {
        self.animation = Some(tag);
        self
    }
}

/// Hierarchy of renderable nodes under a single root group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub const ROOT: NodeId = NodeId(0);

    /// Create a graph holding only the root group
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::group("scene", Transform::default())],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Attach `node` under `parent` and return its id
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root group exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut SceneNode)> {
        self.nodes.iter_mut().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Ids in depth-first pre-order starting at `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for child in self.children(current).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// World-space position of a node, composing all ancestor transforms
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let node = self.node(id)?;
        let mut position = node.transform.position;
        let mut parent = node.parent;
        while let Some(pid) = parent {
            let p = self.node(pid)?;
            position = p.transform.position + p.transform.quat() * (p.transform.scale * position);
            parent = p.parent;
        }
        Some(position)
    }

    /// Serialize the graph as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_walk() {
        let mut graph = SceneGraph::new();
        let group = graph.add_child(
            SceneGraph::ROOT,
            SceneNode::group("group", Transform::from_xyz(1.0, 0.0, 0.0)),
        );
        let a = graph.add_child(
            group,
            SceneNode::mesh(
                "a",
                Geometry::Box { width: 1.0, height: 1.0, depth: 1.0 },
                Material::default(),
                Transform::default(),
            ),
        );
        let b = graph.add_child(group, SceneNode::group("b", Transform::default()));

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.children(group), &[a, b]);
        assert_eq!(graph.node(a).unwrap().parent, Some(group));
        assert_eq!(graph.descendants(SceneGraph::ROOT), vec![SceneGraph::ROOT, group, a, b]);
        assert_eq!(graph.find("b"), Some(b));
        assert!(graph.find("missing").is_none());
    }

    #[test]
    fn test_world_position() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_child(
            SceneGraph::ROOT,
            SceneNode::group(
                "parent",
                Transform::from_xyz(2.0, 0.0, 0.0).with_scale(Vec3::splat(2.0)),
            ),
        );
        let child = graph.add_child(
            parent,
            SceneNode::group("child", Transform::from_xyz(0.0, 1.0, 0.0)),
        );

        let world = graph.world_position(child).unwrap();
        assert!(world.distance(Vec3::new(2.0, 2.0, 0.0)) < 1e-6);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(0xFF0000), [1.0, 0.0, 0.0]);
        let [r, g, b] = hex_to_rgb(0x2A377D);
        assert!((r - 42.0 / 255.0).abs() < 1e-6);
        assert!((g - 55.0 / 255.0).abs() < 1e-6);
        assert!((b - 125.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_json_dump() {
        let graph = SceneGraph::new();
        let json = graph.to_json().unwrap();
        assert!(json.contains("\"scene\""));
    }
}
