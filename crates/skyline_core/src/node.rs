//! Scene nodes
//!
//! A Node is one element of the scene graph: a grouping transform, a mesh,
//! or a light. Nodes reference geometry and materials by key so resources can
//! be shared and disposed independently of the nodes using them.

use std::collections::HashSet;
use bitflags::bitflags;
use skyline_math::Color;
use crate::{GeometryKey, MaterialKey, NodeKey, Transform};

bitflags! {
    /// Per-node render flags
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are drawn
        const VISIBLE = 1 << 0;
        /// Node is drawn into the shadow map
        const CAST_SHADOW = 1 << 1;
        /// Node samples the shadow map when lit
        const RECEIVE_SHADOW = 1 << 2;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::VISIBLE
    }
}

/// What a node is
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// Pure transform, used to move several children together
    Group,
    /// Drawable mesh
    Mesh {
        geometry: GeometryKey,
        material: MaterialKey,
    },
    /// Uniform light applied to every surface
    AmbientLight { color: Color, intensity: f32 },
    /// Parallel light shining from the node position towards the origin
    DirectionalLight {
        color: Color,
        intensity: f32,
        /// Side length of the square shadow map, 0 when shadows are off
        shadow_map_size: u32,
    },
}

impl NodeKind {
    /// Short label used in logs and counts
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Mesh { .. } => "mesh",
            NodeKind::AmbientLight { .. } => "ambient_light",
            NodeKind::DirectionalLight { .. } => "directional_light",
        }
    }
}

/// A node in the scene graph
///
/// Each node has:
/// - An optional name (for lookup by name)
/// - Tags (for categorization, e.g. "cloud", "airplane")
/// - A transform relative to its parent
/// - Render flags
/// - A kind (group, mesh, light)
#[derive(Clone, Debug)]
pub struct Node {
    /// Optional name for this node (for lookup)
    pub name: Option<String>,
    /// Tags for categorization
    pub tags: HashSet<String>,
    /// Transform relative to the parent node
    pub transform: Transform,
    pub flags: NodeFlags,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl Node {
    /// Create a new node of the given kind at the origin
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform: Transform::identity(),
            flags: NodeFlags::default(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create an empty group node
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    /// Create a mesh node
    pub fn mesh(geometry: GeometryKey, material: MaterialKey) -> Self {
        Self::new(NodeKind::Mesh { geometry, material })
    }

    /// Set the name of this node (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this node
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Add render flags
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Check if this node has a specific tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    #[inline]
    pub fn casts_shadow(&self) -> bool {
        self.flags.contains(NodeFlags::CAST_SHADOW)
    }

    #[inline]
    pub fn receives_shadow(&self) -> bool {
        self.flags.contains(NodeFlags::RECEIVE_SHADOW)
    }

    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Direct children in insertion order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_math::Vec3;

    #[test]
    fn test_new_node_is_visible_group() {
        let node = Node::group();
        assert!(node.is_visible());
        assert!(!node.casts_shadow());
        assert_eq!(node.kind, NodeKind::Group);
        assert!(node.parent().is_none());
    }

    #[test]
    fn test_builder() {
        let node = Node::group()
            .with_name("block_0")
            .with_tag("city_block")
            .with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .with_flags(NodeFlags::CAST_SHADOW | NodeFlags::RECEIVE_SHADOW);

        assert_eq!(node.name.as_deref(), Some("block_0"));
        assert!(node.has_tag("city_block"));
        assert!(!node.has_tag("cloud"));
        assert!(node.is_visible());
        assert!(node.casts_shadow());
        assert!(node.receives_shadow());
        assert_eq!(node.transform.position.x, 1.0);
    }

    #[test]
    fn test_kind_labels() {
        let ambient = NodeKind::AmbientLight { color: Color::WHITE, intensity: 0.6 };
        assert_eq!(ambient.label(), "ambient_light");
        assert_eq!(NodeKind::Group.label(), "group");
    }
}
