//! Scene graph arena
//!
//! The SceneGraph owns every node, geometry and material of the scene in
//! generational `slotmap` arenas. Nodes form a tree; resources are shared by
//! key. Disposal is tracked per resource so teardown can be verified to
//! release each geometry and material exactly once.

use slotmap::{new_key_type, SlotMap};
use skyline_math::{mat4, Mat4, Vec3};
use crate::{Material, MeshData, Node, NodeKind};

new_key_type! {
    /// Key of a node in the [`SceneGraph`]
    pub struct NodeKey;
    /// Key of a geometry resource
    pub struct GeometryKey;
    /// Key of a material resource
    pub struct MaterialKey;
}

/// A resource plus the number of times it has been disposed
#[derive(Debug)]
struct Tracked<T> {
    value: T,
    disposals: u32,
}

impl<T> Tracked<T> {
    fn new(value: T) -> Self {
        Self { value, disposals: 0 }
    }
}

/// Result of [`SceneGraph::dispose_all`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisposeReport {
    /// Geometries released by this call
    pub geometries: Vec<GeometryKey>,
    /// Materials released by this call
    pub materials: Vec<MaterialKey>,
}

impl DisposeReport {
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty() && self.materials.is_empty()
    }
}

/// A mesh node flattened to world space, ready to draw
#[derive(Clone, Copy, Debug)]
pub struct Drawable {
    pub node: NodeKey,
    pub geometry: GeometryKey,
    pub material: MaterialKey,
    pub world: Mat4,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Arena-backed scene graph
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
    geometries: SlotMap<GeometryKey, Tracked<MeshData>>,
    materials: SlotMap<MaterialKey, Tracked<Material>>,
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    // --- Resources ---

    /// Register a geometry, returning its key
    pub fn add_geometry(&mut self, mesh: MeshData) -> GeometryKey {
        self.geometries.insert(Tracked::new(mesh))
    }

    /// Register a material, returning its key
    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(Tracked::new(material))
    }

    pub fn geometry(&self, key: GeometryKey) -> Option<&MeshData> {
        self.geometries.get(key).map(|t| &t.value)
    }

    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key).map(|t| &t.value)
    }

    #[inline]
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    #[inline]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// All geometry keys
    pub fn geometry_keys(&self) -> impl Iterator<Item = GeometryKey> + '_ {
        self.geometries.keys()
    }

    /// All material keys
    pub fn material_keys(&self) -> impl Iterator<Item = MaterialKey> + '_ {
        self.materials.keys()
    }

    // --- Nodes ---

    /// Add a root node
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(Node { parent: None, ..node });
        self.roots.push(key);
        key
    }

    /// Add a node as a child of `parent`
    ///
    /// Falls back to adding a root if `parent` is not in the graph.
    pub fn add_child(&mut self, parent: NodeKey, node: Node) -> NodeKey {
        if !self.nodes.contains_key(parent) {
            log::warn!("add_child: parent {:?} not found, adding as root", parent);
            return self.add_node(node);
        }
        let key = self.nodes.insert(Node { parent: Some(parent), ..node });
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(key);
        }
        key
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Find the first node with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(NodeKey, &Node)> {
        self.nodes.iter().find(|(_, n)| n.name.as_deref() == Some(name))
    }

    /// Iterate over all nodes with a specific tag
    pub fn get_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (NodeKey, &'a Node)> + 'a {
        self.nodes.iter().filter(move |(_, n)| n.has_tag(tag))
    }

    /// Number of nodes carrying a tag
    pub fn count_tagged(&self, tag: &str) -> usize {
        self.nodes.values().filter(|n| n.has_tag(tag)).count()
    }

    /// Number of nodes whose kind matches the predicate
    pub fn count_kind(&self, pred: impl Fn(&NodeKind) -> bool) -> usize {
        self.nodes.values().filter(|n| pred(&n.kind)).count()
    }

    /// Get the number of nodes
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Iterate over all nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// World matrix of a node: parent transforms composed first
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let node = self.nodes.get(key)?;
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => Some(mat4::mul(self.world_matrix(parent)?, local)),
            None => Some(local),
        }
    }

    /// World-space position of a node
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.world_matrix(key).map(|m| mat4::transform_point(m, Vec3::ZERO))
    }

    /// Depth-first walk over visible nodes with their world matrices
    ///
    /// Invisible nodes are skipped together with their subtree.
    pub fn traverse(&self, mut visit: impl FnMut(NodeKey, &Node, Mat4)) {
        let mut stack: Vec<(NodeKey, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&k| (k, mat4::IDENTITY))
            .collect();

        while let Some((key, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(key) else { continue };
            if !node.is_visible() {
                continue;
            }
            let world = mat4::mul(parent_world, node.transform.matrix());
            visit(key, node, world);
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }
    }

    /// Flatten every visible mesh node to a [`Drawable`]
    pub fn drawables(&self) -> Vec<Drawable> {
        let mut out = Vec::new();
        self.traverse(|key, node, world| {
            if let NodeKind::Mesh { geometry, material } = node.kind {
                out.push(Drawable {
                    node: key,
                    geometry,
                    material,
                    world,
                    cast_shadow: node.casts_shadow(),
                    receive_shadow: node.receives_shadow(),
                });
            }
        });
        out
    }

    // --- Disposal ---

    /// Dispose every geometry and material that has not been disposed yet
    ///
    /// Shared resources are released once no matter how many meshes use
    /// them. Calling this again releases nothing.
    pub fn dispose_all(&mut self) -> DisposeReport {
        let mut report = DisposeReport::default();
        for (key, geometry) in self.geometries.iter_mut() {
            if geometry.disposals == 0 {
                geometry.disposals += 1;
                geometry.value = MeshData::new();
                report.geometries.push(key);
            }
        }
        for (key, material) in self.materials.iter_mut() {
            if material.disposals == 0 {
                material.disposals += 1;
                report.materials.push(key);
            }
        }
        log::debug!(
            "Disposed {} geometries and {} materials",
            report.geometries.len(),
            report.materials.len()
        );
        report
    }

    /// How many times a geometry has been disposed
    pub fn geometry_disposals(&self, key: GeometryKey) -> Option<u32> {
        self.geometries.get(key).map(|t| t.disposals)
    }

    /// How many times a material has been disposed
    pub fn material_disposals(&self, key: MaterialKey) -> Option<u32> {
        self.materials.get(key).map(|t| t.disposals)
    }

    /// True once every resource has been disposed
    pub fn is_disposed(&self) -> bool {
        self.geometries.values().all(|t| t.disposals > 0)
            && self.materials.values().all(|t| t.disposals > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeFlags, Transform};
    use skyline_math::Color;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_add_child_links_parent() {
        let mut graph = SceneGraph::new();
        let group = graph.add_node(Node::group().with_name("plane"));
        let child = graph.add_child(group, Node::group().with_name("wing"));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.roots(), &[group]);
        assert_eq!(graph.get(child).unwrap().parent(), Some(group));
        assert_eq!(graph.get(group).unwrap().children(), &[child]);
    }

    #[test]
    fn test_world_matrix_composes_parent_first() {
        let mut graph = SceneGraph::new();
        let group = graph.add_node(
            Node::group()
                .with_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)).with_uniform_scale(2.0)),
        );
        let child = graph.add_child(
            group,
            Node::group().with_transform(Transform::from_position(Vec3::new(1.0, 0.5, 0.0))),
        );

        let p = graph.world_position(child).unwrap();
        assert!(approx(p, Vec3::new(12.0, 1.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_get_by_name_and_tag() {
        let mut graph = SceneGraph::new();
        graph.add_node(Node::group().with_name("a").with_tag("cloud"));
        graph.add_node(Node::group().with_name("b").with_tag("cloud"));
        graph.add_node(Node::group().with_name("c").with_tag("airplane"));

        assert!(graph.get_by_name("b").is_some());
        assert!(graph.get_by_name("missing").is_none());
        assert_eq!(graph.count_tagged("cloud"), 2);
        assert_eq!(graph.get_by_tag("airplane").count(), 1);
    }

    #[test]
    fn test_drawables_skip_hidden_subtrees() {
        let mut graph = SceneGraph::new();
        let geo = graph.add_geometry(MeshData::cuboid(1.0, 1.0, 1.0));
        let mat = graph.add_material(Material::phong(Color::WHITE));

        let shown = graph.add_node(Node::group());
        graph.add_child(shown, Node::mesh(geo, mat).with_flags(NodeFlags::CAST_SHADOW));

        let hidden = graph.add_node(Node::group());
        graph.get_mut(hidden).unwrap().flags.remove(NodeFlags::VISIBLE);
        graph.add_child(hidden, Node::mesh(geo, mat));

        let drawables = graph.drawables();
        assert_eq!(drawables.len(), 1);
        assert!(drawables[0].cast_shadow);
        assert!(!drawables[0].receive_shadow);
    }

    #[test]
    fn test_shared_material_disposed_once() {
        let mut graph = SceneGraph::new();
        let a = graph.add_geometry(MeshData::cuboid(1.0, 1.0, 1.0));
        let b = graph.add_geometry(MeshData::cuboid(2.0, 1.0, 1.0));
        let shared = graph.add_material(Material::phong(Color::WHITE));
        graph.add_node(Node::mesh(a, shared));
        graph.add_node(Node::mesh(b, shared));

        let report = graph.dispose_all();
        assert_eq!(report.geometries.len(), 2);
        assert_eq!(report.materials.len(), 1);
        assert_eq!(graph.material_disposals(shared), Some(1));
        assert!(graph.is_disposed());

        let again = graph.dispose_all();
        assert!(again.is_empty());
        assert_eq!(graph.geometry_disposals(a), Some(1));
        assert_eq!(graph.geometry(a).unwrap().vertex_count(), 0);
    }

    #[test]
    fn test_add_child_missing_parent_becomes_root() {
        let mut graph = SceneGraph::new();
        graph.add_node(Node::group());
        // The null key is never present in an arena
        let orphan = graph.add_child(NodeKey::default(), Node::group());
        assert!(graph.get(orphan).unwrap().parent().is_none());
        assert_eq!(graph.roots().len(), 2);
    }
}
