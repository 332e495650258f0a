//! Scene graph arena.
//!
//! The imported node tree is flattened into a `Vec` in depth-first pre-order,
//! with children referenced by index. The root is always index 0 and every
//! parent appears before its children.

use glam::Mat4;

use crate::import::SceneNodeDesc;
use crate::math::mat4_from_rows;

/// Index of a node in a [`NodeTree`]
pub type NodeIndex = usize;

/// A scene node. Only nodes whose name matches a registered bone take part
/// in skinning; the rest are grouping/helper nodes.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    /// Static bind-pose transform relative to the parent
    pub local_bind_transform: Mat4,
    pub children: Vec<NodeIndex>,
    /// Indices into the scene's mesh list drawn at this node
    pub meshes: Vec<usize>,
}

/// Flattened, read-only scene graph
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<SceneNode>,
}

impl NodeTree {
    /// Flatten an owned node tree into the arena
    pub fn from_desc(root: &SceneNodeDesc) -> Self {
        let mut nodes = Vec::new();
        Self::push_node(&mut nodes, root);
        Self { nodes }
    }

    fn push_node(nodes: &mut Vec<SceneNode>, desc: &SceneNodeDesc) -> NodeIndex {
        let index = nodes.len();
        nodes.push(SceneNode {
            name: desc.name.clone(),
            local_bind_transform: mat4_from_rows(&desc.transform),
            children: Vec::with_capacity(desc.children.len()),
            meshes: desc.meshes.clone(),
        });

        for child in &desc.children {
            let child_index = Self::push_node(nodes, child);
            nodes[index].children.push(child_index);
        }
        index
    }

    pub fn root(&self) -> &SceneNode {
        &self.nodes[0]
    }

    pub fn get(&self, index: NodeIndex) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in depth-first pre-order, paired with their index
    pub fn depth_first(&self) -> impl Iterator<Item = (NodeIndex, &SceneNode)> {
        // Arena order is pre-order by construction
        self.nodes.iter().enumerate()
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.nodes.iter().position(|node| node.name == name)
    }

    /// Inverse of the root's bind transform (normalizes skeleton space to
    /// model space for renderers that want it)
    pub fn global_inverse_transform(&self) -> Mat4 {
        self.root().local_bind_transform.inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4Extended;
    use glam::Vec3;

    fn translated(name: &str, x: f32) -> SceneNodeDesc {
        let mut node = SceneNodeDesc::new(name);
        // Row-major: translation sits in the last column of the first row
        node.transform[3] = x;
        node
    }

    fn sample_tree() -> SceneNodeDesc {
        let mut root = translated("Scene", 1.0);
        let mut hips = SceneNodeDesc::new("Hips");
        hips.children.push(SceneNodeDesc::new("LeftLeg"));
        hips.children.push(SceneNodeDesc::new("RightLeg"));
        root.children.push(hips);
        root.children.push(SceneNodeDesc::new("Camera"));
        root
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let tree = NodeTree::from_desc(&sample_tree());
        let names: Vec<&str> = tree.depth_first().map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(names, ["Scene", "Hips", "LeftLeg", "RightLeg", "Camera"]);

        assert_eq!(tree.root().children, vec![1, 4]);
        assert_eq!(tree.get(1).unwrap().children, vec![2, 3]);
        assert!(tree.get(5).is_none());
    }

    #[test]
    fn test_parents_precede_children() {
        let tree = NodeTree::from_desc(&sample_tree());
        for (index, node) in tree.depth_first() {
            for &child in &node.children {
                assert!(child > index, "Child {} listed before parent {}", child, index);
            }
        }
    }

    #[test]
    fn test_find_and_global_inverse() {
        let tree = NodeTree::from_desc(&sample_tree());
        assert_eq!(tree.find("RightLeg"), Some(3));
        assert_eq!(tree.find("Missing"), None);

        let expected = Mat4::from_translation(Vec3::new(-1.0, 0.0, 0.0));
        assert!(tree.global_inverse_transform().approx_eq(&expected, 1e-6));
    }
}
