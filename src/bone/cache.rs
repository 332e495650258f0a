use super::clip::AnimationClip;
use super::id::BoneId;
use super::registry::SkeletonRegistry;
use crate::scene::{NodeIndex, NodeTree};

/// Name lookups resolved once at load time so the per-frame walk never
/// touches a string.
///
/// Indexed by `NodeIndex`: which bone a node drives, and for every clip which
/// track set animates it.
#[derive(Debug, Clone, Default)]
pub struct NodeBindings {
    node_bones: Vec<Option<BoneId>>,
    /// `clip_tracks[clip][node]` is the node's track index in that clip
    clip_tracks: Vec<Vec<Option<usize>>>,
}

impl NodeBindings {
    pub fn resolve(tree: &NodeTree, registry: &SkeletonRegistry, clips: &[AnimationClip]) -> Self {
        let node_bones = tree
            .depth_first()
            .map(|(_, node)| registry.bone_id(&node.name))
            .collect();

        let clip_tracks = clips
            .iter()
            .map(|clip| {
                tree.depth_first()
                    .map(|(_, node)| clip.track_index(&node.name))
                    .collect()
            })
            .collect();

        Self {
            node_bones,
            clip_tracks,
        }
    }

    /// Bone driven by a node, `None` for helper nodes
    #[inline]
    pub fn bone(&self, node: NodeIndex) -> Option<BoneId> {
        self.node_bones.get(node).copied().flatten()
    }

    /// Track set animating a node in the given clip
    #[inline]
    pub fn track(&self, clip: usize, node: NodeIndex) -> Option<usize> {
        self.clip_tracks
            .get(clip)
            .and_then(|tracks| tracks.get(node))
            .copied()
            .flatten()
    }

    /// Number of nodes that map to a registered bone
    pub fn bound_bone_count(&self) -> usize {
        self.node_bones.iter().filter(|b| b.is_some()).count()
    }
}
