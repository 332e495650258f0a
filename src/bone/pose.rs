use glam::Mat4;

use super::cache::NodeBindings;
use super::clip::AnimationClip;
use super::registry::SkeletonRegistry;
use super::sample::local_transform;
use crate::error::SkinningError;
use crate::scene::{NodeIndex, NodeTree};

/// The clip driving a pose evaluation and the tick to sample it at
#[derive(Debug, Clone, Copy)]
pub struct ActiveClip<'a> {
    /// Position of `clip` in the library, used for track bindings
    pub index: usize,
    pub clip: &'a AnimationClip,
    pub time: f32,
}

/// What a pose evaluation wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseStats {
    /// Bone matrices written
    pub written: usize,
    /// Bones skipped because their ID did not fit the transform array
    pub out_of_bounds: usize,
}

/// Walk the node tree from the root and write skinning matrices.
///
/// Each node's local transform is the sampled clip value when the node is a
/// bone and a clip is active, otherwise its static bind transform. A bone the
/// clip does not animate samples to identity. The parent's global transform
/// is carried down by value, and each bone receives
/// `global * offset_matrix`; the offset must come last so mesh-space
/// vertices are first taken into bone space.
///
/// A bone ID outside the transform array is logged and skipped; the rest of
/// the frame is still written.
pub fn evaluate_pose(
    tree: &NodeTree,
    bindings: &NodeBindings,
    active: Option<ActiveClip<'_>>,
    registry: &mut SkeletonRegistry,
) -> PoseStats {
    let mut stats = PoseStats::default();
    if tree.is_empty() {
        return stats;
    }

    let mut stack: Vec<(NodeIndex, Mat4)> = vec![(0, Mat4::IDENTITY)];
    while let Some((index, parent_global)) = stack.pop() {
        let Some(node) = tree.get(index) else {
            continue;
        };
        let bone = bindings.bone(index);

        let local = match (bone, active) {
            (Some(_), Some(active)) => bindings
                .track(active.index, index)
                .and_then(|track| active.clip.track(track))
                .map(|tracks| local_transform(tracks, active.time))
                .unwrap_or(Mat4::IDENTITY),
            _ => node.local_bind_transform,
        };
        let global = parent_global * local;

        if let Some(id) = bone {
            let final_transform = registry.bone(id).map(|b| global * b.offset_matrix);
            let written = match final_transform {
                Some(final_transform) => registry.set_final_transform(id, final_transform),
                None => Err(SkinningError::BoneIndexOutOfBounds {
                    id: id.0,
                    len: registry.bone_transforms().len(),
                }),
            };

            match written {
                Ok(()) => stats.written += 1,
                Err(e) => {
                    log::error!("Node '{}': {}", node.name, e);
                    stats.out_of_bounds += 1;
                }
            }
        }

        // Reverse so children are visited in declaration order
        for &child in node.children.iter().rev() {
            stack.push((child, global));
        }
    }

    stats
}
