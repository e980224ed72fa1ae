use crate::error::DaeError;
use crate::model::{JOINT_NOT_FOUND, JointData, SkeletonData};
use crate::parser::matrix::reversed_matrix;
use crate::parser::query::NodeRef;
use log::{info, warn};
use nalgebra_glm as glm;

/// Id of the scene node that holds the joint hierarchy.
pub const ARMATURE_ID: &str = "Armature";

/// The `Armature` node under `library_visual_scenes/visual_scene`.
pub(crate) fn find_armature<'a>(visual_scenes: &NodeRef<'a>) -> Result<NodeRef<'a>, DaeError> {
    visual_scenes
        .child("visual_scene")?
        .child_with_attribute("node", "id", ARMATURE_ID)
}

struct SkeletonLoader<'o> {
    joint_order: &'o [String],
    correction: &'o glm::Mat4,
    joint_count: usize,
}

/// Builds the joint tree below the armature; only the root gets `correction`.
pub fn extract_skeleton(
    visual_scenes: &NodeRef<'_>,
    joint_order: &[String],
    correction: &glm::Mat4,
) -> Result<SkeletonData, DaeError> {
    let head_node = find_armature(visual_scenes)?.child("node")?;
    let mut loader = SkeletonLoader {
        joint_order,
        correction,
        joint_count: 0,
    };
    let head_joint = loader.load_joint(&head_node, true)?;

    info!("Loaded skeleton: {} joints, root '{}'", loader.joint_count, head_joint.name_id);
    Ok(SkeletonData {
        joint_count: loader.joint_count,
        head_joint,
    })
}

impl SkeletonLoader<'_> {
    fn load_joint(&mut self, node: &NodeRef<'_>, is_root: bool) -> Result<JointData, DaeError> {
        let mut joint = self.extract_main_joint_data(node, is_root)?;
        for child in node.children("node") {
            joint.add_child(self.load_joint(&child, false)?);
        }
        Ok(joint)
    }

    fn extract_main_joint_data(&mut self, node: &NodeRef<'_>, is_root: bool) -> Result<JointData, DaeError> {
        let name_id = node.attribute("id")?;
        let index = match self.joint_order.iter().position(|n| n == name_id) {
            Some(i) => i as i32,
            None => {
                warn!("joint '{name_id}' is not in the skin's joint order");
                JOINT_NOT_FOUND
            }
        };

        let matrix_node = node.child("matrix")?;
        let values = matrix_node.floats()?;
        let values: &[f32; 16] = values.get(..16).and_then(|v| v.try_into().ok()).ok_or_else(|| {
            DaeError::new("truncated-data")
                .with_arg("path", matrix_node.path())
                .with_arg("len", values.len())
                .with_arg("expected", 16)
        })?;

        let mut transform = reversed_matrix(values);
        if is_root {
            transform = self.correction * transform;
        }

        self.joint_count += 1;
        Ok(JointData::new(index, name_id.to_string(), transform))
    }
}
