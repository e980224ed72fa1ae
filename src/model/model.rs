use crate::model::mesh::MeshData;
use crate::model::skeleton::SkeletonData;
use serde::{Deserialize, Serialize};

/// Everything a skinned model import hands to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimatedModelData {
    pub mesh: MeshData,
    pub skeleton: SkeletonData,
    /// Canonical joint ordering; `JointData::index` and mesh joint ids point into it.
    pub joint_order: Vec<String>,
}
