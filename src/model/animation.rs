use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointTransformData {
    pub joint_name_id: String,
    pub joint_local_transform: glm::Mat4,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFrameData {
    pub time: f32,
    pub joint_transforms: Vec<JointTransformData>,
}

impl KeyFrameData {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            joint_transforms: Vec::new(),
        }
    }

    pub fn add_joint_transform(&mut self, transform: JointTransformData) {
        self.joint_transforms.push(transform);
    }

    pub fn transform_of(&self, joint_name_id: &str) -> Option<&glm::Mat4> {
        self.joint_transforms
            .iter()
            .find(|t| t.joint_name_id == joint_name_id)
            .map(|t| &t.joint_local_transform)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationData {
    /// Time of the last keyframe, in seconds.
    pub length_seconds: f32,
    pub key_frames: Vec<KeyFrameData>,
}
