use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// Index reported for a joint whose name is not part of the skin's joint order.
pub const JOINT_NOT_FOUND: i32 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointData {
    pub index: i32, // -1 means not in the joint order
    pub name_id: String,
    pub bind_local_transform: glm::Mat4,
    pub children: Vec<JointData>,
}

impl JointData {
    pub fn new(index: i32, name_id: String, bind_local_transform: glm::Mat4) -> Self {
        Self {
            index,
            name_id,
            bind_local_transform,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: JointData) {
        self.children.push(child);
    }

    /// Depth-first search by name, including `self`.
    pub fn find(&self, name_id: &str) -> Option<&JointData> {
        if self.name_id == name_id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonData {
    pub joint_count: usize,
    pub head_joint: JointData,
}
