use serde::{Deserialize, Serialize};

/// Joint influences on one vertex. `joint_ids[i]` pairs with `weights[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexSkinData {
    pub joint_ids: Vec<i32>,
    pub weights: Vec<f32>,
}

impl VertexSkinData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.joint_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joint_ids.is_empty()
    }

    /// Overwrites the first entry lighter than `weight`, otherwise appends.
    ///
    /// Greedy and order dependent: the surviving set is not the top-K by
    /// weight.
    pub fn add_joint_effect(&mut self, joint_id: i32, weight: f32) {
        for i in 0..self.weights.len() {
            if weight > self.weights[i] {
                self.joint_ids[i] = joint_id;
                self.weights[i] = weight;
                return;
            }
        }

        self.joint_ids.push(joint_id);
        self.weights.push(weight);
    }

    /// Truncates to the first `max` entries (renormalised) or pads with
    /// `(0, 0.0)` until exactly `max` entries remain.
    pub fn limit_joint_number(&mut self, max: usize) {
        if self.joint_ids.len() > max {
            self.joint_ids.truncate(max);
            self.weights.truncate(max);
            let total: f32 = self.weights.iter().sum();
            if total > 0.0 {
                for w in &mut self.weights {
                    *w = (*w / total).min(1.0);
                }
            }
        } else {
            while self.joint_ids.len() < max {
                self.joint_ids.push(0);
                self.weights.push(0.0);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinningData {
    /// Joint names in the order every joint index refers to.
    pub joint_order: Vec<String>,
    /// One entry per raw mesh position, same ordinal.
    pub vertices_skin_data: Vec<VertexSkinData>,
}
