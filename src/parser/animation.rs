use crate::error::DaeError;
use crate::model::{AnimationData, JointTransformData, KeyFrameData};
use crate::parser::matrix::row_major_matrix;
use crate::parser::query::NodeRef;
use crate::parser::skeleton::find_armature;
use log::info;
use nalgebra_glm as glm;

/// Samples one local transform per joint per keyframe time.
///
/// Every `animation` element is expected to be sampled at the times of the
/// first one. The root joint's samples are pre-multiplied by `correction`.
pub fn extract_key_frames(
    animations: &NodeRef<'_>,
    visual_scenes: &NodeRef<'_>,
    correction: &glm::Mat4,
) -> Result<AnimationData, DaeError> {
    let root_joint = find_root_joint_name(visual_scenes)?;
    let times = key_times(animations)?;
    let length_seconds = match times.last() {
        Some(&t) => t,
        None => {
            return Err(DaeError::new("empty-keyframes").with_arg("path", animations.path()));
        }
    };

    let mut key_frames: Vec<KeyFrameData> = times.iter().map(|&t| KeyFrameData::new(t)).collect();
    let joint_nodes = animations.children("animation");
    for joint_node in &joint_nodes {
        load_joint_transforms(&mut key_frames, joint_node, root_joint, correction)?;
    }

    info!(
        "Loaded animation: {} keyframes over {length_seconds}s, {} joints",
        key_frames.len(),
        joint_nodes.len()
    );
    Ok(AnimationData {
        length_seconds,
        key_frames,
    })
}

fn find_root_joint_name<'a>(visual_scenes: &NodeRef<'a>) -> Result<&'a str, DaeError> {
    find_armature(visual_scenes)?.child("node")?.attribute("id")
}

fn key_times(animations: &NodeRef<'_>) -> Result<Vec<f32>, DaeError> {
    animations
        .child("animation")?
        .child("source")?
        .child("float_array")?
        .floats()
}

fn load_joint_transforms(
    frames: &mut [KeyFrameData],
    joint_data: &NodeRef<'_>,
    root_joint: &str,
    correction: &glm::Mat4,
) -> Result<(), DaeError> {
    let joint_name = joint_name(joint_data)?;
    let data_id = data_id(joint_data)?;
    let array = joint_data
        .child_with_attribute("source", "id", data_id)?
        .child("float_array")?;
    let raw_data = array.floats()?;

    let expected = frames.len() * 16;
    if raw_data.len() < expected {
        return Err(DaeError::new("truncated-data")
            .with_arg("path", array.path())
            .with_arg("len", raw_data.len())
            .with_arg("expected", expected));
    }

    let is_root = joint_name == root_joint;
    for (frame, values) in frames.iter_mut().zip(raw_data.chunks_exact(16)) {
        let mut cells = [0.0f32; 16];
        cells.copy_from_slice(values);
        let mut transform = row_major_matrix(&cells);
        if is_root {
            transform = correction * transform;
        }
        frame.add_joint_transform(JointTransformData {
            joint_name_id: joint_name.to_string(),
            joint_local_transform: transform,
        });
    }
    Ok(())
}

/// Joint named by the channel target, e.g. `Hip/transform` -> `Hip`.
fn joint_name<'a>(joint_data: &NodeRef<'a>) -> Result<&'a str, DaeError> {
    let target = joint_data.child("channel")?.attribute("target")?;
    Ok(target.split('/').next().unwrap_or(target))
}

fn data_id<'a>(joint_data: &NodeRef<'a>) -> Result<&'a str, DaeError> {
    joint_data
        .child("sampler")?
        .child_with_attribute("input", "semantic", "OUTPUT")?
        .source_id()
}
