use crate::error::DaeError;
use crate::model::{SkinningData, VertexSkinData};
use crate::parser::query::{NodeRef, out_of_range};
use log::{debug, info};

/// Reads joint names and per-vertex influences from `library_controllers`.
pub fn extract_skin(controllers: &NodeRef<'_>, max_weights: usize) -> Result<SkinningData, DaeError> {
    let skin = controllers.child("controller")?.child("skin")?;
    let weights_node = skin.child("vertex_weights")?;

    let joint_order = load_joints_list(&skin, &weights_node)?;
    let weights = load_weights(&skin, &weights_node)?;
    let counts = weights_node.child("vcount")?.ints()?;
    let vertices_skin_data = load_skin_data(&weights_node, &counts, &weights, max_weights)?;

    info!(
        "Loaded skin: {} joints, {} weighted vertices",
        joint_order.len(),
        vertices_skin_data.len()
    );
    Ok(SkinningData {
        joint_order,
        vertices_skin_data,
    })
}

fn load_joints_list(skin: &NodeRef<'_>, weights_node: &NodeRef<'_>) -> Result<Vec<String>, DaeError> {
    let id = weights_node
        .child_with_attribute("input", "semantic", "JOINT")?
        .source_id()?;
    let names = skin
        .child_with_attribute("source", "id", id)?
        .child("Name_array")?
        .names();
    Ok(names)
}

fn load_weights(skin: &NodeRef<'_>, weights_node: &NodeRef<'_>) -> Result<Vec<f32>, DaeError> {
    let id = weights_node
        .child_with_attribute("input", "semantic", "WEIGHT")?
        .source_id()?;
    skin.child_with_attribute("source", "id", id)?
        .child("float_array")?
        .floats()
}

fn load_skin_data(
    weights_node: &NodeRef<'_>,
    counts: &[u32],
    weights: &[f32],
    max_weights: usize,
) -> Result<Vec<VertexSkinData>, DaeError> {
    let v = weights_node.child("v")?;
    let stream = v.numbers::<i32>()?;
    let mut pairs = stream.chunks(2);

    let mut skin_data = Vec::with_capacity(counts.len());
    for (vertex, &count) in counts.iter().enumerate() {
        let mut data = VertexSkinData::new();
        for _ in 0..count {
            let (joint_id, weight_id) = match pairs.next() {
                Some(&[joint_id, weight_id]) => (joint_id, weight_id),
                _ => {
                    return Err(DaeError::new("truncated-data")
                        .with_arg("path", v.path())
                        .with_arg("vertex", vertex)
                        .with_arg("len", stream.len()));
                }
            };
            let weight = usize::try_from(weight_id)
                .ok()
                .and_then(|i| weights.get(i))
                .ok_or_else(|| out_of_range(v.path(), "weight", weight_id, weights.len()))?;
            data.add_joint_effect(joint_id, *weight);
        }
        if data.len() > max_weights {
            debug!("vertex {vertex}: {} influences reduced to {max_weights}", data.len());
        }
        data.limit_joint_number(max_weights);
        skin_data.push(data);
    }
    Ok(skin_data)
}
