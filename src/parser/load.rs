use crate::error::DaeError;
use crate::model::{AnimatedModelData, AnimationData};
use crate::parser::animation::extract_key_frames;
use crate::parser::geometry::extract_geometry;
use crate::parser::markup::parse_markup;
use crate::parser::node::MarkupNode;
use crate::parser::query::NodeRef;
use crate::parser::skeleton::extract_skeleton;
use crate::parser::skin::extract_skin;
use crate::settings::ImportSettings;
use log::{error, info};
use std::fs;
use std::path::Path;

pub fn parse_document(text: &str) -> Result<MarkupNode, DaeError> {
    Ok(parse_markup(text)?)
}

/// Reads and parses `path`; failures are logged before being returned.
pub fn load_document(path: impl AsRef<Path>) -> Result<MarkupNode, DaeError> {
    let path = path.as_ref();
    let result = fs::read_to_string(path)
        .map_err(DaeError::from)
        .and_then(|text| parse_document(&text));

    result.map_err(|e| {
        let e = e.with_arg("file", path.display());
        error!("Failed to load document: {e}");
        e
    })
}

/// Skin, then skeleton (ordered by the skin's joints), then geometry.
pub fn extract_model(root: &MarkupNode, settings: &ImportSettings) -> Result<AnimatedModelData, DaeError> {
    let root = NodeRef::root(root);
    let correction = settings.correction_matrix();

    let skinning = extract_skin(&root.child("library_controllers")?, settings.max_weights)?;
    let skeleton = extract_skeleton(
        &root.child("library_visual_scenes")?,
        &skinning.joint_order,
        &correction,
    )?;
    let mesh = extract_geometry(
        &root.child("library_geometries")?,
        &skinning.vertices_skin_data,
        &correction,
    )?;

    Ok(AnimatedModelData {
        mesh,
        skeleton,
        joint_order: skinning.joint_order,
    })
}

pub fn extract_animation(root: &MarkupNode, settings: &ImportSettings) -> Result<AnimationData, DaeError> {
    let root = NodeRef::root(root);
    extract_key_frames(
        &root.child("library_animations")?,
        &root.child("library_visual_scenes")?,
        &settings.correction_matrix(),
    )
}

pub fn load_collada_model(
    path: impl AsRef<Path>,
    settings: &ImportSettings,
) -> Result<AnimatedModelData, DaeError> {
    let path = path.as_ref();
    info!("Loading model: {}", path.display());
    let root = load_document(path)?;
    extract_model(&root, settings).map_err(|e| e.with_arg("file", path.display()))
}

pub fn load_collada_animation(
    path: impl AsRef<Path>,
    settings: &ImportSettings,
) -> Result<AnimationData, DaeError> {
    let path = path.as_ref();
    info!("Loading animation: {}", path.display());
    let root = load_document(path)?;
    extract_animation(&root, settings).map_err(|e| e.with_arg("file", path.display()))
}
