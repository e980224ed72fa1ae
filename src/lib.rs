//! Importer for line-oriented COLLADA documents describing a skinned,
//! animated mesh. Produces flat render arrays, a joint tree and keyframes.

pub mod error;
pub mod model;
pub mod parser;
pub mod settings;

pub use error::{DaeError, MarkupError};
pub use model::*;
pub use parser::{
    MarkupNode, NodeRef, extract_animation, extract_model, load_collada_animation,
    load_collada_model, load_document, parse_document,
};
pub use settings::ImportSettings;

pub const CONFY_APP_NAME: &str = "dae-import";
