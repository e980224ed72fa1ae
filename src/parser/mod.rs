pub mod animation;
pub mod geometry;
pub mod load;
pub mod markup;
pub mod matrix;
pub mod node;
pub mod query;
pub mod skeleton;
pub mod skin;

pub use load::*;
pub use node::MarkupNode;
pub use query::NodeRef;
