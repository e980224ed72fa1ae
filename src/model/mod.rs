mod animation;
mod mesh;
mod model;
mod skeleton;
mod skin;

pub use animation::*;
pub use mesh::*;
pub use model::*;
pub use skeleton::*;
pub use skin::*;
