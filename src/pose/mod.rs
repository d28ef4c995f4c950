pub mod joint;
pub mod map;

pub use joint::{JointId, JointSample};
pub use map::JointMap;
