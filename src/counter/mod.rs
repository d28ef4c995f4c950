pub mod angle;
pub mod hysteresis;
pub mod merge;
pub mod session;

pub use angle::{instant_angle, joint_angle, tracked_sides, AngleFilter};
pub use hysteresis::{Phase, RepCounter};
pub use merge::JointMerger;
pub use session::{FrameUpdate, RepSession, SessionState};
