pub mod body;
pub mod registry;

pub use body::{Body, BodyFlags, Kinematics};
pub use registry::{BodyId, BodyRegistry};
