mod transform;

pub use transform::{clip_from_local, perspective, view_from_world, wrap_turns};
pub use transform::{EYE, FAR_DIST, FOV_Y, NEAR_DIST};
