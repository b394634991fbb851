use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::{PI, TAU};

/// Camera position, looking at the origin.
pub const EYE: Vec3 = Vec3::new(0.0, 1.5, -3.0);
/// Vertical field of view, radians.
pub const FOV_Y: f32 = PI / 2.0;
pub const NEAR_DIST: f32 = 1.0;
pub const FAR_DIST: f32 = 100.0;

/// Wrap accumulated rotation into `[0, 1)` turns.
///
/// Holds for any step size, including deltas large enough to wrap several
/// times in one frame.
pub fn wrap_turns(turns: f32) -> f32 {
    turns - turns.floor()
}

/// Left-handed perspective projection with a reversed depth mapping: the
/// near plane lands on depth 1 and the far plane on depth 0.
///
/// When `near >= far` the hyperbolic mapping would divide by zero, so the
/// depth terms degrade to a fixed `(c, d) = (0, near)` mapping instead.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let y = (fov_y * 0.5).tan();
    let x = aspect * y;

    let (c, d) = if near < far {
        (near / (near - far), -far * near / (near - far))
    } else {
        (0.0, near)
    };

    Mat4::from_cols(
        Vec4::new(1.0 / x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, c, 1.0),
        Vec4::new(0.0, 0.0, d, 0.0),
    )
}

/// Fixed view transform: eye at [`EYE`], looking at the origin, +Y up.
pub fn view_from_world() -> Mat4 {
    Mat4::look_at_lh(EYE, Vec3::ZERO, Vec3::Y)
}

/// Combined per-frame transform: projection × view × model, where the model
/// spins about the vertical axis by `turns * 2π`.
pub fn clip_from_local(turns: f32, aspect: f32) -> Mat4 {
    let world_from_local = Mat4::from_rotation_y(turns * TAU);
    perspective(FOV_Y, aspect, NEAR_DIST, FAR_DIST) * view_from_world() * world_from_local
}
