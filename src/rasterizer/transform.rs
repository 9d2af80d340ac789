//! Model, view and projection matrix builders
//!
//! All builders are pure functions. Angles are in degrees.
//! The composed transform for a draw is `projection * view * model`.

use super::math::{Mat4, Vec3};

/// Translate world space so that `eye` becomes the origin.
/// The camera looks down -Z with +Y up; no rotation is applied.
pub fn view_matrix(eye: Vec3) -> Mat4 {
    Mat4::translation(Vec3::new(-eye.x, -eye.y, -eye.z))
}

/// General camera: look from `eye` towards `target`.
/// `look_at(eye, eye - Z, UP)` is equal to `view_matrix(eye)`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = (target - eye).normalize();
    let right = forward.cross(up).normalize();
    let true_up = right.cross(forward);

    let rotate = Mat4::from_rows([
        [right.x, right.y, right.z, 0.0],
        [true_up.x, true_up.y, true_up.z, 0.0],
        [-forward.x, -forward.y, -forward.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    rotate * view_matrix(eye)
}

/// Rotation about the Z axis
pub fn model_matrix(rotation_degrees: f32) -> Mat4 {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    Mat4::from_rows([
        [cos, -sin, 0.0, 0.0],
        [sin, cos, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Rotation about an arbitrary axis through the origin (Rodrigues' formula).
/// A zero-length axis yields the identity.
pub fn rotation(axis: Vec3, degrees: f32) -> Mat4 {
    let n = axis.normalize();
    if n == Vec3::ZERO {
        return Mat4::IDENTITY;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let k = 1.0 - cos;

    Mat4::from_rows([
        [
            cos + k * n.x * n.x,
            k * n.x * n.y - sin * n.z,
            k * n.x * n.z + sin * n.y,
            0.0,
        ],
        [
            k * n.y * n.x + sin * n.z,
            cos + k * n.y * n.y,
            k * n.y * n.z - sin * n.x,
            0.0,
        ],
        [
            k * n.z * n.x - sin * n.y,
            k * n.z * n.y + sin * n.x,
            cos + k * n.z * n.z,
            0.0,
        ],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Squish the frustum into a box. Points on the near plane keep their
/// position; points on the far plane keep their depth.
pub fn perspective_to_orthographic(near: f32, far: f32) -> Mat4 {
    Mat4::from_rows([
        [near, 0.0, 0.0, 0.0],
        [0.0, near, 0.0, 0.0],
        [0.0, 0.0, near + far, -far * near],
        [0.0, 0.0, 1.0, 0.0],
    ])
}

/// Map the box `[l,r] x [b,t] x [f,n]` to the `[-1,1]` cube: scale * translate.
pub fn orthographic(l: f32, r: f32, b: f32, t: f32, near: f32, far: f32) -> Mat4 {
    let scale = Mat4::scaling(Vec3::new(2.0 / (r - l), 2.0 / (t - b), 2.0 / (near - far)));
    let translate = Mat4::translation(Vec3::new(
        -(r + l) / 2.0,
        -(t + b) / 2.0,
        -(near + far) / 2.0,
    ));
    scale * translate
}

/// Perspective projection: `scale * translate * squish`.
///
/// `near == far` or `aspect_ratio == 0` divide by zero; the result is undefined.
/// With this construction the near plane maps to NDC z = +1 and the far plane to -1.
pub fn projection_matrix(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    let t = near * (fov_degrees / 2.0).to_radians().tan();
    let r = t * aspect_ratio;
    let (l, b) = (-r, -t);

    orthographic(l, r, b, t, near, far) * perspective_to_orthographic(near, far)
}
