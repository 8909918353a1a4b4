//! Per-draw model transforms.
//!
//! A [`Transform`] is what every scene object carries: a non-uniform scale,
//! three Euler angles in degrees and a position. It is recomputed for every
//! draw and never stored on the GPU as-is; only the composed matrix is.

use cgmath::{Deg, Matrix4, Vector3};

/// Scale, rotation (degrees about X, then Y, then Z) and position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Transform {
    /// Identity transform (unit scale, no rotation, origin).
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// Shorthand used by the milestone tables: `(scale, rotation, position)`.
    pub fn from_parts(scale: [f32; 3], rotation: [f32; 3], position: [f32; 3]) -> Self {
        Self {
            scale: scale.into(),
            rotation: rotation.into(),
            position: position.into(),
        }
    }

    /// `T(position) * Rx * Ry * Rz * S(scale)`.
    ///
    /// The rotation order is fixed; the milestone scenes were authored against it
    /// and swapping two factors changes the orientation of anything rotated about
    /// more than one axis.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        model_matrix(
            self.scale,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
            self.position,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose a model matrix from loose parameters, angles in degrees.
pub fn model_matrix(
    scale: Vector3<f32>,
    x_degrees: f32,
    y_degrees: f32,
    z_degrees: f32,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(position)
        * Matrix4::from_angle_x(Deg(x_degrees))
        * Matrix4::from_angle_y(Deg(y_degrees))
        * Matrix4::from_angle_z(Deg(z_degrees))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}
