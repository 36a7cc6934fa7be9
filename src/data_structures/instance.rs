//! Per-object transformation data.
//!
//! Each scene object pairs a model with an [`Instance`]: position, rotation
//! and scale, composed into the world matrix that is pushed into the transform
//! uniform block once per frame.

use cgmath::One;

/// Position, rotation (as quaternion) and scale of one scene object.
#[derive(Clone, Debug)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Identity transformation: no move, rotate, or scale.
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// World matrix in the usual T * R * S order: scale first, then rotate,
    /// then translate.
    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix4, Rotation3, SquareMatrix, Vector3, Vector4};

    #[test]
    fn identity_instance_is_identity_matrix() {
        let m = Instance::new().to_matrix();
        assert_eq!(m, Matrix4::identity());
    }

    #[test]
    fn translation_lands_in_the_last_column() {
        let instance = Instance {
            position: Vector3::new(1.0, -2.0, 3.0),
            ..Default::default()
        };
        let m = instance.to_matrix();
        assert_eq!(m[3], Vector4::new(1.0, -2.0, 3.0, 1.0));
    }

    #[test]
    fn scale_applies_before_rotation_and_translation() {
        let instance = Instance {
            position: Vector3::new(0.0, 0.0, -10.0),
            rotation: cgmath::Quaternion::from_angle_y(Deg(90.0)),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        // A point at local +x ends up scaled to 2, rotated onto -z, then
        // translated.
        let p = instance.to_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 0.0).abs() < 1e-5);
        assert!((p.y - 0.0).abs() < 1e-5);
        assert!((p.z - -12.0).abs() < 1e-5);
    }
}
