//! First-person camera: pose, movement and view/projection math.
//!
//! The camera is defined by a world position plus yaw and pitch (no roll).
//! Its view-to-world transform is `Translation(position) * Rotation(yaw, pitch)`;
//! since the rotation part is orthonormal, the world-to-view matrix is obtained
//! exactly as `transpose(Rotation) * Translation(-position)` without a general
//! 4x4 inversion.

use cgmath::{Matrix, Matrix4, Rad, Vector3, Vector4, perspective};

/// cgmath's perspective matrix targets OpenGL's -1..1 clip-space depth.
/// wgpu expects 0..1, so projection matrices are corrected with this matrix.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Camera pose and aperture.
///
/// `znear` must be > 0. `zfar` should be the tightest bound that still contains
/// the scene; a loose far plane wastes depth-buffer precision. Neither is
/// validated here, callers uphold both.
///
/// Pitch is expected to stay within `[-PI/2, PI/2]`; the clamp is enforced by
/// the scene orchestration that feeds input into the camera, not by the camera
/// itself.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub vfov: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(vfov: Rad<f32>, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            vfov,
            aspect,
            znear,
            zfar,
        }
    }

    /// Move to an absolute position.
    pub fn move_to(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    /// Move relatively, in world space.
    pub fn move_by(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    pub fn move_forward(&mut self, speed: f32, dt: f32) {
        self.move_local(Vector4::new(0.0, 0.0, -1.0, 0.0), speed, dt);
    }

    pub fn move_backward(&mut self, speed: f32, dt: f32) {
        self.move_local(Vector4::new(0.0, 0.0, 1.0, 0.0), speed, dt);
    }

    pub fn move_left(&mut self, speed: f32, dt: f32) {
        self.move_local(Vector4::new(-1.0, 0.0, 0.0, 0.0), speed, dt);
    }

    pub fn move_right(&mut self, speed: f32, dt: f32) {
        self.move_local(Vector4::new(1.0, 0.0, 0.0, 0.0), speed, dt);
    }

    /// Translate along a camera-local direction, expressed in world space.
    ///
    /// The direction is a w=0 vector, so only the rotation part of the
    /// view-to-world transform applies to it.
    fn move_local(&mut self, direction: Vector4<f32>, speed: f32, dt: f32) {
        let world_dir = view_to_world(self) * direction;
        self.position += world_dir.truncate() * speed * dt;
    }

    /// World-to-view matrix for the current pose.
    ///
    /// Exact inverse of `Translation(position) * Rotation(yaw, pitch)`:
    /// the rotation is orthonormal, so its inverse is its transpose.
    pub fn world_to_view(&self) -> Matrix4<f32> {
        rotation(self.yaw, self.pitch).transpose() * Matrix4::from_translation(-self.position)
    }

    /// View-to-clip matrix, in wgpu's 0..1 depth convention.
    pub fn projection(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.vfov, self.aspect, self.znear, self.zfar)
    }

    /// Window-resize pass-through: only the aspect ratio changes.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }
}

/// Camera orientation: yaw about the world y axis, then pitch about the
/// rotated x axis. No roll.
fn rotation(yaw: Rad<f32>, pitch: Rad<f32>) -> Matrix4<f32> {
    Matrix4::from_angle_y(yaw) * Matrix4::from_angle_x(pitch)
}

fn view_to_world(camera: &Camera) -> Matrix4<f32> {
    Matrix4::from_translation(camera.position) * rotation(camera.yaw, camera.pitch)
}
