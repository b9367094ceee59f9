// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use glam::{Mat4, Vec3};

/// A yaw/pitch perspective camera.
///
/// Right-handed, `-Z` forward at zero yaw, with an OpenGL-style `[-1, 1]` clip
/// depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position.
    pub position: Vec3,
    /// Rotation around `+Y`, in radians.
    pub yaw: f32,
    /// Rotation around the camera's right axis, in radians.
    pub pitch: f32,
    /// Vertical field of view, in radians.
    pub fov_y_radians: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clipping plane distance.
    pub z_near: f32,
    /// Far clipping plane distance.
    pub z_far: f32,
}

/// Movement requested for one frame, usually from keyboard and mouse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraInput {
    /// Forward (+) / backward (-), in `[-1, 1]`.
    pub forward: f32,
    /// Right (+) / left (-), in `[-1, 1]`.
    pub right: f32,
    /// Up (+) / down (-), in `[-1, 1]`.
    pub up: f32,
    /// Yaw change, in radians.
    pub yaw_delta: f32,
    /// Pitch change, in radians.
    pub pitch_delta: f32,
}

/// Pitch stays just short of straight up/down so the basis never degenerates.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: 0.0,
            pitch: 0.0,
            fov_y_radians: 60.0_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }
}

impl Camera {
    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Unit vector to the camera's right, parallel to the ground.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// View-to-clip transform.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, self.aspect_ratio, self.z_near, self.z_far)
    }

    /// World-to-clip transform.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Updates the aspect ratio after a display resize.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Applies one frame of movement. `speed` is in units per second.
    pub fn integrate(&mut self, input: &CameraInput, delta_seconds: f32, speed: f32) {
        self.yaw += input.yaw_delta;
        self.pitch = (self.pitch + input.pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);

        let step = speed * delta_seconds;
        let movement = self.forward() * input.forward + self.right() * input.right + Vec3::Y * input.up;
        self.position += movement * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_relative_eq!(camera.forward().z, -1.0);
        assert_relative_eq!(camera.right().x, 1.0);
    }

    #[test]
    fn view_moves_the_origin_in_front_of_the_camera() {
        let camera = Camera::default();
        let origin = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.z, -3.0, epsilon = 1e-5);
    }

    #[test]
    fn integrate_moves_and_clamps_pitch() {
        let mut camera = Camera::default();
        camera.integrate(
            &CameraInput {
                forward: 1.0,
                pitch_delta: 10.0,
                ..Default::default()
            },
            0.5,
            2.0,
        );
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        // Moved one unit along the (steep) forward vector.
        assert_relative_eq!(
            (camera.position - Vec3::new(0.0, 0.0, 3.0)).length(),
            1.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn aspect_ratio_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(800, 0);
        assert_relative_eq!(camera.aspect_ratio, 16.0 / 9.0);
        camera.set_aspect_ratio(800, 400);
        assert_relative_eq!(camera.aspect_ratio, 2.0);
    }
}
