//! Fixed desktop camera standing in for the headset when the sandbox runs in a
//! window. Only used to turn mouse positions into pointer rays.

use cgmath::{perspective, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4};

use crate::gfx::picking::Ray;

#[derive(Debug, Clone, Copy)]
pub struct DesktopCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for DesktopCamera {
    /// Standing eye height, looking at the menu
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 1.6, 0.6),
            target: Vector3::new(0.0, 1.1, -1.0),
            up: Vector3::unit_y(),
            aspect: 16.0 / 9.0,
            fovy: Rad(std::f32::consts::PI / 3.0),
            znear: 0.05,
            zfar: 100.0,
        }
    }
}

impl DesktopCamera {
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.eye.x, self.eye.y, self.eye.z);
        let target = Point3::new(self.target.x, self.target.y, self.target.z);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        perspective(self.fovy, self.aspect, self.znear, self.zfar) * view
    }

    /// Convert a window position to a world-space ray through the camera
    pub fn screen_to_ray(&self, screen_pos: (f32, f32), screen_size: (f32, f32)) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;

        // Normalized device coordinates (-1 to 1), Y flipped
        let ndc_x = (2.0 * mouse_x) / screen_width.max(1.0) - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height.max(1.0);

        let inv_view_proj = self
            .view_projection()
            .invert()
            .unwrap_or(Matrix4::identity());

        let unproject = |z: f32| {
            let p = inv_view_proj * Vector4::new(ndc_x, ndc_y, z, 1.0);
            Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
        };
        let near = unproject(-1.0);
        let far = unproject(1.0);

        Ray::new(near, (far - near).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = DesktopCamera::default();
        let ray = camera.screen_to_ray((640.0, 360.0), (1280.0, 720.0));
        let expected = (camera.target - camera.eye).normalize();
        assert!((ray.direction - expected).magnitude() < 1e-3);
    }

    #[test]
    fn test_left_edge_ray_points_left() {
        let camera = DesktopCamera::default();
        let ray = camera.screen_to_ray((0.0, 360.0), (1280.0, 720.0));
        assert!(ray.direction.x < 0.0);
    }
}
