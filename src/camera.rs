use glam::Vec3;

use crate::mesh::MeshBounds;

/// Camera-space z below this counts as behind the eye.
pub const Z_EPS: f32 = 1e-6;

/// Right-handed orthonormal frame derived from a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl CameraBasis {
    /// World point into camera space: x along `right`, y along `up`,
    /// z along `forward` (positive in front of the camera).
    pub fn to_camera(&self, position: Vec3, world: Vec3) -> Vec3 {
        let rel = world - position;
        Vec3::new(
            rel.dot(self.right),
            rel.dot(self.up),
            rel.dot(self.forward),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub fov_deg: f32,
    pub perspective: bool,
    /// Must be positive; geometry at or before this plane is clipped.
    pub near: f32,
}

impl Camera {
    /// Default framing: back off along world +Z by 2.5x the largest extent.
    pub fn framing(bounds: &MeshBounds, fov_deg: f32, perspective: bool, near: f32) -> Self {
        let centre = bounds.centre();
        let span = bounds.span().max(1e-3);
        Self {
            position: centre + Vec3::new(0.0, 0.0, 2.5 * span),
            look_at: centre,
            up: Vec3::Y,
            fov_deg,
            perspective,
            near,
        }
    }

    /// `up` must not be colinear with the view direction.
    pub fn basis(&self) -> CameraBasis {
        let forward = (self.look_at - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        CameraBasis { right, up, forward }
    }

    /// Projects a camera-space point to NDC. Returns `None` when the point
    /// is at or behind the eye plane. For the orthographic path the caller
    /// pre-divides x/y by `(ortho_scale * aspect, ortho_scale)`.
    pub fn project_to_ndc(&self, p_cam: Vec3, aspect: f32) -> Option<(f32, f32, f32)> {
        let z = p_cam.z;
        if z <= Z_EPS {
            return None;
        }
        if self.perspective {
            let s = (self.fov_deg.to_radians() * 0.5).tan();
            Some((p_cam.x / (z * s * aspect), p_cam.y / (z * s), z))
        } else {
            Some((p_cam.x, p_cam.y, z))
        }
    }
}

/// Orthographic half-extent when no override is provided.
pub fn auto_ortho_scale(bounds: &MeshBounds, aspect: f32, tune_low: f32, tune_hi: f32) -> f32 {
    bounds.span() * tune_low * (1.0 / aspect).max(1.0) * tune_hi
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> MeshBounds {
        MeshBounds {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        }
    }

    fn test_camera(perspective: bool) -> Camera {
        Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            fov_deg: 90.0,
            perspective,
            near: 0.1,
        }
    }

    #[test]
    fn basis_is_right_handed_orthonormal() {
        let cam = test_camera(true);
        let b = cam.basis();
        assert!((b.forward - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        assert!(b.right.dot(b.up).abs() < 1e-6);
        assert!(b.up.dot(b.forward).abs() < 1e-6);
        assert!((b.right.cross(b.forward) + b.up).length() < 1e-6);
        assert!((b.right.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn camera_space_z_grows_toward_look_at() {
        let cam = test_camera(true);
        let b = cam.basis();
        let p = b.to_camera(cam.position, Vec3::ZERO);
        assert!((p.z - 5.0).abs() < 1e-5);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
    }

    #[test]
    fn projection_rejects_points_behind_eye() {
        let cam = test_camera(true);
        assert!(cam.project_to_ndc(Vec3::new(0.0, 0.0, -1.0), 1.0).is_none());
        assert!(cam.project_to_ndc(Vec3::new(0.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn perspective_projection_at_90_degrees() {
        let cam = test_camera(true);
        // tan(45 deg) == 1, so x == z lands on the NDC edge.
        let (nx, ny, z) = cam.project_to_ndc(Vec3::new(2.0, 2.0, 2.0), 1.0).unwrap();
        assert!((nx - 1.0).abs() < 1e-5);
        assert!((ny - 1.0).abs() < 1e-5);
        assert!((z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn perspective_divides_x_by_aspect() {
        let cam = test_camera(true);
        let (nx, _, _) = cam.project_to_ndc(Vec3::new(2.0, 0.0, 2.0), 2.0).unwrap();
        assert!((nx - 0.5).abs() < 1e-5);
    }

    #[test]
    fn orthographic_passes_xy_through() {
        let cam = test_camera(false);
        let (nx, ny, z) = cam.project_to_ndc(Vec3::new(0.25, -0.5, 3.0), 2.0).unwrap();
        assert_eq!((nx, ny), (0.25, -0.5));
        assert_eq!(z, 3.0);
    }

    #[test]
    fn framing_backs_off_along_world_z() {
        let cam = Camera::framing(&unit_bounds(), 45.0, true, 0.1);
        assert!((cam.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-6);
        assert_eq!(cam.look_at, Vec3::ZERO);
    }

    #[test]
    fn auto_ortho_scale_uses_inverse_aspect_only_when_tall() {
        let b = unit_bounds();
        let wide = auto_ortho_scale(&b, 2.0, 0.6, 1.2);
        let tall = auto_ortho_scale(&b, 0.5, 0.6, 1.2);
        assert!((wide - 2.0 * 0.6 * 1.2).abs() < 1e-5);
        assert!((tall - 2.0 * 0.6 * 2.0 * 1.2).abs() < 1e-5);
    }
}
