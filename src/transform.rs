use glam::{Mat3, Vec3};

use crate::mesh::Mesh;

/// Affine mesh transform applied in place, always in the fixed order
/// scale, shear, rotate, translate. Triangle order is preserved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTransform {
    pub scale: Vec3,
    /// `(sh_xy, sh_xz, sh_yz)`: x contributes to y, x to z, y to z.
    pub shear: Vec3,
    /// Euler angles in degrees, applied as `Z * Y * X`.
    pub rot_deg: Vec3,
    pub translation: Vec3,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            shear: Vec3::ZERO,
            rot_deg: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }
}

impl MeshTransform {
    pub fn is_identity(&self) -> bool {
        self.scale == Vec3::ONE
            && self.shear == Vec3::ZERO
            && self.rot_deg == Vec3::ZERO
            && self.translation == Vec3::ZERO
    }

    fn shear_matrix(&self) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(1.0, self.shear.x, self.shear.y),
            Vec3::new(0.0, 1.0, self.shear.z),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_rotation_z(self.rot_deg.z.to_radians())
            * Mat3::from_rotation_y(self.rot_deg.y.to_radians())
            * Mat3::from_rotation_x(self.rot_deg.x.to_radians())
    }

    pub fn apply(&self, mesh: &mut Mesh) {
        if self.is_identity() {
            return;
        }
        let shear = self.shear_matrix();
        let rot = self.rotation_matrix();
        for tri in &mut mesh.triangles {
            for v in tri {
                *v = rot * (shear * (*v * self.scale)) + self.translation;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_mesh(p: Vec3) -> Mesh {
        Mesh::from_triangles(vec![[p, p, p]])
    }

    fn first_vertex(m: &Mesh) -> Vec3 {
        m.triangles[0][0]
    }

    #[test]
    fn identity_leaves_mesh_untouched() {
        let mut m = Mesh::centered_quad(1.0, 0.0);
        let before = m.triangles.clone();
        MeshTransform::default().apply(&mut m);
        assert_eq!(m.triangles, before);
    }

    #[test]
    fn scale_applies_before_translation() {
        let mut m = point_mesh(Vec3::new(1.0, 0.0, 0.0));
        let t = MeshTransform {
            scale: Vec3::splat(2.0),
            translation: Vec3::new(10.0, 0.0, 0.0),
            ..Default::default()
        };
        t.apply(&mut m);
        assert!((first_vertex(&m) - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn shear_xy_moves_y_by_x() {
        let mut m = point_mesh(Vec3::new(2.0, 1.0, 0.0));
        let t = MeshTransform {
            shear: Vec3::new(0.5, 0.0, 0.0),
            ..Default::default()
        };
        t.apply(&mut m);
        assert!((first_vertex(&m) - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn shear_yz_moves_z_by_y() {
        let mut m = point_mesh(Vec3::new(0.0, 3.0, 1.0));
        let t = MeshTransform {
            shear: Vec3::new(0.0, 0.0, 0.25),
            ..Default::default()
        };
        t.apply(&mut m);
        assert!((first_vertex(&m) - Vec3::new(0.0, 3.0, 1.75)).length() < 1e-6);
    }

    #[test]
    fn rotation_z_quarter_turn_maps_x_to_y() {
        let mut m = point_mesh(Vec3::X);
        let t = MeshTransform {
            rot_deg: Vec3::new(0.0, 0.0, 90.0),
            ..Default::default()
        };
        t.apply(&mut m);
        assert!((first_vertex(&m) - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn euler_order_is_z_after_x() {
        // X then Z: +Y rotates to +Z under X(90), which Z(90) leaves alone.
        let mut m = point_mesh(Vec3::Y);
        let t = MeshTransform {
            rot_deg: Vec3::new(90.0, 0.0, 90.0),
            ..Default::default()
        };
        t.apply(&mut m);
        assert!((first_vertex(&m) - Vec3::Z).length() < 1e-5);
    }
}
