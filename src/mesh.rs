use glam::Vec3;
use std::fmt;

/// Three world-space corners. Winding is only meaningful when backface
/// culling is enabled.
pub type Triangle = [Vec3; 3];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    PositionNotFinite { tri: usize },
    FloatCountNotTriples { len: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MeshError::PositionNotFinite { tri } => write!(f, "position_not_finite:{tri}"),
            MeshError::FloatCountNotTriples { len } => write!(f, "float_count_not_9t:{len}"),
        }
    }
}

impl std::error::Error for MeshError {}

/// Axis-aligned bounds of a non-empty soup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl MeshBounds {
    pub fn centre(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest extent across the three axes.
    pub fn span(&self) -> f32 {
        self.extents().max_element()
    }
}

/// Triangle soup: no shared vertices, no indices, no per-face attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Builds a soup from a flat float array of length `9 * T`.
    pub fn from_flat(floats: &[f32]) -> Result<Self, MeshError> {
        if !floats.len().is_multiple_of(9) {
            return Err(MeshError::FloatCountNotTriples { len: floats.len() });
        }
        let triangles = floats
            .chunks_exact(9)
            .map(|c| {
                [
                    Vec3::new(c[0], c[1], c[2]),
                    Vec3::new(c[3], c[4], c[5]),
                    Vec3::new(c[6], c[7], c[8]),
                ]
            })
            .collect();
        Ok(Self { triangles })
    }

    pub fn to_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.triangles.len() * 9);
        for t in &self.triangles {
            for v in t {
                out.extend_from_slice(&[v.x, v.y, v.z]);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn push(&mut self, tri: Triangle) {
        self.triangles.push(tri);
    }

    /// Appends the two triangles of the quad `a b c d` (fan from `a`).
    pub fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.triangles.push([a, b, c]);
        self.triangles.push([a, c, d]);
    }

    pub fn bounds(&self) -> Option<MeshBounds> {
        let mut it = self.triangles.iter().flatten();
        let first = *it.next()?;
        let mut min = first;
        let mut max = first;
        for v in it {
            min = min.min(*v);
            max = max.max(*v);
        }
        Some(MeshBounds { min, max })
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        for (i, t) in self.triangles.iter().enumerate() {
            for v in t {
                if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                    return Err(MeshError::PositionNotFinite { tri: i });
                }
            }
        }
        Ok(())
    }

    /// Axis-aligned square of half-extent `half` in the `z = z` plane,
    /// facing +Z. Handy for tests and the flat-plane scenarios.
    pub fn centered_quad(half: f32, z: f32) -> Self {
        let mut m = Self::new();
        m.push_quad(
            Vec3::new(-half, -half, z),
            Vec3::new(half, -half, z),
            Vec3::new(half, half, z),
            Vec3::new(-half, half, z),
        );
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_round_trip_preserves_triangles() {
        let m = Mesh::centered_quad(1.0, 0.5);
        let flat = m.to_flat();
        assert_eq!(flat.len(), 18);
        let back = Mesh::from_flat(&flat).unwrap();
        assert_eq!(back.triangles, m.triangles);
    }

    #[test]
    fn from_flat_rejects_partial_triangles() {
        assert!(matches!(
            Mesh::from_flat(&[0.0; 10]),
            Err(MeshError::FloatCountNotTriples { len: 10 })
        ));
    }

    #[test]
    fn bounds_of_quad() {
        let m = Mesh::centered_quad(2.0, -1.0);
        let b = m.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(-2.0, -2.0, -1.0));
        assert_eq!(b.max, Vec3::new(2.0, 2.0, -1.0));
        assert_eq!(b.centre(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(b.span(), 4.0);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn validate_rejects_nan() {
        let mut m = Mesh::centered_quad(1.0, 0.0);
        m.triangles[1][2].y = f32::NAN;
        assert!(matches!(
            m.validate(),
            Err(MeshError::PositionNotFinite { tri: 1 })
        ));
    }
}
