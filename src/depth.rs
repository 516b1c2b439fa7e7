use log::debug;

/// Raw per-pixel minimum camera-space z, `+inf` where nothing landed.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    z: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            z: vec![f32::INFINITY; width.saturating_mul(height)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.z.fill(f32::INFINITY);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.z
    }

    pub fn at(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.z[y * self.width + x])
    }

    /// Keeps the smaller z. Returns whether the pixel was updated.
    pub fn write_min(&mut self, x: usize, y: usize, z: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = y * self.width + x;
        if z < self.z[i] {
            self.z[i] = z;
            true
        } else {
            false
        }
    }
}

/// Normalised depth in `[depth_far, depth_near]`, larger meaning closer.
#[derive(Clone, Debug)]
pub struct DepthMap {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl DepthMap {
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }
}

/// Maps raw z to `[depth_far, depth_near]` with the far side extended by
/// `bg_separation` to reserve a background plateau. Uncovered pixels get
/// `depth_far`; a collapsed range falls back to a span of 1.
pub fn normalize(zbuf: &DepthBuffer, depth_near: f32, depth_far: f32, bg_separation: f32) -> DepthMap {
    let mut zmin = f32::INFINITY;
    let mut zmax = f32::NEG_INFINITY;
    for &z in zbuf.as_slice() {
        if z.is_finite() {
            zmin = zmin.min(z);
            zmax = zmax.max(z);
        }
    }

    let n = zbuf.as_slice().len();
    if !zmin.is_finite() || !zmax.is_finite() {
        debug!("depth normalize: no coverage, emitting background only");
        return DepthMap::from_values(zbuf.width(), zbuf.height(), vec![depth_far; n]);
    }

    let zmax_ext = zmax + (zmax - zmin) * bg_separation;
    let mut range = zmax_ext - zmin;
    if range < 1e-8 {
        range = 1.0;
    }

    let values = zbuf
        .as_slice()
        .iter()
        .map(|&z| {
            if z.is_finite() {
                depth_near + (depth_far - depth_near) * (z - zmin) / range
            } else {
                depth_far
            }
        })
        .collect();
    DepthMap::from_values(zbuf.width(), zbuf.height(), values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEAR: f32 = 0.75;
    const FAR: f32 = 0.10;

    #[test]
    fn write_min_keeps_closest() {
        let mut zb = DepthBuffer::new(2, 2);
        assert!(zb.write_min(0, 0, 3.0));
        assert!(!zb.write_min(0, 0, 4.0));
        assert!(zb.write_min(0, 0, 2.0));
        assert_eq!(zb.at(0, 0), Some(2.0));
        assert!(!zb.write_min(2, 0, 1.0));
    }

    #[test]
    fn empty_buffer_normalizes_to_background() {
        let zb = DepthBuffer::new(3, 2);
        let d = normalize(&zb, NEAR, FAR, 0.4);
        assert!(d.values().iter().all(|&v| v == FAR));
    }

    #[test]
    fn closest_maps_to_depth_near() {
        let mut zb = DepthBuffer::new(2, 1);
        zb.write_min(0, 0, 1.0);
        zb.write_min(1, 0, 2.0);
        let d = normalize(&zb, NEAR, FAR, 0.0);
        assert!((d.at(0, 0) - NEAR).abs() < 1e-6);
        assert!((d.at(1, 0) - FAR).abs() < 1e-6);
    }

    #[test]
    fn bg_separation_keeps_farthest_above_depth_far() {
        let mut zb = DepthBuffer::new(2, 1);
        zb.write_min(0, 0, 1.0);
        zb.write_min(1, 0, 2.0);
        let d = normalize(&zb, NEAR, FAR, 0.4);
        // Far side is extended, so the farthest covered pixel stays short
        // of depth_far.
        assert!(d.at(1, 0) > FAR);
        assert!(d.at(1, 0) < NEAR);
    }

    #[test]
    fn collapsed_range_is_guarded() {
        let mut zb = DepthBuffer::new(2, 1);
        zb.write_min(0, 0, 5.0);
        zb.write_min(1, 0, 5.0);
        let d = normalize(&zb, NEAR, FAR, 0.0);
        assert!((d.at(0, 0) - NEAR).abs() < 1e-6);
        assert!((d.at(1, 0) - NEAR).abs() < 1e-6);
    }

    #[test]
    fn outputs_stay_inside_endpoint_interval() {
        let mut zb = DepthBuffer::new(4, 1);
        for (x, z) in [(0, 1.0), (1, 1.5), (2, 2.7), (3, 9.0)] {
            zb.write_min(x, 0, z);
        }
        let d = normalize(&zb, NEAR, FAR, 0.25);
        for &v in d.values() {
            assert!(v >= FAR - 1e-6 && v <= NEAR + 1e-6);
        }
    }
}
