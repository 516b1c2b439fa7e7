/// Row-major 8-bit RGB raster, the output surface of the synthesiser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width.saturating_mul(height).saturating_mul(3)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
        true
    }

    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// FNV-1a over dimensions and pixels; handy for determinism checks.
    pub fn hash64(&self) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        fn mix(h: &mut u64, b: u8) {
            *h ^= b as u64;
            *h = h.wrapping_mul(0x100000001b3);
        }
        for b in self.width.to_le_bytes() {
            mix(&mut h, b);
        }
        for b in self.height.to_le_bytes() {
            mix(&mut h, b);
        }
        for &b in &self.data {
            mix(&mut h, b);
        }
        h
    }
}
