/// RGB tile texture sampled by the synthesiser.
///
/// Addressing is clamp-to-edge in texel space: callers hand in float
/// coordinates in `[0, w-1] x [0, h-1]` and the four corner taps are
/// clamped again before the bilinear blend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileTexture {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
}

impl TileTexture {
    pub fn from_rgb8(width: usize, height: usize, rgb: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(3)?;
        if expected == 0 || rgb.len() != expected {
            return None;
        }
        Some(Self { width, height, rgb })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn texel(&self, x: usize, y: usize) -> [f32; 3] {
        let i = (y * self.width + x) * 3;
        [
            self.rgb[i] as f32,
            self.rgb[i + 1] as f32,
            self.rgb[i + 2] as f32,
        ]
    }

    /// Bilinear tap at texel-space coordinates.
    pub fn sample_bilinear(&self, tex_x: f32, tex_y: f32) -> [f32; 3] {
        let x = tex_x.clamp(0.0, (self.width - 1) as f32);
        let y = tex_y.clamp(0.0, (self.height - 1) as f32);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let tx = x - x0 as f32;
        let ty = y - y0 as f32;

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x1, y0);
        let c01 = self.texel(x0, y1);
        let c11 = self.texel(x1, y1);

        let mut out = [0.0f32; 3];
        for ch in 0..3 {
            let top = c00[ch] + (c10[ch] - c00[ch]) * tx;
            let bot = c01[ch] + (c11[ch] - c01[ch]) * tx;
            out[ch] = top + (bot - top) * ty;
        }
        out
    }

    /// Bilinear tap followed by contrast, then brightness, clamped to a
    /// byte: `v <- ((v/255 - 0.5) * contrast + 0.5) * brightness`.
    pub fn sample_adjusted(
        &self,
        tex_x: f32,
        tex_y: f32,
        brightness: f32,
        contrast: f32,
    ) -> [u8; 3] {
        let raw = self.sample_bilinear(tex_x, tex_y);
        let mut out = [0u8; 3];
        for ch in 0..3 {
            let v = ((raw[ch] / 255.0 - 0.5) * contrast + 0.5) * brightness;
            out[ch] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}
