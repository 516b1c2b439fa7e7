use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{depth::DepthMap, target::RgbBuffer, texture::TileTexture, unionfind::RowUnionFind};

/// Smallest pixel separation; the background stripe period.
pub const MIN_SEPARATION: u16 = 3;
/// Depth of the plane the separation curve is biased away from.
const FOCUS_PLANE: f32 = 0.5;
/// Fixed PRNG seed, scoped per row so rows depend only on their own depth
/// values (and the already-painted row above, when propagation applies).
const COLOR_SEED: u64 = 123_456;

#[derive(Clone, Copy, Debug)]
pub struct SynthParams {
    pub eye_sep: u16,
    pub depth_gamma: f32,
    pub bg_separation: f32,
    pub foreground_threshold: f32,
    pub texture_brightness: f32,
    pub texture_contrast: f32,
}

/// Depth compressed toward the background before separation computation.
pub fn adjusted_depth(depth: &DepthMap, bg_separation: f32) -> Vec<f32> {
    depth
        .values()
        .iter()
        .map(|&d| d * (1.0 - bg_separation))
        .collect()
}

/// Per-pixel horizontal distance that must separate the two eye samples
/// sharing a colour. Larger adjusted depth (closer) means smaller
/// separation; the scale term biases pixels away from the focus plane.
pub fn separation_map(adj: &[f32], eye_sep: u16, depth_gamma: f32) -> Vec<u16> {
    let min_sep = MIN_SEPARATION as f32;
    let max_sep = eye_sep as f32;
    adj.iter()
        .map(|&a| {
            // Depth windows wider than [0, 1] are legal; clamp so the pow
            // stays defined and the envelope holds.
            let a = a.clamp(0.0, 1.0);
            let t = ((a - FOCUS_PLANE).abs() * 2.0).powf(1.5);
            let sep_scale = 1.0 + t * 0.5;
            let sep = min_sep + (max_sep - min_sep) * (1.0 - a).powf(depth_gamma) * sep_scale;
            (sep.round().clamp(min_sep, max_sep)) as u16
        })
        .collect()
}

fn fresh_color(
    rng: &mut StdRng,
    texture: Option<&TileTexture>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    params: &SynthParams,
) -> [u8; 3] {
    let c = match texture {
        Some(t) => {
            let tx = x as f32 * t.width() as f32 / width as f32;
            let ty = y as f32 * t.height() as f32 / height as f32;
            t.sample_adjusted(
                tx.clamp(0.0, (t.width() - 1) as f32),
                ty.clamp(0.0, (t.height() - 1) as f32),
                params.texture_brightness,
                params.texture_contrast,
            )
        }
        None => [rng.gen::<u8>(), rng.gen::<u8>(), rng.gen::<u8>()],
    };
    // Pure black is reserved; nudge it off so painted pixels are never
    // mistaken for unwritten ones.
    if c == [0, 0, 0] {
        [1, 1, 1]
    } else {
        c
    }
}

/// Builds the stereogram for a normalised depth map. Rows are processed
/// top to bottom; each row runs the union-find constraint pass and then
/// paints every pixel with its root's colour.
pub fn synthesize(depth: &DepthMap, texture: Option<&TileTexture>, params: &SynthParams) -> RgbBuffer {
    let width = depth.width();
    let height = depth.height();
    let mut out = RgbBuffer::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let adj = adjusted_depth(depth, params.bg_separation);
    let sep_map = separation_map(&adj, params.eye_sep, params.depth_gamma);
    debug!(
        "synthesizing {}x{} (eye_sep {}, texture: {})",
        width,
        height,
        params.eye_sep,
        texture.is_some()
    );

    let mut uf = RowUnionFind::new(width);
    let mut prev_uf = RowUnionFind::new(width);
    let mut root_color = vec![[0u8; 3]; width];
    let mut assigned = vec![false; width];

    for y in 0..height {
        let row = y * width;
        uf.reset();

        // Pair constraint: the two eye samples for this pixel's depth share
        // a colour. Foreground pixels also merge with their left neighbour
        // to keep near surfaces coherent.
        for x in 0..width {
            let sep = sep_map[row + x] as usize;
            let left = x as isize - (sep / 2) as isize;
            let right = left + sep as isize;
            if left >= 0 && (right as usize) < width {
                if adj[row + x] > params.foreground_threshold && x > 0 {
                    uf.unite(x - 1, x);
                }
                uf.unite(left as usize, right as usize);
            }
        }

        assigned.fill(false);
        for x in 0..width {
            if uf.find(x) != x {
                continue;
            }
            let mut color = None;

            if adj[row + x] > params.foreground_threshold {
                // Propagate an existing colour instead of drawing a fresh
                // one; first match wins. The row above is consulted through
                // its painted output bytes.
                if x > 0 {
                    let r = uf.find(x - 1);
                    if r != x && assigned[r] {
                        color = Some(root_color[r]);
                    }
                }
                if color.is_none() && y > 0 {
                    let r = prev_uf.find(x);
                    if r != x {
                        color = out.get(x, y - 1);
                    }
                }
                if color.is_none() && y > 0 && x > 0 {
                    let r = prev_uf.find(x - 1);
                    if r != x {
                        color = out.get(x - 1, y - 1);
                    }
                }
            }

            // PRNG scoped per root column: identical depth rows paint
            // identically wherever they land in the image.
            let color = match color {
                Some(c) => c,
                None => {
                    let mut rng = root_rng(x);
                    fresh_color(&mut rng, texture, x, y, width, height, params)
                }
            };
            root_color[x] = color;
            assigned[x] = true;
        }

        for x in 0..width {
            let r = uf.find(x);
            out.set(x, y, root_color[r]);
        }

        std::mem::swap(&mut uf, &mut prev_uf);
    }

    out
}

/// Deterministic per-root PRNG: seeded from the fixed seed and the root
/// column only, so a row's colours depend on nothing but its own contents.
fn root_rng(root_x: usize) -> StdRng {
    StdRng::seed_from_u64(COLOR_SEED ^ ((root_x as u64) << 1))
}

/// Depth-gated 3x3 blur. Interior pixels whose adjusted depth exceeds
/// `smooth_threshold` blend toward the mean of their neighbourhood with
/// weight `1 / max(1, smooth_weight)`. Averages read from a stable copy of
/// the pre-smoothing image.
pub fn smooth_edges(img: &mut RgbBuffer, adj: &[f32], smooth_threshold: f32, smooth_weight: f32) {
    let width = img.width();
    let height = img.height();
    if width < 3 || height < 3 {
        return;
    }
    let src = img.clone();
    let alpha = 1.0 / smooth_weight.max(1.0);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if adj[y * width + x] <= smooth_threshold {
                continue;
            }
            let mut acc = [0.0f32; 3];
            for dy in 0..3 {
                for dx in 0..3 {
                    let p = src.get(x + dx - 1, y + dy - 1).unwrap_or([0, 0, 0]);
                    for ch in 0..3 {
                        acc[ch] += p[ch] as f32;
                    }
                }
            }
            let orig = src.get(x, y).unwrap_or([0, 0, 0]);
            let mut blended = [0u8; 3];
            for ch in 0..3 {
                let mean = acc[ch] / 9.0;
                let v = orig[ch] as f32 * (1.0 - alpha) + mean * alpha;
                blended[ch] = v.round().clamp(0.0, 255.0) as u8;
            }
            img.set(x, y, blended);
        }
    }
}
