use glam::{Vec2, Vec3};
use log::debug;

use crate::{
    camera::{Camera, CameraBasis},
    depth::DepthBuffer,
    mesh::Mesh,
};

const AREA_EPS: f32 = 1e-8;

#[derive(Clone, Copy, Debug)]
pub struct RasterConfig {
    /// Half-extent of the orthographic view volume; unused in perspective.
    pub ortho_scale: f32,
    /// Compile-time toggle in the original; a plain flag here. Signed
    /// screen-space area < 0 counts as front-facing.
    pub backface_culling: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            ortho_scale: 1.0,
            backface_culling: false,
        }
    }
}

/// Clip-polygon buffers reused across triangles.
struct Scratch {
    clip_in: Vec<Vec3>,
    clip_out: Vec<Vec3>,
}

impl Scratch {
    fn new() -> Self {
        Self {
            clip_in: Vec::with_capacity(8),
            clip_out: Vec::with_capacity(8),
        }
    }
}

fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

fn clip_point(a: Vec3, b: Vec3, da: f32, db: f32) -> Vec3 {
    let denom = da - db;
    let t = if denom.abs() > 1e-8 { da / denom } else { 0.0 };
    a + t * (b - a)
}

/// Sutherland-Hodgman against the single plane `z = near`. The output is a
/// convex polygon with 0, 3, or 4 vertices.
fn clip_near(input: &[Vec3], out: &mut Vec<Vec3>, near: f32) {
    out.clear();
    let n = input.len();
    for i in 0..n {
        let a = input[i];
        let b = input[(i + 1) % n];
        let da = a.z - near;
        let db = b.z - near;
        let ina = da >= 0.0;
        let inb = db >= 0.0;

        if ina && inb {
            out.push(b);
        } else if ina && !inb {
            out.push(clip_point(a, b, da, db));
        } else if !ina && inb {
            out.push(clip_point(a, b, da, db));
            out.push(b);
        }
    }
}

fn to_screen(ndc_x: f32, ndc_y: f32, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        (ndc_x * 0.5 + 0.5) * (width.saturating_sub(1) as f32),
        (-ndc_y * 0.5 + 0.5) * (height.saturating_sub(1) as f32),
    )
}

#[allow(clippy::too_many_arguments)]
fn raster_tri(
    cam: &Camera,
    cfg: &RasterConfig,
    aspect: f32,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    zbuf: &mut DepthBuffer,
) {
    let width = zbuf.width();
    let height = zbuf.height();

    let mut verts = [v0, v1, v2];
    if !cam.perspective {
        for v in &mut verts {
            v.x /= cfg.ortho_scale * aspect;
            v.y /= cfg.ortho_scale;
        }
    }

    let mut screen = [Vec2::ZERO; 3];
    let mut z = [0.0f32; 3];
    for (i, v) in verts.iter().enumerate() {
        let Some((nx, ny, vz)) = cam.project_to_ndc(*v, aspect) else {
            return;
        };
        screen[i] = to_screen(nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0), width, height);
        z[i] = vz;
    }
    let [s0, s1, s2] = screen;

    let area = edge(s0, s1, s2);
    if area.abs() < AREA_EPS {
        return;
    }
    if cfg.backface_culling && area > 0.0 {
        return;
    }

    let min_x = s0.x.min(s1.x).min(s2.x).floor().max(0.0) as usize;
    let max_x = s0.x.max(s1.x).max(s2.x).ceil().min((width - 1) as f32) as usize;
    let min_y = s0.y.min(s1.y).min(s2.y).floor().max(0.0) as usize;
    let max_y = s0.y.max(s1.y).max(s2.y).ceil().min((height - 1) as f32) as usize;
    if min_x > max_x || min_y > max_y {
        return;
    }

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let sample = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let u = edge(s1, s2, sample) / area;
            let v = edge(s2, s0, sample) / area;
            let w = edge(s0, s1, sample) / area;
            if u < 0.0 || v < 0.0 || w < 0.0 {
                continue;
            }

            // Perspective-correct depth: 1/z is linear in screen space.
            let denom = u / z[0] + v / z[1] + w / z[2];
            if denom.abs() < 1e-12 {
                continue;
            }
            let depth = 1.0 / denom;
            if depth <= cam.near {
                continue;
            }
            zbuf.write_min(px, py, depth);
        }
    }
}

/// Rasterises the soup into a minimum-z buffer under the given camera.
pub fn rasterize(mesh: &Mesh, cam: &Camera, cfg: &RasterConfig, zbuf: &mut DepthBuffer) {
    if zbuf.width() == 0 || zbuf.height() == 0 || mesh.is_empty() {
        return;
    }
    let aspect = zbuf.width() as f32 / zbuf.height().max(1) as f32;
    let basis = cam.basis();
    let mut scratch = Scratch::new();

    for tri in &mesh.triangles {
        raster_soup_tri(mesh_tri_to_camera(tri, cam, &basis), cam, cfg, aspect, &mut scratch, zbuf);
    }
    debug!("rasterized {} triangles", mesh.len());
}

fn mesh_tri_to_camera(tri: &[Vec3; 3], cam: &Camera, basis: &CameraBasis) -> [Vec3; 3] {
    [
        basis.to_camera(cam.position, tri[0]),
        basis.to_camera(cam.position, tri[1]),
        basis.to_camera(cam.position, tri[2]),
    ]
}

fn raster_soup_tri(
    cam_tri: [Vec3; 3],
    cam: &Camera,
    cfg: &RasterConfig,
    aspect: f32,
    scratch: &mut Scratch,
    zbuf: &mut DepthBuffer,
) {
    scratch.clip_in.clear();
    scratch.clip_in.extend_from_slice(&cam_tri);
    clip_near(&scratch.clip_in, &mut scratch.clip_out, cam.near);

    let poly = &scratch.clip_out;
    if poly.len() < 3 {
        return;
    }
    // Fan from vertex 0; the clipped polygon is convex.
    for i in 1..poly.len() - 1 {
        raster_tri(cam, cfg, aspect, poly[0], poly[i], poly[i + 1], zbuf);
    }
}
