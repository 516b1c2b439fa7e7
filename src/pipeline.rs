use glam::Vec3;
use log::{error, info, warn};
use std::{error::Error, fmt};

use crate::{
    camera::{auto_ortho_scale, Camera},
    depth::{self, DepthBuffer, DepthMap},
    floor::inject_floor,
    io::{self, ImageWriteError, MeshIoError, TextureIoError},
    mesh::{MeshBounds, MeshError},
    options::{OptionError, Options, SynthMethod},
    raster::{rasterize, RasterConfig},
    smooth::smooth,
    synth::{adjusted_depth, smooth_edges, synthesize, SynthParams},
    target::RgbBuffer,
    texture::TileTexture,
    transform::MeshTransform,
};

#[derive(Debug)]
pub enum PipelineError {
    InvalidOption(OptionError),
    MeshIo(MeshIoError),
    InvalidMesh(MeshError),
    TextureIo(TextureIoError),
    ImageWrite(ImageWriteError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOption(e) => write!(f, "invalid option: {e}"),
            Self::MeshIo(e) => write!(f, "failed to load model: {e}"),
            Self::InvalidMesh(e) => write!(f, "invalid model: {e}"),
            Self::TextureIo(e) => write!(f, "failed to load texture: {e}"),
            Self::ImageWrite(e) => write!(f, "failed to write output: {e}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidOption(e) => Some(e),
            Self::MeshIo(e) => Some(e),
            Self::InvalidMesh(e) => Some(e),
            Self::TextureIo(e) => Some(e),
            Self::ImageWrite(e) => Some(e),
        }
    }
}

impl From<OptionError> for PipelineError {
    fn from(e: OptionError) -> Self {
        Self::InvalidOption(e)
    }
}

impl From<MeshIoError> for PipelineError {
    fn from(e: MeshIoError) -> Self {
        Self::MeshIo(e)
    }
}

impl From<MeshError> for PipelineError {
    fn from(e: MeshError) -> Self {
        Self::InvalidMesh(e)
    }
}

impl From<TextureIoError> for PipelineError {
    fn from(e: TextureIoError) -> Self {
        Self::TextureIo(e)
    }
}

impl From<ImageWriteError> for PipelineError {
    fn from(e: ImageWriteError) -> Self {
        Self::ImageWrite(e)
    }
}

/// Output paths of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutput {
    pub depth_path: String,
    pub sirds_path: String,
}

fn depth_to_grey(depth: &DepthMap) -> RgbBuffer {
    let mut img = RgbBuffer::new(depth.width(), depth.height());
    for y in 0..depth.height() {
        for x in 0..depth.width() {
            let g = (depth.at(x, y).clamp(0.0, 1.0) * 255.0).round() as u8;
            img.set(x, y, [g, g, g]);
        }
    }
    img
}

/// Loads, transforms, rasterises, synthesises, and writes both output
/// images. The depth image goes to `<out_prefix>_depth.<out_ext>`, the
/// stereogram to `<out_prefix>_sirds.<out_ext>`.
pub fn run(opts: &Options) -> Result<RunOutput, PipelineError> {
    opts.validate()?;

    let mut mesh = io::load_mesh(&opts.model_path)?;
    mesh.validate()?;
    info!("loaded {} ({} triangles)", opts.model_path, mesh.len());
    if mesh.is_empty() {
        warn!("model has no triangles; output will be background only");
    }

    let transform = MeshTransform {
        scale: opts.scale,
        shear: opts.shear,
        rot_deg: opts.rot_deg,
        translation: opts.translation,
    };
    transform.apply(&mut mesh);

    if opts.laplace_smoothing {
        smooth(&mut mesh, opts.smooth_mode, opts.laplace_smooth_layers);
    }

    let bounds = mesh.bounds().unwrap_or(MeshBounds {
        min: Vec3::splat(-1.0),
        max: Vec3::splat(1.0),
    });
    let mut cam = Camera::framing(&bounds, opts.fov_deg, opts.perspective, opts.near_plane);
    if let Some(pos) = opts.cam_pos {
        cam.position = pos;
    }
    if let Some(look_at) = opts.look_at {
        cam.look_at = look_at;
    }

    if opts.draw_floor {
        inject_floor(&mut mesh, &cam);
    }

    let aspect = opts.width as f32 / opts.height as f32;
    let framed = mesh.bounds().unwrap_or(bounds);
    let cfg = RasterConfig {
        ortho_scale: opts
            .orth_scale
            .unwrap_or_else(|| auto_ortho_scale(&framed, aspect, opts.orth_tune_low, opts.orth_tune_hi)),
        backface_culling: opts.backface_culling,
    };

    let mut zbuf = DepthBuffer::new(opts.width, opts.height);
    rasterize(&mesh, &cam, &cfg, &mut zbuf);
    let depth = depth::normalize(&zbuf, opts.depth_near, opts.depth_far, opts.bg_separation);

    let texture: Option<TileTexture> = if opts.has_texture() {
        Some(io::load_tile_texture(&opts.texture_path)?)
    } else {
        None
    };

    let params = SynthParams {
        eye_sep: opts.eye_sep,
        depth_gamma: opts.depth_gamma,
        bg_separation: opts.bg_separation,
        foreground_threshold: opts.foreground_threshold,
        texture_brightness: opts.texture_brightness,
        texture_contrast: opts.texture_contrast,
    };
    let mut img = match opts.method {
        SynthMethod::UnionFind => synthesize(&depth, texture.as_ref(), &params),
    };

    let adj = adjusted_depth(&depth, opts.bg_separation);
    smooth_edges(&mut img, &adj, opts.smooth_threshold, opts.smooth_weight);

    let depth_path = format!("{}_depth.{}", opts.out_prefix, opts.out_ext);
    let sirds_path = format!("{}_sirds.{}", opts.out_prefix, opts.out_ext);
    io::write_rgb(&depth_to_grey(&depth), &depth_path)?;
    io::write_rgb(&img, &sirds_path)?;
    info!("wrote {depth_path} and {sirds_path}");

    Ok(RunOutput {
        depth_path,
        sirds_path,
    })
}

/// Process-style entry point: 0 on success, 1 on any failure, with the
/// error logged rather than propagated.
pub fn generate(opts: &Options) -> i32 {
    match run(opts) {
        Ok(_) => 0,
        Err(e) => {
            error!("{e}");
            1
        }
    }
}
