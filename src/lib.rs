#![forbid(unsafe_code)]

//! Single-image stereogram (SIRDS) generation.
//!
//! The pipeline turns a triangle soup plus an optional RGB tile texture into
//! a depth map and then into an autostereogram: per scanline, pairs of pixels
//! separated by a depth-dependent distance are forced to share a colour.

pub mod camera;
pub mod depth;
pub mod floor;
pub mod io;
pub mod mesh;
pub mod options;
pub mod pipeline;
pub mod raster;
pub mod smooth;
pub mod synth;
pub mod target;
pub mod texture;
pub mod transform;
pub mod unionfind;

pub use crate::{
    camera::{Camera, CameraBasis},
    depth::{DepthBuffer, DepthMap},
    mesh::{Mesh, MeshBounds},
    options::{Options, SmoothMode, SynthMethod},
    pipeline::{generate, run, PipelineError, RunOutput},
    target::RgbBuffer,
    texture::TileTexture,
    transform::MeshTransform,
};
