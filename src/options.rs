use glam::Vec3;
use std::fmt;

pub use crate::smooth::SmoothMode;

/// Synthesis algorithm selector. One variant today; the enum is the seam
/// future methods plug into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SynthMethod {
    #[default]
    UnionFind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OptionError {
    ZeroDimension,
    EyeSepTooSmall { eye_sep: u16 },
    DepthRangeInverted { near: f32, far: f32 },
    NegativeBgSeparation { value: f32 },
    NonPositiveDepthGamma { value: f32 },
    NonPositiveNearPlane { value: f32 },
    FovOutOfRange { value: f32 },
    EmptyModelPath,
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OptionError::ZeroDimension => write!(f, "width and height must be positive"),
            OptionError::EyeSepTooSmall { eye_sep } => {
                write!(f, "eye_sep {eye_sep} is below the minimum separation 3")
            }
            OptionError::DepthRangeInverted { near, far } => {
                write!(f, "depth_near {near} must exceed depth_far {far}")
            }
            OptionError::NegativeBgSeparation { value } => {
                write!(f, "bg_separation {value} must be >= 0")
            }
            OptionError::NonPositiveDepthGamma { value } => {
                write!(f, "depth_gamma {value} must be > 0")
            }
            OptionError::NonPositiveNearPlane { value } => {
                write!(f, "near_plane {value} must be > 0")
            }
            OptionError::FovOutOfRange { value } => {
                write!(f, "fov {value} must lie in (0, 180)")
            }
            OptionError::EmptyModelPath => write!(f, "model path is empty"),
        }
    }
}

impl std::error::Error for OptionError {}

/// Flat configuration consumed read-only by the pipeline. Threaded as an
/// explicit parameter; there is no process-wide options state.
#[derive(Clone, Debug)]
pub struct Options {
    pub model_path: String,
    /// Empty or `"null"` means no texture: random dots.
    pub texture_path: String,
    pub out_prefix: String,
    pub out_ext: String,

    pub width: usize,
    pub height: usize,
    pub eye_sep: u16,

    pub fov_deg: f32,
    pub perspective: bool,
    pub near_plane: f32,
    pub cam_pos: Option<Vec3>,
    pub look_at: Option<Vec3>,
    pub orth_scale: Option<f32>,
    pub orth_tune_low: f32,
    pub orth_tune_hi: f32,

    pub scale: Vec3,
    pub shear: Vec3,
    pub rot_deg: Vec3,
    pub translation: Vec3,

    pub depth_near: f32,
    pub depth_far: f32,
    pub bg_separation: f32,
    pub depth_gamma: f32,
    pub foreground_threshold: f32,

    pub texture_brightness: f32,
    pub texture_contrast: f32,

    pub smooth_threshold: f32,
    pub smooth_weight: f32,

    pub laplace_smoothing: bool,
    pub laplace_smooth_layers: usize,
    pub smooth_mode: SmoothMode,
    pub draw_floor: bool,
    pub backface_culling: bool,
    pub method: SynthMethod,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            texture_path: String::new(),
            out_prefix: "out".to_owned(),
            out_ext: "png".to_owned(),

            width: 1200,
            height: 800,
            eye_sep: 100,

            fov_deg: 45.0,
            perspective: true,
            near_plane: 0.1,
            cam_pos: None,
            look_at: None,
            orth_scale: None,
            orth_tune_low: 0.6,
            orth_tune_hi: 1.2,

            scale: Vec3::ONE,
            shear: Vec3::ZERO,
            rot_deg: Vec3::ZERO,
            translation: Vec3::ZERO,

            depth_near: 0.75,
            depth_far: 0.10,
            bg_separation: 0.40,
            depth_gamma: 0.9,
            foreground_threshold: 0.90,

            texture_brightness: 1.0,
            texture_contrast: 1.0,

            smooth_threshold: 0.75,
            smooth_weight: 1.0,

            laplace_smoothing: false,
            laplace_smooth_layers: 3,
            smooth_mode: SmoothMode::Taubin,
            draw_floor: false,
            backface_culling: false,
            method: SynthMethod::UnionFind,
        }
    }
}

impl Options {
    pub fn with_model(mut self, path: impl Into<String>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.texture_path = path.into();
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_out_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.out_prefix = prefix.into();
        self
    }

    pub fn has_texture(&self) -> bool {
        !(self.texture_path.is_empty() || self.texture_path == "null")
    }

    pub fn validate(&self) -> Result<(), OptionError> {
        if self.width == 0 || self.height == 0 {
            return Err(OptionError::ZeroDimension);
        }
        if self.eye_sep < 3 {
            return Err(OptionError::EyeSepTooSmall {
                eye_sep: self.eye_sep,
            });
        }
        if !(self.depth_near > self.depth_far) {
            return Err(OptionError::DepthRangeInverted {
                near: self.depth_near,
                far: self.depth_far,
            });
        }
        if self.bg_separation < 0.0 || !self.bg_separation.is_finite() {
            return Err(OptionError::NegativeBgSeparation {
                value: self.bg_separation,
            });
        }
        if !(self.depth_gamma > 0.0) {
            return Err(OptionError::NonPositiveDepthGamma {
                value: self.depth_gamma,
            });
        }
        if !(self.near_plane > 0.0) {
            return Err(OptionError::NonPositiveNearPlane {
                value: self.near_plane,
            });
        }
        if self.perspective && !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(OptionError::FovOutOfRange {
                value: self.fov_deg,
            });
        }
        if self.model_path.is_empty() {
            return Err(OptionError::EmptyModelPath);
        }
        Ok(())
    }
}
