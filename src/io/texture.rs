use crate::texture::TileTexture;
use std::{error::Error, fmt, fs, path::Path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureIoError {
    Io,
    ImageFeatureDisabled,
    Decode,
    Invalid,
}

impl fmt::Display for TextureIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io error"),
            Self::ImageFeatureDisabled => write!(f, "feature `image` is disabled"),
            Self::Decode => write!(f, "failed to decode image"),
            Self::Invalid => write!(f, "invalid texture"),
        }
    }
}

impl Error for TextureIoError {}

pub fn load_tile_texture(path: impl AsRef<Path>) -> Result<TileTexture, TextureIoError> {
    let bytes = fs::read(path.as_ref()).map_err(|_| TextureIoError::Io)?;
    load_tile_texture_from_bytes(&bytes)
}

pub fn load_tile_texture_from_bytes(bytes: &[u8]) -> Result<TileTexture, TextureIoError> {
    #[cfg(feature = "image")]
    {
        let img = image::load_from_memory(bytes).map_err(|_| TextureIoError::Decode)?;
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        TileTexture::from_rgb8(w as usize, h as usize, rgb.into_raw())
            .ok_or(TextureIoError::Invalid)
    }
    #[cfg(not(feature = "image"))]
    {
        let _ = bytes;
        Err(TextureIoError::ImageFeatureDisabled)
    }
}
