use crate::target::RgbBuffer;
use std::{error::Error, fmt, path::Path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageWriteError {
    ImageFeatureDisabled,
    Encode,
}

impl fmt::Display for ImageWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageFeatureDisabled => write!(f, "feature `image` is disabled"),
            Self::Encode => write!(f, "failed to encode image"),
        }
    }
}

impl Error for ImageWriteError {}

/// Writes the buffer as RGB8; the format comes from the path extension.
pub fn write_rgb(img: &RgbBuffer, path: impl AsRef<Path>) -> Result<(), ImageWriteError> {
    #[cfg(feature = "image")]
    {
        image::save_buffer(
            path.as_ref(),
            img.as_slice(),
            img.width() as u32,
            img.height() as u32,
            image::ColorType::Rgb8,
        )
        .map_err(|_| ImageWriteError::Encode)
    }
    #[cfg(not(feature = "image"))]
    {
        let _ = (img, path);
        Err(ImageWriteError::ImageFeatureDisabled)
    }
}

#[cfg(all(test, feature = "image"))]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reloads_a_png() {
        let mut img = RgbBuffer::new(2, 1);
        img.set(0, 0, [255, 0, 0]);
        img.set(1, 0, [0, 0, 255]);

        let dir = std::env::temp_dir().join("sirds3d-writer-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.png");
        write_rgb(&img, &path).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (2, 1));
        assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(back.get_pixel(1, 0).0, [0, 0, 255]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_extension_is_an_encode_error() {
        let img = RgbBuffer::new(1, 1);
        let dir = std::env::temp_dir().join("sirds3d-writer-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.nope");
        assert_eq!(write_rgb(&img, &path), Err(ImageWriteError::Encode));
    }
}
