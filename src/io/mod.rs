pub mod obj;
pub mod stl;
pub mod texture;
pub mod writer;

pub use obj::{load_obj, load_obj_str, ObjError};
pub use stl::{load_stl, load_stl_bytes, load_stl_str, StlError};
pub use texture::{load_tile_texture, load_tile_texture_from_bytes, TextureIoError};
pub use writer::{write_rgb, ImageWriteError};

use crate::mesh::Mesh;
use std::{error::Error, fmt, path::Path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshIoError {
    Stl(StlError),
    Obj(ObjError),
}

impl fmt::Display for MeshIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stl(e) => write!(f, "stl: {e}"),
            Self::Obj(e) => write!(f, "obj: {e}"),
        }
    }
}

impl Error for MeshIoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Stl(e) => Some(e),
            Self::Obj(e) => Some(e),
        }
    }
}

impl From<StlError> for MeshIoError {
    fn from(e: StlError) -> Self {
        Self::Stl(e)
    }
}

impl From<ObjError> for MeshIoError {
    fn from(e: ObjError) -> Self {
        Self::Obj(e)
    }
}

/// Loads a triangle soup, dispatching on the file extension: `.obj` goes to
/// the OBJ parser, anything else is treated as STL.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, MeshIoError> {
    let path = path.as_ref();
    let is_obj = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("obj"));
    if is_obj {
        Ok(load_obj(path)?)
    } else {
        Ok(load_stl(path)?)
    }
}
