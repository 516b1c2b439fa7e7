use crate::mesh::Mesh;
use glam::Vec3;
use std::{error::Error, fmt, fs, path::Path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjError {
    Io,
    ParseFloat,
    ParseIndex,
    MissingVertex,
    MissingFaceVertex,
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io error"),
            Self::ParseFloat => write!(f, "failed to parse float"),
            Self::ParseIndex => write!(f, "failed to parse index"),
            Self::MissingVertex => write!(f, "vertex index out of range"),
            Self::MissingFaceVertex => write!(f, "face missing vertex"),
        }
    }
}

impl Error for ObjError {}

fn parse_f32(s: &str) -> Result<f32, ObjError> {
    s.parse::<f32>().map_err(|_| ObjError::ParseFloat)
}

fn parse_i32(s: &str) -> Result<i32, ObjError> {
    s.parse::<i32>().map_err(|_| ObjError::ParseIndex)
}

/// One-based positive or negative-from-end OBJ index to a zero-based one.
fn resolve_index(idx: i32, len: usize) -> Result<usize, ObjError> {
    if idx == 0 {
        return Err(ObjError::ParseIndex);
    }
    let i = if idx > 0 {
        (idx - 1) as isize
    } else {
        len as isize + idx as isize
    };
    if i < 0 || i as usize >= len {
        return Err(ObjError::MissingVertex);
    }
    Ok(i as usize)
}

/// First field of a `v/vt/vn` face token. Texture and normal references are
/// ignored; only geometry feeds the depth pass.
fn parse_face_vertex(tok: &str) -> Result<i32, ObjError> {
    let v = tok.split('/').next().ok_or(ObjError::MissingFaceVertex)?;
    if v.is_empty() {
        return Err(ObjError::MissingFaceVertex);
    }
    parse_i32(v)
}

pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let src = fs::read_to_string(path.as_ref()).map_err(|_| ObjError::Io)?;
    load_obj_str(&src)
}

pub fn load_obj_str(src: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut mesh = Mesh::new();

    for line in src.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut it = line.split_whitespace();
        let Some(key) = it.next() else {
            continue;
        };
        match key {
            "v" => {
                let x = it.next().ok_or(ObjError::ParseFloat)?;
                let y = it.next().ok_or(ObjError::ParseFloat)?;
                let z = it.next().ok_or(ObjError::ParseFloat)?;
                positions.push(Vec3::new(parse_f32(x)?, parse_f32(y)?, parse_f32(z)?));
            }
            "f" => {
                let corners: Result<Vec<usize>, ObjError> = it
                    .map(|tok| {
                        let v = parse_face_vertex(tok)?;
                        resolve_index(v, positions.len())
                    })
                    .collect();
                let corners = corners?;
                if corners.len() < 3 {
                    continue;
                }
                // Fan triangulation around the first corner.
                let base = positions[corners[0]];
                for w in corners[1..].windows(2) {
                    mesh.push([base, positions[w[0]], positions[w[1]]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}
