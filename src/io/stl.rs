use crate::mesh::Mesh;
use glam::Vec3;
use std::{error::Error, fmt, fs, path::Path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StlError {
    Io,
    InvalidFormat,
    UnexpectedEof,
}

impl fmt::Display for StlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io error"),
            Self::InvalidFormat => write!(f, "invalid stl format"),
            Self::UnexpectedEof => write!(f, "unexpected end of file"),
        }
    }
}

impl Error for StlError {}

fn read_f32_le(buf: &[u8], off: &mut usize) -> Result<f32, StlError> {
    if *off + 4 > buf.len() {
        return Err(StlError::UnexpectedEof);
    }
    let b = [buf[*off], buf[*off + 1], buf[*off + 2], buf[*off + 3]];
    *off += 4;
    Ok(f32::from_le_bytes(b))
}

fn read_vec3(buf: &[u8], off: &mut usize) -> Result<Vec3, StlError> {
    Ok(Vec3::new(
        read_f32_le(buf, off)?,
        read_f32_le(buf, off)?,
        read_f32_le(buf, off)?,
    ))
}

fn parse_binary(buf: &[u8]) -> Result<Mesh, StlError> {
    if buf.len() < 84 {
        return Err(StlError::InvalidFormat);
    }
    let mut off = 80;
    let tri_count = u32::from_le_bytes(
        buf.get(off..off + 4)
            .ok_or(StlError::InvalidFormat)?
            .try_into()
            .map_err(|_| StlError::InvalidFormat)?,
    ) as usize;
    off += 4;

    let mut mesh = Mesh::new();
    mesh.triangles.reserve(tri_count);

    for _ in 0..tri_count {
        // Facet normal is recomputable from the winding; skip it.
        let _normal = read_vec3(buf, &mut off)?;
        let v0 = read_vec3(buf, &mut off)?;
        let v1 = read_vec3(buf, &mut off)?;
        let v2 = read_vec3(buf, &mut off)?;

        if off + 2 > buf.len() {
            return Err(StlError::UnexpectedEof);
        }
        off += 2;

        mesh.push([v0, v1, v2]);
    }

    Ok(mesh)
}

fn parse_ascii(src: &str) -> Result<Mesh, StlError> {
    let mut verts: Vec<Vec3> = Vec::new();
    for line in src.lines() {
        let line = line.trim();
        if !line.starts_with("vertex") {
            continue;
        }
        let mut it = line.split_whitespace();
        let _ = it.next();
        let Some(x) = it.next() else {
            return Err(StlError::InvalidFormat);
        };
        let Some(y) = it.next() else {
            return Err(StlError::InvalidFormat);
        };
        let Some(z) = it.next() else {
            return Err(StlError::InvalidFormat);
        };
        let x = x.parse::<f32>().map_err(|_| StlError::InvalidFormat)?;
        let y = y.parse::<f32>().map_err(|_| StlError::InvalidFormat)?;
        let z = z.parse::<f32>().map_err(|_| StlError::InvalidFormat)?;
        verts.push(Vec3::new(x, y, z));
    }

    if verts.len() % 3 != 0 {
        return Err(StlError::InvalidFormat);
    }

    let mut mesh = Mesh::new();
    mesh.triangles.reserve(verts.len() / 3);
    for tri in verts.chunks_exact(3) {
        mesh.push([tri[0], tri[1], tri[2]]);
    }
    Ok(mesh)
}

/// Loads a binary or ASCII STL. A `solid` prefix alone does not make a file
/// ASCII; the body must also read like one.
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh, StlError> {
    let bytes = fs::read(path.as_ref()).map_err(|_| StlError::Io)?;
    load_stl_bytes(&bytes)
}

pub fn load_stl_bytes(bytes: &[u8]) -> Result<Mesh, StlError> {
    if bytes.starts_with(b"solid") {
        if let Ok(s) = std::str::from_utf8(bytes) {
            if s.contains("facet") && s.contains("vertex") {
                return parse_ascii(s);
            }
        }
    }
    parse_binary(bytes)
}

pub fn load_stl_str(src: &str) -> Result<Mesh, StlError> {
    parse_ascii(src)
}

#[cfg(test)]
pub(crate) fn binary_stl_bytes(tris: &[[Vec3; 3]]) -> Vec<u8> {
    let mut out = vec![0u8; 80];
    out.extend_from_slice(&(tris.len() as u32).to_le_bytes());
    for tri in tris {
        for _ in 0..3 {
            out.extend_from_slice(&0f32.to_le_bytes());
        }
        for v in tri {
            out.extend_from_slice(&v.x.to_le_bytes());
            out.extend_from_slice(&v.y.to_le_bytes());
            out.extend_from_slice(&v.z.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_triangle_parses() {
        let src = r#"
solid s
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid
"#;
        let mesh = load_stl_str(src).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0][1], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn binary_round_trips_through_the_sniffer() {
        let tris = [[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]];
        let bytes = binary_stl_bytes(&tris);
        let mesh = load_stl_bytes(&bytes).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0], tris[0]);
    }

    #[test]
    fn binary_file_starting_with_solid_is_not_mistaken_for_ascii() {
        let tris = [[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]];
        let mut bytes = binary_stl_bytes(&tris);
        bytes[..5].copy_from_slice(b"solid");
        let mesh = load_stl_bytes(&bytes).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn truncated_binary_reports_eof() {
        let tris = [[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]];
        let mut bytes = binary_stl_bytes(&tris);
        bytes.truncate(100);
        assert_eq!(load_stl_bytes(&bytes), Err(StlError::UnexpectedEof));
    }

    #[test]
    fn dangling_vertex_count_is_rejected() {
        let src = "solid s\nfacet\nvertex 0 0 0\nvertex 1 0 0\nendfacet\nendsolid";
        assert_eq!(load_stl_str(src), Err(StlError::InvalidFormat));
    }
}
