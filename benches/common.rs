use glam::Vec3;
use sirds3d::{Camera, Mesh};

pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 400;

/// Procedural height field: `n x n` quads over a [-1, 1] square with a
/// smooth bump in the middle. Deterministic by construction.
pub fn terrain_mesh(n: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let height = |x: f32, y: f32| 0.6 * (-(x * x + y * y) * 3.0).exp();
    let at = |i: usize, j: usize| {
        let x = i as f32 / n as f32 * 2.0 - 1.0;
        let y = j as f32 / n as f32 * 2.0 - 1.0;
        Vec3::new(x, y, height(x, y))
    };
    for i in 0..n {
        for j in 0..n {
            let (a, b, c, d) = (at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
            mesh.push([a, b, c]);
            mesh.push([a, c, d]);
        }
    }
    mesh
}

pub fn bench_camera(mesh: &Mesh) -> Camera {
    let bounds = mesh.bounds().expect("bench mesh is never empty");
    Camera::framing(&bounds, 45.0, true, 0.1)
}
