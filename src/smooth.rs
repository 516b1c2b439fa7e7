use glam::Vec3;
use log::debug;
use std::collections::HashMap;

use crate::mesh::Mesh;

/// Mesh smoothing mode for the optional pre-pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmoothMode {
    /// Umbrella operator: blend each vertex toward the mean of its
    /// neighbours.
    Uniform,
    /// Taubin lambda/mu with cotangent weights; shrink-compensated.
    Taubin,
}

const TAUBIN_LAMBDA: f32 = 0.5;
const TAUBIN_MU: f32 = -0.53;
const UMBRELLA_ALPHA: f32 = 0.5;
/// Quantisation step for welding soup corners into shared vertices.
const WELD_EPS: f32 = 1e-5;

/// Shared-vertex view of a soup: welded positions, triangle indices, and
/// the per-corner map back into the soup.
struct Welded {
    positions: Vec<Vec3>,
    tris: Vec<[usize; 3]>,
}

fn weld_key(v: Vec3) -> (i64, i64, i64) {
    (
        (v.x / WELD_EPS).round() as i64,
        (v.y / WELD_EPS).round() as i64,
        (v.z / WELD_EPS).round() as i64,
    )
}

fn weld(mesh: &Mesh) -> Welded {
    let mut index: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let mut positions = Vec::new();
    let mut tris = Vec::with_capacity(mesh.len());
    for tri in &mesh.triangles {
        let mut idx = [0usize; 3];
        for (k, v) in tri.iter().enumerate() {
            let id = *index.entry(weld_key(*v)).or_insert_with(|| {
                positions.push(*v);
                positions.len() - 1
            });
            idx[k] = id;
        }
        tris.push(idx);
    }
    Welded { positions, tris }
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Neighbour arenas plus the boundary mask. An edge on exactly one face
/// marks both its endpoints as boundary; boundary vertices stay pinned.
struct Adjacency {
    neighbours: Vec<Vec<usize>>,
    boundary: Vec<bool>,
}

fn build_adjacency(welded: &Welded) -> Adjacency {
    let n = welded.positions.len();
    let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut edge_faces: HashMap<(usize, usize), u32> = HashMap::new();

    for t in &welded.tris {
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            if a == b {
                continue;
            }
            let key = edge_key(a, b);
            let count = edge_faces.entry(key).or_insert(0);
            if *count == 0 {
                neighbours[a].push(b);
                neighbours[b].push(a);
            }
            *count += 1;
        }
    }

    let mut boundary = vec![false; n];
    for ((a, b), count) in &edge_faces {
        if *count == 1 {
            boundary[*a] = true;
            boundary[*b] = true;
        }
    }

    Adjacency {
        neighbours,
        boundary,
    }
}

fn umbrella_pass(positions: &mut [Vec3], adj: &Adjacency, alpha: f32) {
    let snapshot = positions.to_vec();
    for (i, p) in positions.iter_mut().enumerate() {
        if adj.boundary[i] || adj.neighbours[i].is_empty() {
            continue;
        }
        let mut mean = Vec3::ZERO;
        for &n in &adj.neighbours[i] {
            mean += snapshot[n];
        }
        mean /= adj.neighbours[i].len() as f32;
        *p = snapshot[i] * (1.0 - alpha) + mean * alpha;
    }
}

fn cot(a: Vec3, b: Vec3) -> f32 {
    let cross = a.cross(b).length();
    if cross < 1e-12 {
        return 0.0;
    }
    a.dot(b) / cross
}

/// One cotangent-weighted Laplacian step of size `step`. Negative or
/// non-finite weights are clamped to zero; boundary vertices are pinned.
fn taubin_pass(positions: &mut [Vec3], welded: &[[usize; 3]], adj: &Adjacency, step: f32) {
    let snapshot = positions.to_vec();
    let n = snapshot.len();
    let mut weights: HashMap<(usize, usize), f32> = HashMap::new();

    for t in welded {
        for (i, j, k) in [(t[0], t[1], t[2]), (t[1], t[2], t[0]), (t[2], t[0], t[1])] {
            // Cotangent at the corner opposite edge (i, j).
            let mut w = cot(snapshot[i] - snapshot[k], snapshot[j] - snapshot[k]) * 0.5;
            if !w.is_finite() || w < 0.0 {
                w = 0.0;
            }
            *weights.entry(edge_key(i, j)).or_insert(0.0) += w;
        }
    }

    for i in 0..n {
        if adj.boundary[i] || adj.neighbours[i].is_empty() {
            continue;
        }
        let mut total = 0.0;
        let mut delta = Vec3::ZERO;
        for &j in &adj.neighbours[i] {
            let w = weights.get(&edge_key(i, j)).copied().unwrap_or(0.0);
            total += w;
            delta += (snapshot[j] - snapshot[i]) * w;
        }
        if total > 1e-12 {
            positions[i] = snapshot[i] + delta * (step / total);
        }
    }
}

/// Smooths the soup in place. Corners are welded into shared vertices for
/// the duration of the pass and written back afterwards, so the triangle
/// count and ordering never change.
pub fn smooth(mesh: &mut Mesh, mode: SmoothMode, layers: usize) {
    if mesh.is_empty() || layers == 0 {
        return;
    }
    let welded = weld(mesh);
    let adj = build_adjacency(&welded);
    let mut positions = welded.positions.clone();
    debug!(
        "smoothing {} welded vertices over {} layers ({mode:?})",
        positions.len(),
        layers
    );

    for _ in 0..layers {
        match mode {
            SmoothMode::Uniform => umbrella_pass(&mut positions, &adj, UMBRELLA_ALPHA),
            SmoothMode::Taubin => {
                taubin_pass(&mut positions, &welded.tris, &adj, TAUBIN_LAMBDA);
                taubin_pass(&mut positions, &welded.tris, &adj, TAUBIN_MU);
            }
        }
    }

    for (tri, idx) in mesh.triangles.iter_mut().zip(&welded.tris) {
        for (corner, &vid) in tri.iter_mut().zip(idx) {
            *corner = positions[vid];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat fan: centre vertex shared by four quadrant triangles, lifted
    /// out of plane so smoothing has something to relax.
    fn spiked_fan(spike: f32) -> Mesh {
        let c = Vec3::new(0.0, 0.0, spike);
        let ring = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        let mut m = Mesh::new();
        for i in 0..4 {
            m.push([ring[i], ring[(i + 1) % 4], c]);
        }
        m
    }

    fn centre_height(m: &Mesh) -> f32 {
        // The shared corner is the third vertex of every fan triangle.
        m.triangles[0][2].z
    }

    #[test]
    fn welding_identifies_shared_corners() {
        let m = spiked_fan(1.0);
        let w = weld(&m);
        assert_eq!(w.positions.len(), 5);
        assert_eq!(w.tris.len(), 4);
    }

    #[test]
    fn boundary_ring_is_detected() {
        let m = spiked_fan(1.0);
        let w = weld(&m);
        let adj = build_adjacency(&w);
        let boundary_count = adj.boundary.iter().filter(|&&b| b).count();
        // Ring vertices are boundary; the centre is interior.
        assert_eq!(boundary_count, 4);
    }

    #[test]
    fn uniform_smoothing_pulls_spike_down_and_pins_boundary() {
        let mut m = spiked_fan(1.0);
        smooth(&mut m, SmoothMode::Uniform, 1);
        let z = centre_height(&m);
        assert!(z < 1.0 && z >= 0.0, "spike should relax toward the ring: {z}");
        // Boundary corners did not move.
        assert_eq!(m.triangles[0][0], Vec3::new(-1.0, -1.0, 0.0));
    }

    #[test]
    fn taubin_smoothing_relaxes_without_collapsing() {
        let mut m = spiked_fan(1.0);
        smooth(&mut m, SmoothMode::Taubin, 3);
        let z = centre_height(&m);
        assert!(z.is_finite());
        assert!(z < 1.0, "spike should relax: {z}");
        assert_eq!(m.len(), 4, "triangle count must not change");
    }

    #[test]
    fn smoothing_preserves_triangle_order_and_count() {
        let mut m = spiked_fan(0.5);
        let count = m.len();
        smooth(&mut m, SmoothMode::Taubin, 2);
        assert_eq!(m.len(), count);
        // Every fan triangle still references the (moved) centre corner.
        let c = m.triangles[0][2];
        for t in &m.triangles {
            assert_eq!(t[2], c);
        }
    }

    #[test]
    fn zero_layers_is_a_no_op() {
        let mut m = spiked_fan(1.0);
        let before = m.triangles.clone();
        smooth(&mut m, SmoothMode::Uniform, 0);
        assert_eq!(m.triangles, before);
    }
}
