use glam::Vec3;
use log::debug;

use crate::{camera::Camera, mesh::Mesh};

/// Gap between the mesh's lowest point and the floor, as a fraction of the
/// mesh span.
const FLOOR_GAP: f32 = 0.05;
/// Floor half-extent as a multiple of the mesh span.
const FLOOR_HALF: f32 = 1.0;

/// Appends a camera-aligned ramp quad (two triangles) below the mesh.
/// The quad spans the camera's right and forward axes, sits a small gap
/// under the lowest vertex along camera-up, is wound so its normal opposes
/// `forward`, and is nudged along `forward` until it clears the near plane.
pub fn inject_floor(mesh: &mut Mesh, cam: &Camera) {
    let Some(bounds) = mesh.bounds() else {
        return;
    };
    let basis = cam.basis();
    let centre = bounds.centre();
    let span = bounds.span().max(1e-3);

    // Lowest vertex measured along camera-up.
    let mut min_up = f32::INFINITY;
    for tri in &mesh.triangles {
        for v in tri {
            min_up = min_up.min((*v - centre).dot(basis.up));
        }
    }

    let base = centre + basis.up * (min_up - FLOOR_GAP * span);
    let half = FLOOR_HALF * span;
    // The far edge rises, making a ramp whose face leans toward the camera.
    let rise = basis.up * half;
    let mut corners = [
        base - basis.right * half - basis.forward * half,
        base + basis.right * half - basis.forward * half,
        base + basis.right * half + basis.forward * half + rise,
        base - basis.right * half + basis.forward * half + rise,
    ];

    // Keep the whole quad past the near plane.
    let mut min_z = f32::INFINITY;
    for c in &corners {
        min_z = min_z.min((*c - cam.position).dot(basis.forward));
    }
    if min_z <= cam.near {
        let nudge = basis.forward * (cam.near - min_z + 1e-3 * span);
        for c in &mut corners {
            *c += nudge;
        }
    }

    let [a, b, c, d] = corners;
    let normal = (b - a).cross(c - a);
    if normal.dot(basis.forward) > 0.0 {
        mesh.push_quad(a, d, c, b);
    } else {
        mesh.push_quad(a, b, c, d);
    }
    debug!("floor quad injected below mesh (span {span})");
}
