//! Sutherland-Hodgman polygon clipping used to build box/box face manifolds.

use glam::Vec3;

/// Distance within which a vertex counts as lying on a clip plane.
const ON_PLANE_TOLERANCE: f32 = 1e-4;

/// Half-space boundary; points with non-positive signed distance are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    normal: Vec3,
    offset: f32,
}

impl ClipPlane {
    pub fn through(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            offset: normal.dot(point),
        }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }
}

/// The four side planes of a rectangle centred at `center` and spanned by the
/// unit tangents `u` and `v`.
pub fn rectangle_planes(center: Vec3, u: Vec3, v: Vec3, half_u: f32, half_v: f32) -> [ClipPlane; 4] {
    [
        ClipPlane::through(center + u * half_u, u),
        ClipPlane::through(center - u * half_u, -u),
        ClipPlane::through(center + v * half_v, v),
        ClipPlane::through(center - v * half_v, -v),
    ]
}

/// Clips a convex polygon against every plane in turn.
pub fn clip_polygon(polygon: &[Vec3], planes: &[ClipPlane]) -> Vec<Vec3> {
    let mut clipped = polygon.to_vec();
    for plane in planes {
        if clipped.is_empty() {
            break;
        }
        clipped = clip_against(&clipped, plane);
    }
    clipped
}

fn clip_against(polygon: &[Vec3], plane: &ClipPlane) -> Vec<Vec3> {
    let mut kept = Vec::with_capacity(polygon.len() + 1);
    let Some(&last) = polygon.last() else {
        return kept;
    };

    let mut start = last;
    let mut start_distance = plane.signed_distance(start);
    for &end in polygon {
        let end_distance = plane.signed_distance(end);
        let start_inside = start_distance <= ON_PLANE_TOLERANCE;
        let end_inside = end_distance <= ON_PLANE_TOLERANCE;

        if start_inside != end_inside {
            let span = start_distance - end_distance;
            if span.abs() > f32::EPSILON {
                kept.push(start.lerp(end, start_distance / span));
            }
        }
        if end_inside {
            kept.push(end);
        }

        start = end;
        start_distance = end_distance;
    }
    kept
}
