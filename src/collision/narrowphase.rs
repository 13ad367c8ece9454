use glam::{Mat3, Quat, Vec3};

use crate::{
    collision::{
        clipping::{clip_polygon, rectangle_planes},
        contact::{ContactManifold, ContactPoint},
    },
    core::{
        collider::{box_vertices, ColliderShape},
        rigidbody::RigidBody,
        types::Transform,
    },
    utils::allocator::EntityId,
};

/// Upper bound on points kept for a single box pair.
const MAX_MANIFOLD_POINTS: usize = 8;

/// Tolerance used when deciding whether a corner lies inside a box.
const CONTAINMENT_TOLERANCE: f32 = 1e-3;

/// Exact contact generation for the sphere, box and plane shapes.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Generates the manifold for a body pair; normals point from `body_a` to `body_b`.
    pub fn generate(
        id_a: EntityId,
        body_a: &RigidBody,
        id_b: EntityId,
        body_b: &RigidBody,
    ) -> Option<ContactManifold> {
        let points = Self::collide(
            &body_a.shape,
            &body_a.transform,
            &body_b.shape,
            &body_b.transform,
        );
        if points.is_empty() {
            return None;
        }
        Some(ContactManifold {
            body_a: id_a,
            body_b: id_b,
            points,
        })
    }

    pub fn collide(
        shape_a: &ColliderShape,
        transform_a: &Transform,
        shape_b: &ColliderShape,
        transform_b: &Transform,
    ) -> Vec<ContactPoint> {
        use ColliderShape::*;

        match (shape_a, shape_b) {
            (Sphere { radius: ra }, Sphere { radius: rb }) => {
                sphere_sphere(transform_a.position, *ra, transform_b.position, *rb)
                    .into_iter()
                    .collect()
            }
            (Box { half_extents }, Sphere { radius }) => {
                box_sphere(*half_extents, transform_a, transform_b.position, *radius)
                    .into_iter()
                    .collect()
            }
            (Sphere { radius }, Box { half_extents }) => {
                box_sphere(*half_extents, transform_b, transform_a.position, *radius)
                    .map(ContactPoint::flipped)
                    .into_iter()
                    .collect()
            }
            (Box { half_extents: ha }, Box { half_extents: hb }) => {
                box_box(*ha, transform_a, *hb, transform_b)
            }
            (Plane, Sphere { radius }) => {
                plane_sphere(transform_a, transform_b.position, *radius)
                    .into_iter()
                    .collect()
            }
            (Sphere { radius }, Plane) => {
                plane_sphere(transform_b, transform_a.position, *radius)
                    .map(ContactPoint::flipped)
                    .into_iter()
                    .collect()
            }
            (Plane, Box { half_extents }) => plane_box(transform_a, *half_extents, transform_b),
            (Box { half_extents }, Plane) => plane_box(transform_b, *half_extents, transform_a)
                .into_iter()
                .map(ContactPoint::flipped)
                .collect(),
            (Plane, Plane) => Vec::new(),
        }
    }
}

fn plane_normal(plane: &Transform) -> Vec3 {
    plane.rotation * Vec3::Y
}

fn sphere_sphere(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<ContactPoint> {
    let delta = center_b - center_a;
    let distance_sq = delta.length_squared();
    let radius_sum = radius_a + radius_b;
    if distance_sq >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    let normal = if distance > 1e-6 { delta / distance } else { Vec3::Y };
    let depth = radius_sum - distance;
    Some(ContactPoint {
        point: center_a + normal * (radius_a - 0.5 * depth),
        normal,
        depth,
    })
}

/// Normal points from the box toward the sphere.
fn box_sphere(half_extents: Vec3, box_tf: &Transform, center: Vec3, radius: f32) -> Option<ContactPoint> {
    let local = box_tf.rotation.conjugate() * (center - box_tf.position);
    let clamped = local.clamp(-half_extents, half_extents);

    if local != clamped {
        let closest = box_tf.position + box_tf.rotation * clamped;
        let delta = center - closest;
        let distance_sq = delta.length_squared();
        if distance_sq >= radius * radius {
            return None;
        }
        let distance = distance_sq.sqrt();
        let normal = if distance > 1e-6 {
            delta / distance
        } else {
            (center - box_tf.position).normalize_or(Vec3::Y)
        };
        return Some(ContactPoint {
            point: closest,
            normal,
            depth: radius - distance,
        });
    }

    // Center inside the box: push out through the nearest face.
    let slack = half_extents - local.abs();
    let axis = if slack.x <= slack.y && slack.x <= slack.z {
        0
    } else if slack.y <= slack.z {
        1
    } else {
        2
    };
    let sign = if local[axis] < 0.0 { -1.0 } else { 1.0 };
    let mut local_normal = Vec3::ZERO;
    local_normal[axis] = sign;
    let mut face_point = local;
    face_point[axis] = sign * half_extents[axis];

    Some(ContactPoint {
        point: box_tf.position + box_tf.rotation * face_point,
        normal: box_tf.rotation * local_normal,
        depth: radius + slack[axis],
    })
}

/// Normal points from the plane toward the sphere.
fn plane_sphere(plane: &Transform, center: Vec3, radius: f32) -> Option<ContactPoint> {
    let normal = plane_normal(plane);
    let distance = (center - plane.position).dot(normal);
    if distance >= radius {
        return None;
    }
    Some(ContactPoint {
        point: center - normal * radius,
        normal,
        depth: radius - distance,
    })
}

/// One point per box corner below the plane; normals point toward the box.
fn plane_box(plane: &Transform, half_extents: Vec3, box_tf: &Transform) -> Vec<ContactPoint> {
    let normal = plane_normal(plane);
    box_vertices(half_extents, box_tf.position, box_tf.rotation)
        .into_iter()
        .filter_map(|corner| {
            let distance = (corner - plane.position).dot(normal);
            (distance < 0.0).then_some(ContactPoint {
                point: corner,
                normal,
                depth: -distance,
            })
        })
        .collect()
}

/// Half-length of a box's shadow on `axis`.
fn projected_radius(half_extents: Vec3, basis: &Mat3, axis: Vec3) -> f32 {
    half_extents.x * basis.x_axis.dot(axis).abs()
        + half_extents.y * basis.y_axis.dot(axis).abs()
        + half_extents.z * basis.z_axis.dot(axis).abs()
}

fn contains_point(half_extents: Vec3, position: Vec3, rotation: Quat, point: Vec3) -> bool {
    let local = rotation.conjugate() * (point - position);
    local
        .abs()
        .cmple(half_extents + Vec3::splat(CONTAINMENT_TOLERANCE))
        .all()
}

fn box_support(half_extents: Vec3, position: Vec3, rotation: Quat, direction: Vec3) -> Vec3 {
    let local_dir = rotation.conjugate() * direction;
    let local = Vec3::new(
        half_extents.x.copysign(local_dir.x),
        half_extents.y.copysign(local_dir.y),
        half_extents.z.copysign(local_dir.z),
    );
    position + rotation * local
}

/// Separating axis test over the 15 candidate axes. Face axes build the
/// manifold by clipping the incident face against the reference face; edge
/// axes fall back to corner containment. Normals point from box A to box B.
fn box_box(half_a: Vec3, tf_a: &Transform, half_b: Vec3, tf_b: &Transform) -> Vec<ContactPoint> {
    let basis_a = Mat3::from_quat(tf_a.rotation);
    let basis_b = Mat3::from_quat(tf_b.rotation);
    let offset = tf_b.position - tf_a.position;

    let face_axes = [
        basis_a.x_axis,
        basis_a.y_axis,
        basis_a.z_axis,
        basis_b.x_axis,
        basis_b.y_axis,
        basis_b.z_axis,
    ];

    let mut best_overlap = f32::MAX;
    let mut best_axis = Vec3::Y;
    let mut best_face = None;

    let mut consider = |axis: Vec3, face: Option<usize>| -> bool {
        let radius_a = projected_radius(half_a, &basis_a, axis);
        let radius_b = projected_radius(half_b, &basis_b, axis);
        let distance = offset.dot(axis);
        let overlap = radius_a + radius_b - distance.abs();
        if overlap < 0.0 {
            return false;
        }
        // Edge axes only win by a clear margin so resting faces stay stable.
        let candidate = if face.is_none() { overlap * 1.05 + 1e-3 } else { overlap };
        if candidate < best_overlap {
            best_overlap = overlap;
            best_axis = if distance < 0.0 { -axis } else { axis };
            best_face = face;
        }
        true
    };

    for (index, axis) in face_axes.iter().enumerate() {
        if !consider(*axis, Some(index)) {
            return Vec::new();
        }
    }
    for edge_a in &face_axes[..3] {
        for edge_b in &face_axes[3..] {
            let axis = edge_a.cross(*edge_b);
            if axis.length_squared() < 1e-6 {
                continue;
            }
            if !consider(axis.normalize(), None) {
                return Vec::new();
            }
        }
    }

    let normal = best_axis;
    let mut points = match best_face {
        Some(face) if face < 3 => {
            let reference = BoxFace::new(half_a, tf_a.position, &basis_a, face, normal);
            reference.clip_incident(half_b, tf_b.position, &basis_b, normal)
        }
        Some(face) => {
            let reference = BoxFace::new(half_b, tf_b.position, &basis_b, face - 3, -normal);
            reference.clip_incident(half_a, tf_a.position, &basis_a, normal)
        }
        None => Vec::new(),
    };
    if points.is_empty() {
        points = corner_contacts(half_a, tf_a, &basis_a, half_b, tf_b, &basis_b, normal, best_overlap);
    }

    if points.len() > MAX_MANIFOLD_POINTS {
        points.sort_unstable_by(|a, b| b.depth.total_cmp(&a.depth));
        points.truncate(MAX_MANIFOLD_POINTS);
    }
    points
}

/// Face of a box chosen as the reference for clipping.
struct BoxFace {
    center: Vec3,
    /// Outward normal, pointing at the other box.
    outward: Vec3,
    tangents: [Vec3; 2],
    half_tangents: [f32; 2],
}

impl BoxFace {
    fn new(half_extents: Vec3, position: Vec3, basis: &Mat3, axis: usize, outward: Vec3) -> Self {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        Self {
            center: position + outward * half_extents[axis],
            outward,
            tangents: [basis.col(u), basis.col(v)],
            half_tangents: [half_extents[u], half_extents[v]],
        }
    }

    /// The face of the other box most opposed to this one, as a closed quad.
    fn incident_polygon(half_extents: Vec3, position: Vec3, basis: &Mat3, toward: Vec3) -> [Vec3; 4] {
        let axis = (0..3)
            .max_by(|&i, &j| {
                basis.col(i).dot(toward).abs().total_cmp(&basis.col(j).dot(toward).abs())
            })
            .unwrap_or(1);
        let facing = basis.col(axis) * -basis.col(axis).dot(toward).signum();
        let center = position + facing * half_extents[axis];
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        let du = basis.col(u) * half_extents[u];
        let dv = basis.col(v) * half_extents[v];
        [center + du + dv, center - du + dv, center - du - dv, center + du - dv]
    }

    /// Clips the other box's incident face to this face's sides and keeps the
    /// points lying below it. `normal` is the manifold normal, A to B.
    fn clip_incident(
        &self,
        half_extents: Vec3,
        position: Vec3,
        basis: &Mat3,
        normal: Vec3,
    ) -> Vec<ContactPoint> {
        let incident = Self::incident_polygon(half_extents, position, basis, self.outward);
        let sides = rectangle_planes(
            self.center,
            self.tangents[0],
            self.tangents[1],
            self.half_tangents[0],
            self.half_tangents[1],
        );

        clip_polygon(&incident, &sides)
            .into_iter()
            .filter_map(|point| {
                let separation = (point - self.center).dot(self.outward);
                (separation <= 0.0).then_some(ContactPoint {
                    point,
                    normal,
                    depth: -separation,
                })
            })
            .collect()
    }
}

/// Corners of either box inside the other, or a single midpoint between the
/// support points when none are.
#[allow(clippy::too_many_arguments)]
fn corner_contacts(
    half_a: Vec3,
    tf_a: &Transform,
    basis_a: &Mat3,
    half_b: Vec3,
    tf_b: &Transform,
    basis_b: &Mat3,
    normal: Vec3,
    overlap: f32,
) -> Vec<ContactPoint> {
    let reach_a = tf_a.position.dot(normal) + projected_radius(half_a, basis_a, normal);
    let reach_b = tf_b.position.dot(normal) - projected_radius(half_b, basis_b, normal);

    let mut points: Vec<ContactPoint> = Vec::new();
    for corner in box_vertices(half_b, tf_b.position, tf_b.rotation) {
        if contains_point(half_a, tf_a.position, tf_a.rotation, corner) {
            points.push(ContactPoint {
                point: corner,
                normal,
                depth: (reach_a - corner.dot(normal)).clamp(0.0, overlap),
            });
        }
    }
    for corner in box_vertices(half_a, tf_a.position, tf_a.rotation) {
        if contains_point(half_b, tf_b.position, tf_b.rotation, corner) {
            points.push(ContactPoint {
                point: corner,
                normal,
                depth: (corner.dot(normal) - reach_b).clamp(0.0, overlap),
            });
        }
    }

    if points.is_empty() {
        let on_a = box_support(half_a, tf_a.position, tf_a.rotation, normal);
        let on_b = box_support(half_b, tf_b.position, tf_b.rotation, -normal);
        points.push(ContactPoint {
            point: 0.5 * (on_a + on_b),
            normal,
            depth: overlap,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn at(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_position(Vec3::new(x, y, z))
    }

    #[test]
    fn sphere_on_plane_reports_penetration() {
        let points = NarrowPhase::collide(
            &ColliderShape::Plane,
            &Transform::default(),
            &ColliderShape::sphere(0.6),
            &at(0.0, 0.5, 0.0),
        );
        assert_eq!(points.len(), 1);
        assert_abs_diff_eq!(points[0].depth, 0.1, epsilon = 1e-5);
        assert_eq!(points[0].normal, Vec3::Y);
        assert_abs_diff_eq!(points[0].point.y, -0.1, epsilon = 1e-5);
    }

    #[test]
    fn sphere_above_plane_has_no_contact() {
        let points = NarrowPhase::collide(
            &ColliderShape::sphere(0.6),
            &at(0.0, 0.61, 0.0),
            &ColliderShape::Plane,
            &Transform::default(),
        );
        assert!(points.is_empty());
    }

    #[test]
    fn swapped_order_flips_normal() {
        let points = NarrowPhase::collide(
            &ColliderShape::sphere(0.6),
            &at(0.0, 0.5, 0.0),
            &ColliderShape::Plane,
            &Transform::default(),
        );
        assert_eq!(points[0].normal, -Vec3::Y);
    }

    #[test]
    fn resting_brick_touches_plane_with_four_corners() {
        let points = NarrowPhase::collide(
            &ColliderShape::Plane,
            &Transform::default(),
            &ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25)),
            &at(0.0, 0.49, 0.0),
        );
        assert_eq!(points.len(), 4);
        for point in points {
            assert_abs_diff_eq!(point.depth, 0.01, epsilon = 1e-5);
        }
    }

    #[test]
    fn overlapping_spheres_push_apart_along_centers() {
        let points = NarrowPhase::collide(
            &ColliderShape::sphere(1.0),
            &at(0.0, 0.0, 0.0),
            &ColliderShape::sphere(1.0),
            &at(1.5, 0.0, 0.0),
        );
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].normal, Vec3::X);
        assert_abs_diff_eq!(points[0].depth, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn sphere_touching_box_face() {
        let points = NarrowPhase::collide(
            &ColliderShape::sphere(0.6),
            &at(0.0, 1.0, 0.0),
            &ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25)),
            &at(0.0, 0.0, 0.0),
        );
        assert_eq!(points.len(), 1);
        assert_abs_diff_eq!(points[0].normal.y, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(points[0].depth, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn sphere_center_inside_box_exits_through_nearest_face() {
        let points = NarrowPhase::collide(
            &ColliderShape::cuboid(Vec3::splat(1.0)),
            &at(0.0, 0.0, 0.0),
            &ColliderShape::sphere(0.5),
            &at(0.0, 0.0, 0.9),
        );
        assert_eq!(points[0].normal, Vec3::Z);
        assert_abs_diff_eq!(points[0].depth, 0.6, epsilon = 1e-5);
    }

    #[test]
    fn stacked_bricks_find_face_normal() {
        let brick = ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25));
        let points = NarrowPhase::collide(&brick, &at(0.0, 0.0, 0.0), &brick, &at(0.2, 0.98, 0.0));
        assert!(!points.is_empty());
        for point in &points {
            assert_abs_diff_eq!(point.normal.y, 1.0, epsilon = 1e-5);
            assert!(point.depth <= 0.02 + 1e-5);
        }
    }

    #[test]
    fn crossed_bricks_touch_over_their_shared_square() {
        let brick = ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25));
        let crossed = Transform::from_position_rotation(
            Vec3::new(0.0, 0.99, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );

        let points = NarrowPhase::collide(&brick, &Transform::default(), &brick, &crossed);

        assert_eq!(points.len(), 4);
        for point in &points {
            assert_abs_diff_eq!(point.normal.y, 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(point.depth, 0.01, epsilon = 1e-4);
            assert_abs_diff_eq!(point.point.x.abs(), 0.25, epsilon = 1e-4);
            assert_abs_diff_eq!(point.point.z.abs(), 0.25, epsilon = 1e-4);
        }
    }

    #[test]
    fn reference_face_on_second_box_keeps_normal_direction() {
        let cube = ColliderShape::cuboid(Vec3::splat(0.5));
        let slab = ColliderShape::cuboid(Vec3::new(2.0, 0.5, 2.0));
        let tilted = Transform::from_position_rotation(
            Vec3::new(0.0, 0.98, 0.0),
            Quat::from_rotation_z(0.05),
        );

        // the slab's top face is the shallowest axis; only the low edge dips in
        let points = NarrowPhase::collide(&cube, &tilted, &slab, &Transform::default());

        assert_eq!(points.len(), 2);
        for point in &points {
            assert_abs_diff_eq!(point.normal.y, -1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(point.depth, 0.0444, epsilon = 1e-3);
        }
    }

    #[test]
    fn separated_boxes_do_not_collide() {
        let cube = ColliderShape::cuboid(Vec3::splat(0.5));
        let tilted = Transform::from_position_rotation(
            Vec3::new(1.3, 0.0, 0.0),
            Quat::from_rotation_y(0.3),
        );
        assert!(NarrowPhase::collide(&cube, &Transform::default(), &cube, &tilted).is_empty());
    }
}
