use glam::Vec2;

use crate::api::types::BodyHandle;
use crate::core::body::Body;
use crate::core::shape::Shape;

const EPS: f32 = 1e-6;

/// A single-point contact manifold between two bodies.
///
/// Contacts are transient: recomputed every step from scratch and valid only
/// until the next step begins. They reference bodies by handle, never by
/// ownership.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// World-space contact point.
    pub point: Vec2,
    /// Unit separation normal, pointing from `a` to `b`.
    pub normal: Vec2,
    /// Overlap depth along the normal. Always > 0: exact tangency is not
    /// a contact.
    pub penetration: f32,
}

/// Exact overlap test for one candidate pair. Returns zero or one contact.
pub fn collide(ha: BodyHandle, a: &Body, hb: BodyHandle, b: &Body) -> Option<Contact> {
    let manifold = match (&a.shape, &b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.position, *ra, b.position, *rb)
        }
        (Shape::Circle { radius }, Shape::Polygon { .. }) => {
            // circle_polygon reports the normal polygon-to-circle; a is the
            // circle here, so flip to keep the a-to-b convention.
            circle_polygon(a.position, *radius, &b.shape.world_vertices(b.position, b.rotation))
                .map(|m| m.flipped())
        }
        (Shape::Polygon { .. }, Shape::Circle { radius }) => {
            circle_polygon(b.position, *radius, &a.shape.world_vertices(a.position, a.rotation))
        }
        (Shape::Polygon { .. }, Shape::Polygon { .. }) => polygon_polygon(
            &a.shape.world_vertices(a.position, a.rotation),
            &b.shape.world_vertices(b.position, b.rotation),
        ),
    }?;
    Some(Contact {
        a: ha,
        b: hb,
        point: manifold.point,
        normal: manifold.normal,
        penetration: manifold.penetration,
    })
}

/// Geometry-only manifold, before handles are attached.
#[derive(Debug, Clone, Copy)]
struct RawManifold {
    point: Vec2,
    normal: Vec2,
    penetration: f32,
}

impl RawManifold {
    fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Circles overlap iff the center distance is strictly less than the radius
/// sum; the contact point is the midpoint of the overlap segment.
fn circle_circle(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> Option<RawManifold> {
    let delta = pb - pa;
    let dist = delta.length();
    let radius_sum = ra + rb;
    if dist >= radius_sum {
        return None;
    }
    // Concentric centers have no defined direction; pick +X so the result
    // stays deterministic.
    let normal = if dist > EPS { delta / dist } else { Vec2::X };
    let surface_a = pa + normal * ra;
    let surface_b = pb - normal * rb;
    Some(RawManifold {
        point: 0.5 * (surface_a + surface_b),
        normal,
        penetration: radius_sum - dist,
    })
}

/// Separating-axis test over the polygon's edge normals plus the
/// closest-feature axis. Normal points from the polygon toward the circle.
fn circle_polygon(center: Vec2, radius: f32, verts: &[Vec2]) -> Option<RawManifold> {
    let n = verts.len();
    let mut best_sep = f32::NEG_INFINITY;
    let mut best_edge = 0;
    for i in 0..n {
        let normal = edge_normal(verts, i);
        let sep = (center - verts[i]).dot(normal);
        if sep > best_sep {
            best_sep = sep;
            best_edge = i;
        }
    }
    if best_sep >= radius {
        return None;
    }

    let v1 = verts[best_edge];
    let v2 = verts[(best_edge + 1) % n];

    if best_sep < EPS {
        // Center inside (or on) the polygon: push out along the face of
        // least penetration.
        let normal = edge_normal(verts, best_edge);
        return Some(RawManifold {
            point: center - normal * best_sep,
            normal,
            penetration: radius - best_sep,
        });
    }

    // Center outside: the closest feature is a point on the best edge
    // segment (its interior, or one of its endpoints).
    let edge = v2 - v1;
    let t = ((center - v1).dot(edge) / edge.length_squared()).clamp(0.0, 1.0);
    let closest = v1 + t * edge;
    let to_center = center - closest;
    let dist = to_center.length();
    if dist >= radius {
        return None;
    }
    Some(RawManifold {
        point: closest,
        normal: to_center / dist,
        penetration: radius - dist,
    })
}

/// SAT over both polygons' edge normals. The minimum-penetration axis
/// defines the normal; the incident edge is clipped against the reference
/// edge's side planes and the contact point is the midpoint of the
/// surviving clipped points.
fn polygon_polygon(verts_a: &[Vec2], verts_b: &[Vec2]) -> Option<RawManifold> {
    let (sep_a, edge_a) = max_separation(verts_a, verts_b);
    if sep_a >= 0.0 {
        return None;
    }
    let (sep_b, edge_b) = max_separation(verts_b, verts_a);
    if sep_b >= 0.0 {
        return None;
    }

    // Reference polygon: the one penetrated least. Bias toward A so the
    // choice is stable when the separations tie.
    let (reference, incident, ref_edge, flip) = if sep_b > sep_a + 1e-4 {
        (verts_b, verts_a, edge_b, true)
    } else {
        (verts_a, verts_b, edge_a, false)
    };

    let ref_v1 = reference[ref_edge];
    let ref_v2 = reference[(ref_edge + 1) % reference.len()];
    let ref_normal = edge_normal(reference, ref_edge);

    // Incident edge: the one most anti-parallel to the reference normal.
    let mut incident_edge = 0;
    let mut min_dot = f32::INFINITY;
    for i in 0..incident.len() {
        let dot = edge_normal(incident, i).dot(ref_normal);
        if dot < min_dot {
            min_dot = dot;
            incident_edge = i;
        }
    }
    let mut points = vec![
        incident[incident_edge],
        incident[(incident_edge + 1) % incident.len()],
    ];

    // Clip to the side planes of the reference edge.
    let tangent = (ref_v2 - ref_v1).normalize_or_zero();
    points = clip_segment(&points, -tangent, -ref_v1.dot(tangent));
    if points.len() < 2 {
        return None;
    }
    points = clip_segment(&points, tangent, ref_v2.dot(tangent));
    if points.len() < 2 {
        return None;
    }

    // Keep only points behind the reference face.
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    let mut depth = 0.0f32;
    for p in &points {
        let sep = (*p - ref_v1).dot(ref_normal);
        if sep < 0.0 {
            sum += *p;
            count += 1;
            depth = depth.max(-sep);
        }
    }
    if count == 0 {
        return None;
    }

    let normal = if flip { -ref_normal } else { ref_normal };
    Some(RawManifold {
        point: sum / count as f32,
        normal,
        penetration: depth,
    })
}

/// Outward normal of edge `i` for a counter-clockwise polygon.
fn edge_normal(verts: &[Vec2], i: usize) -> Vec2 {
    let e = verts[(i + 1) % verts.len()] - verts[i];
    Vec2::new(e.y, -e.x).normalize_or_zero()
}

/// Largest separation of `other`'s vertices over all edge normals of
/// `verts`. Negative means overlap along every axis tested.
fn max_separation(verts: &[Vec2], other: &[Vec2]) -> (f32, usize) {
    let mut best = f32::NEG_INFINITY;
    let mut best_edge = 0;
    for i in 0..verts.len() {
        let normal = edge_normal(verts, i);
        let mut min_proj = f32::INFINITY;
        for v in other {
            min_proj = min_proj.min((*v - verts[i]).dot(normal));
        }
        if min_proj > best {
            best = min_proj;
            best_edge = i;
        }
    }
    (best, best_edge)
}

/// Keep the part of the segment on the negative side of the plane
/// `dot(normal, p) <= offset`, inserting the crossing point if it straddles.
fn clip_segment(points: &[Vec2], normal: Vec2, offset: f32) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(2);
    let d0 = normal.dot(points[0]) - offset;
    let d1 = normal.dot(points[1]) - offset;
    if d0 <= 0.0 {
        out.push(points[0]);
    }
    if d1 <= 0.0 {
        out.push(points[1]);
    }
    if d0 * d1 < 0.0 {
        let t = d0 / (d0 - d1);
        out.push(points[0] + t * (points[1] - points[0]));
    }
    out
}
