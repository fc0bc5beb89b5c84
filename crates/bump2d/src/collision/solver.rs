use glam::Vec2;

use crate::collision::narrow_phase::Contact;
use crate::core::body::Body;

/// Velocity solver passes per step.
pub const VELOCITY_ITERATIONS: usize = 8;
/// Positional correction passes per step.
pub const POSITION_ITERATIONS: usize = 2;
/// Fraction of remaining penetration corrected per position pass.
pub const CORRECTION_PERCENT: f32 = 0.2;
/// Penetration below this is tolerated, not corrected. Fully correcting
/// tiny overlaps every step makes resting contacts jitter.
pub const SLOP: f32 = 0.005;

const EPS: f32 = 1e-9;

/// Sequential impulse pass: run the fixed number of velocity iterations
/// over all contacts, in the (stable) order the narrow phase produced them.
pub fn solve_velocities(slots: &mut [Option<Body>], contacts: &[Contact]) {
    for _ in 0..VELOCITY_ITERATIONS {
        for contact in contacts {
            apply_contact_impulse(slots, contact);
        }
    }
}

fn apply_contact_impulse(slots: &mut [Option<Body>], contact: &Contact) {
    let Some((body_a, body_b)) = pair_mut(slots, contact.a.index(), contact.b.index()) else {
        return;
    };

    let normal = contact.normal;
    let rel_vel = body_b.velocity_at(contact.point) - body_a.velocity_at(contact.point);
    let vn = rel_vel.dot(normal);
    // Already separating: applying an impulse here would pull the bodies
    // together and add energy.
    if vn > 0.0 {
        return;
    }

    let ra = contact.point - body_a.position;
    let rb = contact.point - body_b.position;
    let ra_n = ra.perp_dot(normal);
    let rb_n = rb.perp_dot(normal);
    let k_normal = body_a.inv_mass
        + body_b.inv_mass
        + ra_n * ra_n * body_a.inv_inertia
        + rb_n * rb_n * body_b.inv_inertia;
    if k_normal < EPS {
        // Two infinite-mass bodies; nothing to move.
        return;
    }

    let restitution = body_a.restitution.max(body_b.restitution);
    let j = (-(1.0 + restitution) * vn / k_normal).max(0.0);
    let impulse = j * normal;
    body_a.apply_impulse_at(-impulse, contact.point);
    body_b.apply_impulse_at(impulse, contact.point);

    // Coulomb friction along the tangent, clamped by the normal impulse.
    let rel_vel = body_b.velocity_at(contact.point) - body_a.velocity_at(contact.point);
    let tangent_vel = rel_vel - rel_vel.dot(normal) * normal;
    let vt = tangent_vel.length();
    if vt < EPS {
        return;
    }
    let tangent = tangent_vel / vt;
    let ra_t = ra.perp_dot(tangent);
    let rb_t = rb.perp_dot(tangent);
    let k_tangent = body_a.inv_mass
        + body_b.inv_mass
        + ra_t * ra_t * body_a.inv_inertia
        + rb_t * rb_t * body_b.inv_inertia;
    if k_tangent < EPS {
        return;
    }
    let friction = (body_a.friction * body_b.friction).sqrt();
    let jt = (vt / k_tangent).min(friction * j);
    let friction_impulse = -jt * tangent;
    body_a.apply_impulse_at(-friction_impulse, contact.point);
    body_b.apply_impulse_at(friction_impulse, contact.point);
}

/// Positional correction: bleed off a fraction of the penetration beyond
/// the slop each pass, split by inverse mass. Remaining penetration is
/// tracked in a solver-local table; the manifolds themselves are never
/// mutated, so `World::contacts` keeps reporting the measured overlap.
pub fn solve_positions(slots: &mut [Option<Body>], contacts: &[Contact]) {
    let mut remaining: Vec<f32> = contacts.iter().map(|c| c.penetration).collect();
    for _ in 0..POSITION_ITERATIONS {
        for (contact, penetration) in contacts.iter().zip(remaining.iter_mut()) {
            let Some((body_a, body_b)) = pair_mut(slots, contact.a.index(), contact.b.index())
            else {
                continue;
            };
            let inv_mass_sum = body_a.inv_mass + body_b.inv_mass;
            if inv_mass_sum < EPS {
                continue;
            }
            let correction = (*penetration - SLOP).max(0.0) * CORRECTION_PERCENT / inv_mass_sum;
            if correction <= 0.0 {
                continue;
            }
            let offset = contact.normal * correction;
            body_a.position -= offset * body_a.inv_mass;
            body_b.position += offset * body_b.inv_mass;
            *penetration -= correction * inv_mass_sum;
        }
    }
}

/// Borrow two distinct body slots mutably. Contacts always carry the lower
/// index first (broad-phase order), but both orders are handled.
fn pair_mut(
    slots: &mut [Option<Body>],
    idx_a: usize,
    idx_b: usize,
) -> Option<(&mut Body, &mut Body)> {
    if idx_a == idx_b {
        return None;
    }
    if idx_a < idx_b {
        let (left, right) = slots.split_at_mut(idx_b);
        Some((left[idx_a].as_mut()?, right[0].as_mut()?))
    } else {
        let (left, right) = slots.split_at_mut(idx_a);
        let (a, b) = (right[0].as_mut()?, left[idx_b].as_mut()?);
        Some((a, b))
    }
}
