use crate::api::types::BodyHandle;
use crate::core::body::Body;

/// Margin added to every bounding box so pairs are found slightly before
/// shapes actually touch, absorbing one step's worth of motion.
pub const AABB_MARGIN: f32 = 0.05;

/// Find candidate pairs whose inflated bounding boxes overlap.
///
/// Contract: unordered unique pairs, no self-pairs, emitted in ascending
/// `(a, b)` handle order with `a < b` so downstream processing is stable
/// across runs. Pairs where neither body is dynamic are culled — the solver
/// could not move either one. O(n^2) sweep; a spatial grid can replace the
/// body of this function without changing the contract.
pub fn candidate_pairs(slots: &[Option<Body>]) -> Vec<(BodyHandle, BodyHandle)> {
    let boxes: Vec<_> = slots
        .iter()
        .map(|slot| {
            slot.as_ref()
                .map(|b| b.shape.aabb(b.position, b.rotation).inflate(AABB_MARGIN))
        })
        .collect();

    let mut pairs = Vec::new();
    for i in 0..slots.len() {
        let (Some(body_a), Some(box_a)) = (&slots[i], &boxes[i]) else {
            continue;
        };
        for j in (i + 1)..slots.len() {
            let (Some(body_b), Some(box_b)) = (&slots[j], &boxes[j]) else {
                continue;
            };
            if !body_a.is_dynamic() && !body_b.is_dynamic() {
                continue;
            }
            if box_a.overlaps(box_b) {
                pairs.push((BodyHandle(i as u32), BodyHandle(j as u32)));
            }
        }
    }
    pairs
}
