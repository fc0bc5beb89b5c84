use glam::Vec2;

use crate::api::error::PhysicsError;
use crate::api::types::{BodyHandle, DrawColor};
use crate::collision::narrow_phase::{self, Contact};
use crate::collision::{broad_phase, solver};
use crate::core::body::{Body, BodyDesc, BodyType};
use crate::debug::DebugDraw;

/// The simulation container: owns every body and drives the fixed-step
/// pipeline (broad phase → narrow phase → solve → integrate → callbacks).
///
/// Single-threaded by design: the world is exclusively owned and a step
/// runs to completion before returning, so callers never observe a partial
/// step. Bodies live in a slot table indexed by [`BodyHandle`]; destroyed
/// slots are never reused, which keeps iteration in creation order and
/// makes stale handles detectable.
pub struct World {
    gravity: Vec2,
    slots: Vec<Option<Body>>,
    /// Last step's manifolds. Recomputed from scratch at every step.
    contacts: Vec<Contact>,
    elapsed: f32,
}

impl World {
    /// Create an empty world with the given gravity vector
    /// (units per second squared, applied to dynamic bodies only).
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            slots: Vec::new(),
            contacts: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Validate the shape, derive mass properties, and add the body.
    /// Handles are assigned in creation order and stay stable for the life
    /// of the world.
    pub fn create_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle, PhysicsError> {
        desc.shape.validate()?;
        let handle = BodyHandle(self.slots.len() as u32);
        self.slots.push(Some(Body::from_desc(desc)));
        Ok(handle)
    }

    /// Remove a body. Fails with `UnknownHandle` if the handle was never
    /// issued or the body is already destroyed.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        let slot = self
            .slots
            .get_mut(handle.index())
            .ok_or(PhysicsError::UnknownHandle(handle))?;
        if slot.take().is_none() {
            return Err(PhysicsError::UnknownHandle(handle));
        }
        // Manifolds from the last step may still reference the body.
        self.contacts.retain(|c| c.a != handle && c.b != handle);
        log::debug!("destroyed body {:?}", handle);
        Ok(())
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// A fixed `dt` (1/60 s) is recommended; variable steps are accepted
    /// but accumulate integration drift — a documented limitation, not a
    /// defect. Fails with `InvalidStep` when `dt` is not strictly positive
    /// and finite.
    pub fn step(&mut self, dt: f32) -> Result<(), PhysicsError> {
        self.step_inner(dt, None)
    }

    /// Same as [`step`](Self::step), then invokes the debug-draw port once
    /// per body and once per active contact. The port is borrowed for this
    /// call only and must not mutate the world.
    pub fn step_with_draw(
        &mut self,
        dt: f32,
        draw: &mut dyn DebugDraw,
    ) -> Result<(), PhysicsError> {
        self.step_inner(dt, Some(draw))
    }

    fn step_inner(
        &mut self,
        dt: f32,
        draw: Option<&mut dyn DebugDraw>,
    ) -> Result<(), PhysicsError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidStep { dt });
        }
        self.contacts.clear();

        // Gravity first: semi-implicit Euler updates velocity before
        // position, so this step's gravity shapes this step's motion.
        for body in self.slots.iter_mut().flatten() {
            if body.is_dynamic() {
                body.linear_velocity += self.gravity * dt;
            }
        }

        let pairs = broad_phase::candidate_pairs(&self.slots);
        for (ha, hb) in pairs {
            let (Some(a), Some(b)) = (&self.slots[ha.index()], &self.slots[hb.index()]) else {
                continue;
            };
            if let Some(contact) = narrow_phase::collide(ha, a, hb, b) {
                self.contacts.push(contact);
            }
        }

        solver::solve_velocities(&mut self.slots, &self.contacts);

        // Integrate positions from the post-solve velocities. Static bodies
        // never move, whatever their (zeroed) velocity says.
        for body in self.slots.iter_mut().flatten() {
            if body.body_type == BodyType::Static {
                continue;
            }
            body.position += body.linear_velocity * dt;
            body.rotation += body.angular_velocity * dt;
        }

        solver::solve_positions(&mut self.slots, &self.contacts);

        self.elapsed += dt;
        log::trace!(
            "step dt={dt} bodies={} contacts={}",
            self.body_count(),
            self.contacts.len()
        );

        if let Some(draw) = draw {
            self.dispatch_draw(draw);
        }
        Ok(())
    }

    fn dispatch_draw(&self, draw: &mut dyn DebugDraw) {
        for body in self.slots.iter().flatten() {
            let color = match body.body_type {
                BodyType::Static => DrawColor::Green,
                BodyType::Kinematic => DrawColor::Blue,
                BodyType::Dynamic => DrawColor::White,
            };
            draw.draw_body(&body.shape, body.position, body.rotation, color);
        }
        for contact in &self.contacts {
            draw.draw_contact(contact.point, contact.normal, DrawColor::Red);
        }
    }

    /// Position and rotation of a body.
    pub fn transform(&self, handle: BodyHandle) -> Result<(Vec2, f32), PhysicsError> {
        let body = self.body(handle)?;
        Ok((body.position, body.rotation))
    }

    /// Linear and angular velocity of a body.
    pub fn velocity(&self, handle: BodyHandle) -> Result<(Vec2, f32), PhysicsError> {
        let body = self.body(handle)?;
        Ok((body.linear_velocity, body.angular_velocity))
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Manifolds produced by the most recent step, exactly as the narrow
    /// phase measured them on start-of-step positions. Read-only snapshot;
    /// cleared at the start of the next step.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Total simulated time across all steps.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        self.slots
            .get(handle.index())
            .and_then(|slot| slot.as_ref())
            .ok_or(PhysicsError::UnknownHandle(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::body::Material;
    use crate::core::shape::Shape;

    fn ball_desc(radius: f32, x: f32, y: f32) -> BodyDesc {
        BodyDesc::dynamic(Shape::Circle { radius }).with_position(Vec2::new(x, y))
    }

    #[test]
    fn create_and_destroy_body() {
        let mut world = World::new(Vec2::ZERO);
        let handle = world.create_body(&ball_desc(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(world.body_count(), 1);
        world.destroy_body(handle).unwrap();
        assert_eq!(world.body_count(), 0);
        // Second destroy is a stale handle.
        assert_eq!(
            world.destroy_body(handle),
            Err(PhysicsError::UnknownHandle(handle))
        );
    }

    #[test]
    fn queries_on_unknown_handles_fail() {
        let world = World::new(Vec2::ZERO);
        let bogus = BodyHandle(42);
        assert_eq!(world.transform(bogus), Err(PhysicsError::UnknownHandle(bogus)));
        assert_eq!(world.velocity(bogus), Err(PhysicsError::UnknownHandle(bogus)));
    }

    #[test]
    fn invalid_shape_is_rejected_at_creation() {
        let mut world = World::new(Vec2::ZERO);
        let err = world
            .create_body(&BodyDesc::dynamic(Shape::Circle { radius: -1.0 }))
            .unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidShape { .. }));
        // The world stays usable.
        assert!(world.create_body(&ball_desc(1.0, 0.0, 0.0)).is_ok());
    }

    #[test]
    fn non_positive_dt_is_rejected() {
        let mut world = World::new(Vec2::ZERO);
        assert!(matches!(
            world.step(0.0),
            Err(PhysicsError::InvalidStep { .. })
        ));
        assert!(matches!(
            world.step(-0.1),
            Err(PhysicsError::InvalidStep { .. })
        ));
        assert!(matches!(
            world.step(f32::NAN),
            Err(PhysicsError::InvalidStep { .. })
        ));
        assert!(world.step(1.0 / 60.0).is_ok());
    }

    #[test]
    fn gravity_only_moves_dynamic_bodies() {
        let mut world = World::new(Vec2::new(0.0, -10.0));
        let falling = world.create_body(&ball_desc(1.0, 0.0, 0.0)).unwrap();
        let anchored = world
            .create_body(&BodyDesc::fixed(Shape::box_polygon(1.0, 1.0)).with_position(Vec2::new(50.0, 0.0)))
            .unwrap();
        let cruising = world
            .create_body(
                &BodyDesc::kinematic(Shape::Circle { radius: 1.0 })
                    .with_position(Vec2::new(-50.0, 0.0))
                    .with_velocity(Vec2::new(1.0, 0.0)),
            )
            .unwrap();

        for _ in 0..30 {
            world.step(1.0 / 60.0).unwrap();
        }

        let (pos, _) = world.transform(falling).unwrap();
        assert!(pos.y < -0.5);

        let (pos, rot) = world.transform(anchored).unwrap();
        assert_eq!(pos, Vec2::new(50.0, 0.0));
        assert_eq!(rot, 0.0);

        // Kinematic: keeps its own velocity, ignores gravity.
        let (pos, _) = world.transform(cruising).unwrap();
        assert!((pos.x - (-50.0 + 0.5)).abs() < 1e-4);
        assert!(pos.y.abs() < 1e-6);
    }

    #[test]
    fn transform_queries_are_idempotent() {
        let mut world = World::new(Vec2::new(0.0, -10.0));
        let handle = world.create_body(&ball_desc(1.0, 0.0, 10.0)).unwrap();
        world.step(1.0 / 60.0).unwrap();
        let first = world.transform(handle).unwrap();
        let second = world.transform(handle).unwrap();
        assert_eq!(first, second);
        assert_eq!(world.velocity(handle).unwrap(), world.velocity(handle).unwrap());
    }

    #[test]
    fn contacts_are_observable_after_a_step() {
        let mut world = World::new(Vec2::ZERO);
        let a = world.create_body(&ball_desc(1.0, 0.0, 0.0)).unwrap();
        let b = world.create_body(&ball_desc(1.0, 1.5, 0.0)).unwrap();
        world.step(1.0 / 60.0).unwrap();
        assert_eq!(world.contacts().len(), 1);
        assert_eq!(world.contacts()[0].a, a);
        assert_eq!(world.contacts()[0].b, b);
    }

    #[test]
    fn elapsed_accumulates_dt() {
        let mut world = World::new(Vec2::ZERO);
        for _ in 0..60 {
            world.step(1.0 / 60.0).unwrap();
        }
        assert!((world.elapsed() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn debug_draw_visits_every_body_and_contact() {
        struct Counter {
            bodies: usize,
            contacts: usize,
        }
        impl DebugDraw for Counter {
            fn draw_body(&mut self, _: &Shape, _: Vec2, _: f32, _: DrawColor) {
                self.bodies += 1;
            }
            fn draw_contact(&mut self, _: Vec2, _: Vec2, _: DrawColor) {
                self.contacts += 1;
            }
        }

        let mut world = World::new(Vec2::ZERO);
        world.create_body(&ball_desc(1.0, 0.0, 0.0)).unwrap();
        world.create_body(&ball_desc(1.0, 1.5, 0.0)).unwrap();
        world
            .create_body(&BodyDesc::fixed(Shape::box_polygon(5.0, 0.5)).with_position(Vec2::new(0.0, -20.0)))
            .unwrap();

        let mut counter = Counter { bodies: 0, contacts: 0 };
        world.step_with_draw(1.0 / 60.0, &mut counter).unwrap();
        assert_eq!(counter.bodies, 3);
        assert_eq!(counter.contacts, 1);

        // Plain step still succeeds with no port supplied.
        world.step(1.0 / 60.0).unwrap();
        assert_eq!(counter.bodies, 3, "plain step must not dispatch");
    }

    #[test]
    fn restitution_controls_bounce() {
        let drop_with = |restitution: f32| -> f32 {
            let mut world = World::new(Vec2::new(0.0, -10.0));
            world
                .create_body(
                    &BodyDesc::fixed(Shape::box_polygon(10.0, 1.0)).with_position(Vec2::new(0.0, -1.0)),
                )
                .unwrap();
            let ball = world
                .create_body(
                    &ball_desc(0.5, 0.0, 2.0).with_material(Material {
                        restitution,
                        ..Material::default()
                    }),
                )
                .unwrap();
            let mut peak_after_bounce = f32::NEG_INFINITY;
            let mut bounced = false;
            for _ in 0..240 {
                world.step(1.0 / 60.0).unwrap();
                let (v, _) = world.velocity(ball).unwrap();
                if v.y > 0.1 {
                    bounced = true;
                }
                if bounced {
                    peak_after_bounce = peak_after_bounce.max(world.transform(ball).unwrap().0.y);
                }
            }
            peak_after_bounce
        };

        let bouncy = drop_with(0.8);
        let dead = drop_with(0.0);
        assert!(
            bouncy > dead + 0.2,
            "bouncy peak {bouncy} should exceed dead peak {dead}"
        );
    }
}
