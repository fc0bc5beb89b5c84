use bump2d::{
    shape_outline, BodyDesc, BodyHandle, DebugDraw, DebugVertex, DrawColor, FixedTimestep,
    Material, PhysicsError, Shape, World,
};
use glam::Vec2;

/// Pixel to metres ratio. The physics core uses metres as its unit and its
/// solver constants are tuned for objects around 1x1 metre, so the ratio is
/// chosen to make the most common sprite size map to about one metre.
pub const PTM_RATIO: f32 = 32.0;

const FIXED_DT: f32 = 1.0 / 60.0;

/// The demo "layer": a physics world, a ground body along the bottom of the
/// screen, and tap-to-spawn helpers. Positions cross this boundary in
/// pixels; everything inside the world is metres.
pub struct HelloWorldScene {
    world: World,
    timestep: FixedTimestep,
    spawned: Vec<BodyHandle>,
    debug: DebugLineBuffer,
    pub debug_enabled: bool,
}

impl HelloWorldScene {
    /// Build the scene for a screen of the given pixel size: gravity
    /// pointing down at 10 m/s² and a static ground box whose top edge sits
    /// on the bottom of the screen.
    pub fn new(screen_width_px: f32, screen_height_px: f32) -> Result<Self, PhysicsError> {
        let mut world = World::new(Vec2::new(0.0, -10.0));

        let half_width = 0.5 * screen_width_px / PTM_RATIO;
        world.create_body(
            &BodyDesc::fixed(Shape::box_polygon(half_width, 0.5))
                .with_position(Vec2::new(half_width, -0.5)),
        )?;

        log::info!(
            "HelloWorldScene: {}x{} px world with ground spanning {:.1} m",
            screen_width_px,
            screen_height_px,
            half_width * 2.0
        );

        Ok(Self {
            world,
            timestep: FixedTimestep::new(FIXED_DT),
            spawned: Vec::new(),
            debug: DebugLineBuffer::new(),
            debug_enabled: false,
        })
    }

    /// Spawn a dynamic ball at a screen position (the "tap" action).
    pub fn spawn_ball_at_pixel(&mut self, x_px: f32, y_px: f32) -> Result<BodyHandle, PhysicsError> {
        let handle = self.world.create_body(
            &BodyDesc::dynamic(Shape::Circle { radius: 0.5 })
                .with_position(Vec2::new(x_px, y_px) / PTM_RATIO),
        )?;
        self.spawned.push(handle);
        log::info!("spawned ball {:?} at ({x_px}, {y_px}) px", handle);
        Ok(handle)
    }

    /// Spawn a dynamic one-metre box at a screen position.
    pub fn spawn_box_at_pixel(&mut self, x_px: f32, y_px: f32) -> Result<BodyHandle, PhysicsError> {
        let handle = self.world.create_body(
            &BodyDesc::dynamic(Shape::box_polygon(0.5, 0.5))
                .with_position(Vec2::new(x_px, y_px) / PTM_RATIO)
                .with_material(Material {
                    restitution: 0.1,
                    ..Material::default()
                }),
        )?;
        self.spawned.push(handle);
        log::info!("spawned box {:?} at ({x_px}, {y_px}) px", handle);
        Ok(handle)
    }

    /// Advance the scene by one render frame, running however many fixed
    /// physics steps the accumulator releases. Returns the step count.
    pub fn tick(&mut self, frame_dt: f32) -> Result<u32, PhysicsError> {
        let steps = self.timestep.advance(frame_dt);
        for _ in 0..steps {
            if self.debug_enabled {
                self.debug.clear();
                self.world.step_with_draw(FIXED_DT, &mut self.debug)?;
            } else {
                self.world.step(FIXED_DT)?;
            }
        }
        Ok(steps)
    }

    /// Pixel-space placement for every spawned body, for sprite rendering:
    /// (x px, y px, rotation radians).
    pub fn sprite_placements(&self) -> Vec<(f32, f32, f32)> {
        self.spawned
            .iter()
            .filter_map(|handle| self.world.transform(*handle).ok())
            .map(|(pos, rot)| (pos.x * PTM_RATIO, pos.y * PTM_RATIO, rot))
            .collect()
    }

    /// Debug line vertices from the most recent step, in pixels.
    /// Empty unless `debug_enabled` is set.
    pub fn debug_vertices(&self) -> &[DebugVertex] {
        self.debug.vertices()
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

/// DebugDraw implementation that batches outlines into a pixel-space
/// line-list buffer (two vertices per segment), ready for a host renderer.
pub struct DebugLineBuffer {
    vertices: Vec<DebugVertex>,
}

impl DebugLineBuffer {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(512),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[DebugVertex] {
        &self.vertices
    }

    fn push_segment(&mut self, from: Vec2, to: Vec2, color: DrawColor) {
        self.vertices.push(DebugVertex::new(from * PTM_RATIO, color));
        self.vertices.push(DebugVertex::new(to * PTM_RATIO, color));
    }
}

impl Default for DebugLineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugDraw for DebugLineBuffer {
    fn draw_body(&mut self, shape: &Shape, position: Vec2, rotation: f32, color: DrawColor) {
        let outline = shape_outline(shape, position, rotation);
        for pair in outline.windows(2) {
            self.push_segment(Vec2::from(pair[0]), Vec2::from(pair[1]), color);
        }
    }

    fn draw_contact(&mut self, point: Vec2, normal: Vec2, color: DrawColor) {
        // Short whisker along the separation normal.
        self.push_segment(point, point + normal * 0.25, color);
    }
}
