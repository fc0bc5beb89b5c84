/// Fixed timestep accumulator for hosts driving the world from a
/// variable-rate render loop.
///
/// The physics step wants a constant `dt` (1/60 s is the usual choice);
/// frames do not arrive that evenly. The accumulator banks frame time and
/// tells the host how many whole fixed steps to run this frame.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            // Cap to prevent the spiral of death when a frame hitches.
            max_steps_per_frame: 10,
        }
    }

    pub fn with_max_steps(mut self, max_steps_per_frame: u32) -> Self {
        self.max_steps_per_frame = max_steps_per_frame.max(1);
        self
    }

    /// Bank `frame_dt` seconds and return how many fixed steps to run.
    /// Time beyond the step cap is dropped, not carried.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let cap = self.dt * self.max_steps_per_frame as f32;
        if self.accumulator > cap {
            self.accumulator = cap;
        }
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation fraction (0..1) between the last step and the next,
    /// for hosts that smooth rendering between ticks.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any banked time, e.g. after a pause or scene change.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
