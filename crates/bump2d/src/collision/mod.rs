pub mod broad_phase;
pub mod narrow_phase;
pub mod solver;
