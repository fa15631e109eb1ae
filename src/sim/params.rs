// Physical constants of the simulation

use serde::{Deserialize, Serialize};

pub const DEFAULT_DENSITY: f32 = 0.6;
pub const DEFAULT_DX: f32 = 1.0;
pub const DEFAULT_DT: f32 = 0.016;
pub const DEFAULT_RELAX_ITERATIONS: usize = 1;

/// Constants shared by every phase of a tick
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    /// The fluid density
    pub density: f32,

    /// The cell spacing
    pub dx: f32,

    /// The timestep per tick
    pub dt: f32,

    /// Red-black sweeps of the pressure solver per tick
    pub relax_iterations: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            density: DEFAULT_DENSITY,
            dx: DEFAULT_DX,
            dt: DEFAULT_DT,
            relax_iterations: DEFAULT_RELAX_ITERATIONS,
        }
    }
}
