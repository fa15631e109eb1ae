// Tick loop over the staggered grid

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, error};

use crate::sim::{
    actions::ScheduledAction, advection, numeric, params::SimParams, poisson, projection,
    state::SimulationState,
};

/// Maximum allowable velocity before stopping simulation
const MAX_VELOCITY: f32 = 1000.;

/// Owns the grid and steps it forward one tick at a time. Edits are
/// applied from the same owner between ticks, never during one.
pub struct FluidSim {
    /// Constants used by every phase
    pub params: SimParams,

    /// The number of ticks to run before the iterator ends
    pub ticks: usize,

    /// The grid itself
    state: SimulationState,

    /// Pending edits, ordered by tick
    actions: Vec<ScheduledAction>,

    /// Index of the first action not yet applied
    next_action: usize,

    /// Ticks completed so far
    tick: usize,

    /// Set once a tick produced non-finite or runaway velocities
    exploded: bool,

    rng: StdRng,
}

impl FluidSim {
    /// Create a new simulation
    ///
    /// Parameters
    /// - `state` - The initial grid
    /// - `params` - Density, spacing, timestep and sweep count
    /// - `ticks` - How many ticks the iterator yields
    /// - `actions` - Edits to replay between ticks
    /// - `seed` - Optional seed for randomizing edits
    pub fn new(
        state: SimulationState,
        params: SimParams,
        ticks: usize,
        mut actions: Vec<ScheduledAction>,
        seed: Option<u64>,
    ) -> Self {
        // stable, so same-tick actions keep their given order
        actions.sort_by_key(|a| a.tick);

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        FluidSim {
            params,
            ticks,
            state,
            actions,
            next_action: 0,
            tick: 0,
            exploded: false,
            rng,
        }
    }

    /// The current grid
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Ticks completed so far
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Apply every pending action scheduled at or before the current tick
    fn apply_due_actions(&mut self) {
        while let Some(scheduled) = self.actions.get(self.next_action) {
            if scheduled.tick > self.tick {
                break;
            }
            debug!("tick {}: applying {:?}", self.tick, scheduled.action);
            scheduled.action.apply(&mut self.state, &mut self.rng);
            self.next_action += 1;
        }
    }

    /// Run one tick: advect, relax the pressure, project
    pub fn step(&mut self) {
        self.apply_due_actions();

        advection::advect(&mut self.state, &self.params);
        poisson::relax_n(&mut self.state, &self.params);
        projection::project(&mut self.state, &self.params);

        self.tick += 1;
    }
}

impl Iterator for FluidSim {
    type Item = (SimulationState, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exploded || self.tick >= self.ticks {
            return None;
        }

        self.step();
        debug_assert!(self.state.walls_are_zero());

        if !self.state.is_finite() || self.state.max_speed() > MAX_VELOCITY {
            error!("Velocity exceeded maximum at tick {}; simulation exploded", self.tick);
            self.exploded = true;
            return None;
        }

        debug!(
            "tick {}: max divergence {:.4e}, kinetic energy {:.4e}",
            self.tick,
            numeric::max_divergence(&self.state),
            numeric::kinetic_energy(&self.state)
        );

        Some((self.state.clone(), self.tick))
    }
}
