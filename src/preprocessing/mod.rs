use std::{any, error::Error, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    preprocessing::serial_field::SerialState,
    sim::{actions::ScheduledAction, params::SimParams, state::SimulationState},
};

pub mod cli;
pub mod serial_field;

pub const DEFAULT_GRID_SIZE: usize = 8;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ImageStreamSettings {
    pub frames_dir: PathBuf,
    pub retain_frames: bool,
    pub display_video: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SummarySettings {
    pub report_every: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum InterfaceMode {
    ImageStream(ImageStreamSettings),
    Summary(SummarySettings),
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SimulationInput {
    pub mode: InterfaceMode,
    pub grid_size: usize,
    pub ticks: usize,
    pub params: SimParams,

    #[serde(default)]
    pub actions: Vec<ScheduledAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<SerialState>, // zero grid when absent

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationInput {
    /// Build the starting grid, either zero-filled or from `initial_state`
    pub fn get_state(&self) -> Result<SimulationState, Box<dyn Error>> {
        if self.grid_size == 0 {
            return Err("grid size must be at least 1".into());
        }

        match &self.initial_state {
            Some(stored) => stored.to_state(self.grid_size),
            None => Ok(SimulationState::new(self.grid_size)),
        }
    }

    /// Reject parameters that would divide by zero or never step, and edits
    /// carrying NaN or infinite values
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let p = &self.params;
        if !(p.density > 0.) || !(p.dx > 0.) || !(p.dt > 0.) {
            return Err(format!(
                "density, dx and dt must be positive (got {}, {}, {})",
                p.density, p.dx, p.dt
            )
            .into());
        }
        if p.relax_iterations == 0 {
            return Err("at least one relaxation sweep per tick is required".into());
        }
        if let Some(bad) = self.actions.iter().find(|a| !a.action.is_finite()) {
            return Err(format!(
                "action at tick {} carries a non-finite value: {:?}",
                bad.tick, bad.action
            )
            .into());
        }
        Ok(())
    }

    pub fn log(&self) {
        info!(
            "Simulation is shown below:\n\n\
        \t mode:        {}\n\
        \t grid:        {} x {}\n\
        \t ticks:       {} ({} s)\n\
        \t density:     {}\n\
        \t dx:          {}\n\
        \t dt:          {} s\n\
        \t relax/tick:  {}\n\
        \t actions:     {}\n\
        \t initial:     {}\n\n\
        ",
            any::type_name_of_val(&self.mode),
            self.grid_size,
            self.grid_size,
            self.ticks,
            self.ticks as f32 * self.params.dt,
            self.params.density,
            self.params.dx,
            self.params.dt,
            self.params.relax_iterations,
            self.actions.len(),
            if self.initial_state.is_some() {
                "stored"
            } else {
                "zero"
            },
        );

        if let Ok(mode_str) = serde_json::to_string_pretty(&self.mode) {
            info!("Mode parameters are:\n\n{}", mode_str);
        }
    }
}
