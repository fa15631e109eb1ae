// Contains post-processers for simulation results

pub mod display;

use std::{error::Error, fs, path::Path};

use tracing::{info, warn};

use crate::{
    preprocessing::{InterfaceMode, SimulationInput, serial_field::SerialState},
    sim::numeric,
    task::SimulationOutput,
};

/// Write the final grid to a JSON state file. A grid holding NaN or
/// infinite values is refused, since it could not be loaded back.
pub fn save_state(sim_output: &SimulationOutput, path: &Path) -> Result<(), Box<dyn Error>> {
    if !sim_output.final_state.is_finite() {
        return Err("final state holds non-finite values; not saving it".into());
    }
    let serial = SerialState::from_state(&sim_output.final_state);
    fs::write(path, serde_json::to_string_pretty(&serial)?)?;
    info!("Saved final state to {:?}", path);
    Ok(())
}

pub fn postprocess(sim_input: SimulationInput, sim_output: &SimulationOutput) {
    let last = &sim_output.final_state;
    info!(
        "Finished after {} ticks ({:.3} s): max speed {:.4}, max divergence {:.4e}, kinetic energy {:.4e}",
        sim_output.temporal_map.len().saturating_sub(1),
        sim_output.temporal_map.last().copied().unwrap_or(0.),
        last.max_speed(),
        numeric::max_divergence(last),
        numeric::kinetic_energy(last),
    );

    if let InterfaceMode::ImageStream(settings) = sim_input.mode {
        if settings.display_video {
            _ = display::play_video(60, &sim_output.temporal_map, &settings.frames_dir)
                .inspect_err(|err| warn!("Unable to play frames: {:?}", err));
        }

        if !settings.retain_frames {
            _ = fs::remove_dir_all(settings.frames_dir)
                .inspect_err(|err| warn!("Unable to cleanup frames output: {:?}", err));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SimulationState;

    #[test]
    fn test_save_state() {
        let mut final_state = SimulationState::new(3);
        final_state.horizontal[(1, 1)] = 0.5;

        let output = SimulationOutput {
            temporal_map: vec![0., 0.016],
            final_state,
        };

        let path = std::env::temp_dir().join(format!("flowgrid-state-{}.json", std::process::id()));
        save_state(&output, &path).unwrap();

        let stored: SerialState = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(stored.to_state(3).unwrap(), output.final_state);
    }

    #[test]
    fn test_non_finite_state_not_saved() {
        let mut final_state = SimulationState::new(3);
        final_state.pressure[(1, 1)] = f32::NAN;

        let output = SimulationOutput {
            temporal_map: vec![0.],
            final_state,
        };

        let path =
            std::env::temp_dir().join(format!("flowgrid-nan-state-{}.json", std::process::id()));

        assert!(save_state(&output, &path).is_err());
        assert!(!path.exists());
    }
}
