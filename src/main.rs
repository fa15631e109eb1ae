use std::{fs, process::exit};

extern crate nalgebra as na;

mod observers;
mod postprocessing;
mod preprocessing;
mod sim;
mod task;

use clap::Parser;
use na::DMatrix;
use tracing::{error, info};

use preprocessing::cli::CliArgs;

type ScalarField = DMatrix<f32>;

fn main() {
    tracing_subscriber::fmt::init();

    let args = CliArgs::parse();
    let simulation_input = args.create_input();

    if let Err(err) = simulation_input.validate() {
        error!("Invalid simulation input: {err}");
        exit(1);
    }

    let initial_state = match simulation_input.get_state() {
        Ok(state) => state,
        Err(err) => {
            error!("Unable to build the initial grid: {err}");
            exit(1);
        }
    };

    simulation_input.log();

    if let Some(savepath) = &args.input_json_savepath {
        match serde_json::to_string_pretty(&simulation_input) {
            Ok(json) => {
                _ = fs::write(savepath, json)
                    .inspect(|_| info!("Saved input file to {:?}", savepath))
                    .inspect_err(|err| error!("Failed to save input file: {:?}", err));
            }
            Err(err) => error!("Failed to serialize input: {:?}", err),
        }
    }

    let handle = task::spawn_sim_thread(simulation_input.clone(), initial_state);

    let simulation_output = match handle.join() {
        Ok(output) => output,
        Err(_) => {
            error!("Solver thread panicked");
            exit(1);
        }
    };

    if let Some(savepath) = &args.state_json_savepath {
        _ = postprocessing::save_state(&simulation_output, savepath)
            .inspect_err(|err| error!("Failed to save final state: {:?}", err));
    }

    postprocessing::postprocess(simulation_input, &simulation_output);
}
