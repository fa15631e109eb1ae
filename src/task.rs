// Task runner for the solver thread

use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::{
    observers::imgstream::{self, DisplayPacket},
    preprocessing::{ImageStreamSettings, InterfaceMode, SimulationInput, SummarySettings},
    sim::{fluid::FluidSim, numeric, state::SimulationState},
};

pub struct SimulationOutput {
    pub temporal_map: Vec<f32>, // maps idx->timestamp
    pub final_state: SimulationState,
}

fn progress_bar(ticks: usize) -> ProgressBar {
    let bar = ProgressBar::new(ticks as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "[Elapsed: {elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ticks (Remaining: {eta_precise})",
    ) {
        bar.set_style(style.progress_chars("##-"));
    }
    bar
}

/// The solver thread task to run in ImageStream mode
pub fn imgstream_task(settings: &ImageStreamSettings, mut sim: FluidSim) -> SimulationOutput {
    let bar = progress_bar(sim.ticks);
    let (sender, receiver) = mpsc::channel();

    // spawn image io thread
    let frames_dir = settings.frames_dir.clone();
    let io_handle = thread::spawn(move || imgstream::image_io_loop(receiver, &frames_dir));

    let dt = sim.params.dt;
    let mut temporal_map: Vec<f32> = Vec::new();

    // frame 0 is the state before any tick
    sender
        .send(DisplayPacket {
            state: sim.state().clone(),
            i: 0,
        })
        .ok();
    temporal_map.push(0.);

    for (state, tick) in sim.by_ref() {
        if sender.send(DisplayPacket { state, i: tick }).is_err() {
            error!("Image writer stopped; no further frames will be saved");
            break;
        }

        bar.set_position(tick as u64);
        temporal_map.push(tick as f32 * dt);
    }
    bar.finish();
    info!("Solver stopped after {} ticks", sim.tick());

    // closing the channel ends the io loop
    drop(sender);
    match io_handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!("Image writer failed: {err}"),
        Err(_) => error!("Image writer thread panicked"),
    }

    SimulationOutput {
        temporal_map,
        final_state: sim.state().clone(),
    }
}

/// The solver thread task to run in Summary mode; logs diagnostics only
pub fn summary_task(settings: &SummarySettings, mut sim: FluidSim) -> SimulationOutput {
    let bar = progress_bar(sim.ticks);
    let dt = sim.params.dt;
    let report_every = settings.report_every.max(1);

    let mut temporal_map: Vec<f32> = vec![0.];
    for (state, tick) in sim.by_ref() {
        if tick % report_every == 0 {
            bar.suspend(|| {
                info!(
                    "tick {:>5}: max |p| {:.4}, max speed {:.4}, max divergence {:.4e}",
                    tick,
                    state.pressure.amax(),
                    state.max_speed(),
                    numeric::max_divergence(&state)
                )
            });
        }

        bar.set_position(tick as u64);
        temporal_map.push(tick as f32 * dt);
    }
    bar.finish();

    SimulationOutput {
        temporal_map,
        final_state: sim.state().clone(),
    }
}

/// Spawns the simulation thread and starts the corresponding task. The grid
/// never leaves this thread; observers only see cloned snapshots.
pub fn spawn_sim_thread(
    simulation_input: SimulationInput,
    initial_state: SimulationState,
) -> JoinHandle<SimulationOutput> {
    thread::spawn(move || {
        let sim = FluidSim::new(
            initial_state,
            simulation_input.params,
            simulation_input.ticks,
            simulation_input.actions.clone(),
            simulation_input.seed,
        );

        match &simulation_input.mode {
            InterfaceMode::ImageStream(settings) => imgstream_task(settings, sim),
            InterfaceMode::Summary(settings) => summary_task(settings, sim),
        }
    })
}
