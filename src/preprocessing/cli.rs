use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    process::exit,
    sync::LazyLock,
};

use clap::Parser;
use tracing::{error, info};

use crate::{
    preprocessing::{
        DEFAULT_GRID_SIZE, ImageStreamSettings, InterfaceMode, SimulationInput, SummarySettings,
    },
    sim::{
        actions::{Action, ScheduledAction},
        params::{DEFAULT_DENSITY, DEFAULT_DT, DEFAULT_DX, DEFAULT_RELAX_ITERATIONS, SimParams},
        state::FaceId,
    },
};

static DEFAULT_FRAMES_PATH: LazyLock<&Path> = LazyLock::new(|| Path::new("sim-frames"));

/// Parse `ROW,COL,VALUE` into a horizontal face edit
fn parse_seed_face(arg: &str) -> Result<(usize, usize, f32), String> {
    let parts: Vec<&str> = arg.split(',').map(str::trim).collect();
    let [row, col, value] = parts.as_slice() else {
        return Err(format!("expected ROW,COL,VALUE but got '{arg}'"));
    };

    let row = row.parse::<usize>().map_err(|e| format!("bad row '{row}': {e}"))?;
    let col = col.parse::<usize>().map_err(|e| format!("bad column '{col}': {e}"))?;
    let value = value
        .parse::<f32>()
        .map_err(|e| format!("bad velocity '{value}': {e}"))?;

    Ok((row, col, value))
}

// Raw, CLI input
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[arg(long, help = "An input file with pre-loaded parameters.")]
    input_json: Option<PathBuf>,

    #[arg(long, help = "Optional path to save the effective input file to.")]
    pub input_json_savepath: Option<PathBuf>,

    #[arg(long, help = "Optional path to save the final grid state to.")]
    pub state_json_savepath: Option<PathBuf>,

    #[arg(
        long,
        help = "The mode to run the simulation in: `video` or `summary`",
        default_value = "summary"
    )]
    mode: String,

    #[arg(
        long,
        help = "An optional directory pointing to where frames should be saved."
    )]
    frames_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Whether or not frames should be retained after saving.",
        default_value = "false"
    )]
    retain_frames: bool,

    #[arg(
        short,
        long,
        help = "Whether the frame animation should play after solving. Video mode only."
    )]
    display_video: bool,

    #[arg(long, help = "Log diagnostics every N ticks in summary mode.", default_value = "10")]
    report_every: usize,

    #[arg(short = 'n', long, help = "Cells per side of the grid.", default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: usize,

    #[arg(short, long, help = "Number of ticks to simulate.", default_value = "200")]
    ticks: usize,

    #[arg(long, help = "Fluid density.", default_value_t = DEFAULT_DENSITY)]
    density: f32,

    #[arg(long, help = "Cell spacing.", default_value_t = DEFAULT_DX)]
    dx: f32,

    #[arg(long, help = "Timestep per tick in seconds.", default_value_t = DEFAULT_DT)]
    dt: f32,

    #[arg(long, help = "Pressure relaxation sweeps per tick.", default_value_t = DEFAULT_RELAX_ITERATIONS)]
    relax_iterations: usize,

    #[arg(
        long = "seed-face",
        value_parser = parse_seed_face,
        help = "Set a horizontal face velocity before the first tick, as ROW,COL,VALUE. Repeatable."
    )]
    seed_faces: Vec<(usize, usize, f32)>,

    #[arg(long, help = "Randomize interior face velocities up to this magnitude before the first tick.")]
    randomize: Option<f32>,

    #[arg(long, help = "Seed for the random number generator.")]
    seed: Option<u64>,
}

impl CliArgs {
    fn load_input_file(input_filepath: &Path) -> SimulationInput {
        if !input_filepath.exists() {
            error!("Input file {:?} does not exist.", input_filepath);
            exit(1);
        }
        if input_filepath.is_dir() {
            error!("Input file {:?} is a directory.", input_filepath);
            exit(1);
        }

        info!(
            "Using input file {}",
            input_filepath.to_str().unwrap_or("<unknown>")
        );

        let input_file = match File::open(input_filepath) {
            Ok(file) => file,
            Err(err) => {
                error!("Failed to open input file: {:?}", err);
                exit(1);
            }
        };

        let reader = BufReader::new(input_file);
        match serde_json::from_reader(reader) {
            Ok(input) => input,
            Err(err) => {
                error!("Failed to deserialize input file: {:?}", err);
                exit(1);
            }
        }
    }

    /// Edits implied by `--randomize` and `--seed-face`, all at tick 0
    fn initial_actions(&self) -> Vec<ScheduledAction> {
        let randomize = self.randomize.map(|magnitude| Action::Randomize { magnitude });

        let faces = self
            .seed_faces
            .iter()
            .map(|&(row, col, value)| Action::SetFaceVelocity {
                face: FaceId::Horizontal { row, col },
                value,
            });

        randomize
            .into_iter()
            .chain(faces)
            .map(|action| ScheduledAction { tick: 0, action })
            .collect()
    }

    pub fn create_input(&self) -> SimulationInput {
        // if the input file is supplied, just use that
        if let Some(input_filepath) = &self.input_json {
            return Self::load_input_file(input_filepath);
        }

        // otherwise, build the input from the other arguments
        let mode = match self.mode.as_str() {
            "video" => {
                let frames_dir = self
                    .frames_dir
                    .clone()
                    .unwrap_or((*DEFAULT_FRAMES_PATH).into());

                InterfaceMode::ImageStream(ImageStreamSettings {
                    frames_dir,
                    retain_frames: self.retain_frames,
                    display_video: self.display_video,
                })
            }
            "summary" => InterfaceMode::Summary(SummarySettings {
                report_every: self.report_every,
            }),
            _ => {
                error!(
                    "'{}' is not a valid interface mode. Use --help for info.",
                    self.mode
                );
                exit(1);
            }
        };

        SimulationInput {
            mode,
            grid_size: self.grid_size,
            ticks: self.ticks,
            params: SimParams {
                density: self.density,
                dx: self.dx,
                dt: self.dt,
                relax_iterations: self.relax_iterations,
            },
            actions: self.initial_actions(),
            initial_state: None,
            seed: self.seed,
        }
    }
}
