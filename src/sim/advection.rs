// Semi-Lagrangian advection of the face velocities

use crate::{
    ScalarField,
    sim::{numeric, params::SimParams, state::SimulationState},
};

/// Trace a sample at `(x, y)` back over one timestep.
///
/// Returns
/// - The backtracked grid-local position `(x, y)`
fn backtrack(state: &SimulationState, params: &SimParams, x: f32, y: f32) -> (f32, f32) {
    let vel_x = numeric::sample_horizontal(state, x, y);
    let vel_y = numeric::sample_vertical(state, x, y);

    let step = params.dt / params.dx;

    (x - step * vel_x, y - step * vel_y)
}

/// Advect both velocity arrays through the current velocity field.
///
/// Each sample is traced backward over `params.dt` and the old field is
/// bilinearly resampled at the departure point. All reads come from the
/// field as it was before the call; results land in temporaries that are
/// swapped in at the end. Wall faces are not zeroed here.
///
/// Parameters
/// - `state` - The grid; both velocity arrays are replaced
/// - `params` - Spacing and timestep
pub fn advect(state: &mut SimulationState, params: &SimParams) {
    let (h_rows, h_cols) = state.horizontal.shape();
    let (v_rows, v_cols) = state.vertical.shape();

    let horizontal_next: ScalarField = ScalarField::from_fn(h_rows, h_cols, |row, col| {
        let (x, y) = backtrack(state, params, col as f32, row as f32 + 0.5);
        numeric::sample_horizontal(state, x, y)
    });

    let vertical_next: ScalarField = ScalarField::from_fn(v_rows, v_cols, |row, col| {
        let (x, y) = backtrack(state, params, col as f32 + 0.5, row as f32);
        numeric::sample_vertical(state, x, y)
    });

    state.horizontal = horizontal_next;
    state.vertical = vertical_next;
}
