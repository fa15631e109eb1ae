// Numeric helpers for the staggered grid

use num_traits::Float;

use crate::{ScalarField, sim::state::SimulationState};

/// Linear interpolation between `a` and `b`
pub fn lerp<T: Float>(a: T, b: T, t: T) -> T {
    a + (b - a) * t
}

/// Bilinearly sample a field at fractional index `(row, col)`.
///
/// The position is clamped into the array before interpolating, so samples
/// past an edge take the value of the nearest edge sample.
///
/// Parameters
/// - `field` - The array to sample
/// - `row` - The fractional row index
/// - `col` - The fractional column index
///
/// Returns
/// - The interpolated value
pub fn sample_bilinear(field: &ScalarField, row: f32, col: f32) -> f32 {
    let (rows, cols) = field.shape();

    let row = row.clamp(0., (rows - 1) as f32);
    let col = col.clamp(0., (cols - 1) as f32);

    let r0 = row.floor() as usize;
    let c0 = col.floor() as usize;
    let r1 = (r0 + 1).min(rows - 1);
    let c1 = (c0 + 1).min(cols - 1);

    let tr = row - r0 as f32;
    let tc = col - c0 as f32;

    let top = lerp(field[(r0, c0)], field[(r0, c1)], tc);
    let bottom = lerp(field[(r1, c0)], field[(r1, c1)], tc);

    lerp(top, bottom, tr)
}

/// Sample the x-velocity at grid-local position `(x, y)`. Horizontal
/// samples sit at `(col, row + 0.5)`.
pub fn sample_horizontal(state: &SimulationState, x: f32, y: f32) -> f32 {
    sample_bilinear(&state.horizontal, y - 0.5, x)
}

/// Sample the y-velocity at grid-local position `(x, y)`. Vertical samples
/// sit at `(col + 0.5, row)`.
pub fn sample_vertical(state: &SimulationState, x: f32, y: f32) -> f32 {
    sample_bilinear(&state.vertical, y, x - 0.5)
}

/// Net outflow of cell `(row, col)`. The far faces of the last row and
/// column read as zero.
pub fn cell_divergence(state: &SimulationState, row: usize, col: usize) -> f32 {
    let n = state.size();

    let v_left = state.horizontal[(row, col)];
    let v_right = if col == n - 1 {
        0.
    } else {
        state.horizontal[(row, col + 1)]
    };
    let v_up = state.vertical[(row, col)];
    let v_down = if row == n - 1 {
        0.
    } else {
        state.vertical[(row + 1, col)]
    };

    v_right - v_left + v_down - v_up
}

/// Largest absolute cell divergence over the grid
pub fn max_divergence(state: &SimulationState) -> f32 {
    let n = state.size();

    (0..n)
        .flat_map(|row| (0..n).map(move |col| (row, col)))
        .fold(0.0f32, |m, (row, col)| m.max(cell_divergence(state, row, col).abs()))
}

/// Sum of squared face velocities, halved
pub fn kinetic_energy(state: &SimulationState) -> f32 {
    0.5 * (state.horizontal.norm_squared() + state.vertical.norm_squared())
}
