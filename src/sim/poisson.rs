// Red-black Gauss-Seidel relaxation of the pressure field.

use crate::sim::{numeric, params::SimParams, state::SimulationState};

/// Relax every cell of one color class, where the color of a cell is
/// `(row + col) % 2`. Neighbors are read from the live field, so cells of
/// the other color see the values written by their previous half-sweep.
///
/// Parameters
/// - `state` - The grid; only `state.pressure` is written
/// - `params` - Density, spacing and timestep
/// - `color` - `0` (red) or `1` (black)
pub fn relax_color(state: &mut SimulationState, params: &SimParams, color: usize) {
    let n = state.size();
    let scale = params.density * params.dx / params.dt;

    for row in 0..n {
        for col in ((row + color) % 2..n).step_by(2) {
            let (r, c) = (row as isize, col as isize);

            let neighbors = state.pressure_at(r, c - 1)
                + state.pressure_at(r, c + 1)
                + state.pressure_at(r - 1, c)
                + state.pressure_at(r + 1, c);

            let divergence = numeric::cell_divergence(state, row, col);

            state.pressure[(row, col)] = (neighbors - scale * divergence) / 4.;
        }
    }
}

/// One full red-black sweep: all red cells, then all black cells.
pub fn relax(state: &mut SimulationState, params: &SimParams) {
    relax_color(state, params, 0);
    relax_color(state, params, 1);
}

/// Run `params.relax_iterations` full sweeps
pub fn relax_n(state: &mut SimulationState, params: &SimParams) {
    for _ in 0..params.relax_iterations {
        relax(state, params);
    }
}

#[cfg(test)]
mod tests {
    use na::DMatrix;

    use super::*;
    use crate::ScalarField;

    /// Simultaneous update of all cells from the previous field
    fn relax_jacobi(state: &SimulationState, params: &SimParams) -> ScalarField {
        let n = state.size();
        let scale = params.density * params.dx / params.dt;

        DMatrix::from_fn(n, n, |row, col| {
            let (r, c) = (row as isize, col as isize);
            let neighbors = state.pressure_at(r, c - 1)
                + state.pressure_at(r, c + 1)
                + state.pressure_at(r - 1, c)
                + state.pressure_at(r + 1, c);

            (neighbors - scale * numeric::cell_divergence(state, row, col)) / 4.
        })
    }

    #[test]
    fn test_single_face_divergence() {
        let params = SimParams::default();
        let mut state = SimulationState::new(8);
        state.horizontal[(4, 4)] = 1.;

        relax(&mut state, &params);

        let left = state.pressure[(4, 3)];
        let right = state.pressure[(4, 4)];

        // outflow through the right face of (4,3), inflow into (4,4)
        assert!(left < 0., "left pressure {left}");
        assert!(right > 0., "right pressure {right}");
        assert!((right - 9.375).abs() < 1e-4);
        assert!(state.horizontal[(4, 4)] == 1., "relax must not touch velocity");
    }

    #[test]
    fn test_zero_input() {
        let params = SimParams::default();
        let mut state = SimulationState::new(8);

        relax(&mut state, &params);

        assert!(state.pressure.iter().all(|p| *p == 0.));
    }

    #[test]
    fn test_red_black_order() {
        let params = SimParams::default();
        let mut state = SimulationState::new(5);
        state.horizontal[(1, 2)] = 1.;
        state.horizontal[(3, 1)] = -0.5;
        state.vertical[(2, 3)] = 0.75;
        state.pressure[(0, 0)] = 2.;

        let mut two_phase = state.clone();
        relax_color(&mut two_phase, &params, 0);
        relax_color(&mut two_phase, &params, 1);

        let jacobi = relax_jacobi(&state, &params);

        relax(&mut state, &params);

        assert_eq!(state.pressure, two_phase.pressure);
        assert!((&state.pressure - &jacobi).norm() > 1e-3);
    }

    #[test]
    fn test_red_cells_first() {
        let params = SimParams::default();
        let mut state = SimulationState::new(4);
        state.horizontal[(1, 1)] = 1.;

        relax_color(&mut state, &params, 0);

        // (1,1) is red and has inflow; its black neighbor (1,0) is untouched
        assert!(state.pressure[(1, 1)] > 0.);
        assert_eq!(state.pressure[(1, 0)], 0.);
    }

    #[test]
    fn test_sweeps_converge() {
        let params = SimParams {
            relax_iterations: 200,
            ..SimParams::default()
        };
        let mut state = SimulationState::new(6);
        state.horizontal[(2, 3)] = 1.;
        state.vertical[(4, 1)] = -1.;

        relax_n(&mut state, &params);
        let converged = state.pressure.clone();
        relax(&mut state, &params);

        assert!((&state.pressure - &converged).norm() < 1e-2);
    }
}
