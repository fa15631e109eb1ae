// Pressure-gradient projection of the face velocities

use crate::sim::{params::SimParams, state::SimulationState};

/// Subtract the pressure gradient across every interior face, then zero
/// the wall faces.
///
/// Parameters
/// - `state` - The grid; both velocity arrays are written
/// - `params` - Density, spacing and timestep
pub fn project(state: &mut SimulationState, params: &SimParams) {
    let n = state.size();
    let k = params.dt / params.density;

    for row in 1..n {
        for col in 0..n {
            let dp = state.pressure[(row, col)] - state.pressure[(row - 1, col)];
            state.vertical[(row, col)] -= k * dp / params.dx;
        }
    }

    for row in 0..n {
        for col in 1..n {
            let dp = state.pressure[(row, col)] - state.pressure[(row, col - 1)];
            state.horizontal[(row, col)] -= k * dp / params.dx;
        }
    }

    state.enforce_walls();
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::sim::{numeric, poisson};

    #[test]
    fn test_walls_zero_after_projection() {
        let params = SimParams::default();
        let mut state = SimulationState::new(8);
        state.horizontal.fill(1.);
        state.vertical.fill(-2.);
        state.pressure[(0, 0)] = 5.;
        state.pressure[(7, 7)] = -5.;

        project(&mut state, &params);

        for row in 0..8 {
            assert_eq!(state.horizontal[(row, 0)], 0.);
            assert_eq!(state.horizontal[(row, 8)], 0.);
        }
        for col in 0..8 {
            assert_eq!(state.vertical[(0, col)], 0.);
            assert_eq!(state.vertical[(8, col)], 0.);
        }
    }

    #[test]
    fn test_gradient_direction() {
        let params = SimParams::default();
        let mut state = SimulationState::new(3);
        state.pressure[(1, 1)] = 1.;

        project(&mut state, &params);

        let k = params.dt / params.density;

        // flow is pushed away from the high pressure cell
        assert!((state.horizontal[(1, 1)] + k).abs() < 1e-6);
        assert!((state.horizontal[(1, 2)] - k).abs() < 1e-6);
        assert!((state.vertical[(1, 1)] + k).abs() < 1e-6);
        assert!((state.vertical[(2, 1)] - k).abs() < 1e-6);
    }

    #[test]
    fn test_projection_reduces_divergence() {
        let params = SimParams {
            relax_iterations: 50,
            ..SimParams::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = SimulationState::new(8);
        state.randomize_velocities(&mut rng, 0.1..1.0);

        let before = numeric::max_divergence(&state);

        // walls read as zero pressure, so a single projection leaves some
        // divergence in the edge cells; repeated rounds remove it
        for _ in 0..100 {
            poisson::relax_n(&mut state, &params);
            project(&mut state, &params);
        }

        let after = numeric::max_divergence(&state);

        assert!(before > 0.);
        assert!(after < 0.1 * before, "before={before}, after={after}");
    }
}
