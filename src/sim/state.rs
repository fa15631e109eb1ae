// Staggered-grid state owned by the simulation

use std::ops::Range;

use na::DMatrix;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ScalarField;

/// A magnitude from `magnitude` with a random sign
fn random_signed<R: Rng>(rng: &mut R, magnitude: &Range<f32>) -> f32 {
    let finite = magnitude.start.is_finite() && magnitude.end.is_finite();
    let m = if !finite {
        0.
    } else if magnitude.is_empty() {
        magnitude.start
    } else {
        rng.random_range(magnitude.clone())
    };
    if rng.random_bool(0.5) { m } else { -m }
}

/// Addresses a single velocity sample on the staggered grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceId {
    /// x-velocity on the vertical face left of cell `(row, col)`
    Horizontal { row: usize, col: usize },

    /// y-velocity on the horizontal face above cell `(row, col)`
    Vertical { row: usize, col: usize },
}

/// The three staggered arrays of the simulation.
///
/// - `pressure` is `n × n`, one scalar per cell
/// - `horizontal` is `n × (n+1)`, x-velocity on vertical faces
/// - `vertical` is `(n+1) × n`, y-velocity on horizontal faces
///
/// Columns `0` and `n` of `horizontal` and rows `0` and `n` of `vertical`
/// are solid walls.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    n: usize,
    pub pressure: ScalarField,
    pub horizontal: ScalarField,
    pub vertical: ScalarField,
}

impl SimulationState {
    /// Create a zero-filled state on an `n × n` grid
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "grid size must be > 0");

        SimulationState {
            n,
            pressure: DMatrix::zeros(n, n),
            horizontal: DMatrix::zeros(n, n + 1),
            vertical: DMatrix::zeros(n + 1, n),
        }
    }

    /// Build a state from existing arrays. Panics if the shapes do not
    /// describe the same `n × n` grid.
    pub fn from_fields(pressure: ScalarField, horizontal: ScalarField, vertical: ScalarField) -> Self {
        let (n, cols) = pressure.shape();
        assert!(n > 0, "grid size must be > 0");
        assert_eq!(n, cols, "pressure field must be square");
        assert_eq!(horizontal.shape(), (n, n + 1), "horizontal velocity must be n x (n+1)");
        assert_eq!(vertical.shape(), (n + 1, n), "vertical velocity must be (n+1) x n");

        SimulationState {
            n,
            pressure,
            horizontal,
            vertical,
        }
    }

    /// The grid dimension `n`
    pub fn size(&self) -> usize {
        self.n
    }

    /// Pressure at `(row, col)`, or zero outside of the grid
    pub fn pressure_at(&self, row: isize, col: isize) -> f32 {
        let n = self.n as isize;
        if row < 0 || col < 0 || row >= n || col >= n {
            return 0.;
        }
        self.pressure[(row as usize, col as usize)]
    }

    /// Zero all three arrays
    pub fn reset_to_zero(&mut self) {
        self.pressure.fill(0.);
        self.horizontal.fill(0.);
        self.vertical.fill(0.);
    }

    /// Fill every interior face with a random velocity whose magnitude is
    /// drawn from `magnitude` and whose sign is random. Wall faces stay zero.
    pub fn randomize_velocities<R: Rng>(&mut self, rng: &mut R, magnitude: Range<f32>) {
        let n = self.n;

        for row in 0..n {
            for col in 1..n {
                self.horizontal[(row, col)] = random_signed(rng, &magnitude);
            }
        }
        for row in 1..n {
            for col in 0..n {
                self.vertical[(row, col)] = random_signed(rng, &magnitude);
            }
        }

        self.enforce_walls();
    }

    /// Set a single interior face velocity. Wall faces and faces outside
    /// of the grid are left untouched and reported as `false`.
    pub fn set_face_velocity(&mut self, face: FaceId, value: f32) -> bool {
        let n = self.n;
        match face {
            FaceId::Horizontal { row, col } if row < n && (1..n).contains(&col) => {
                self.horizontal[(row, col)] = value;
                true
            }
            FaceId::Vertical { row, col } if (1..n).contains(&row) && col < n => {
                self.vertical[(row, col)] = value;
                true
            }
            _ => false,
        }
    }

    /// Read a single face velocity
    pub fn face_velocity(&self, face: FaceId) -> Option<f32> {
        match face {
            FaceId::Horizontal { row, col } => self.horizontal.get((row, col)).copied(),
            FaceId::Vertical { row, col } => self.vertical.get((row, col)).copied(),
        }
    }

    /// Force the wall faces to zero
    pub fn enforce_walls(&mut self) {
        let n = self.n;
        self.horizontal.column_mut(0).fill(0.);
        self.horizontal.column_mut(n).fill(0.);
        self.vertical.row_mut(0).fill(0.);
        self.vertical.row_mut(n).fill(0.);
    }

    /// Whether every wall face is exactly zero
    pub fn walls_are_zero(&self) -> bool {
        let n = self.n;
        self.horizontal.column(0).iter().all(|v| *v == 0.)
            && self.horizontal.column(n).iter().all(|v| *v == 0.)
            && self.vertical.row(0).iter().all(|v| *v == 0.)
            && self.vertical.row(n).iter().all(|v| *v == 0.)
    }

    /// Whether no array holds a NaN or infinity
    pub fn is_finite(&self) -> bool {
        self.pressure.iter().all(|x| x.is_finite())
            && self.horizontal.iter().all(|x| x.is_finite())
            && self.vertical.iter().all(|x| x.is_finite())
    }

    /// Largest absolute face velocity
    pub fn max_speed(&self) -> f32 {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .fold(0.0f32, |m, &x| m.max(x.abs()))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_shapes() {
        let state = SimulationState::new(8);

        assert_eq!(state.pressure.shape(), (8, 8));
        assert_eq!(state.horizontal.shape(), (8, 9));
        assert_eq!(state.vertical.shape(), (9, 8));
        assert!(state.pressure.iter().all(|p| *p == 0.));
    }

    #[test]
    #[should_panic]
    fn test_mismatched_fields() {
        SimulationState::from_fields(
            DMatrix::zeros(4, 4),
            DMatrix::zeros(4, 4),
            DMatrix::zeros(5, 4),
        );
    }

    #[test]
    fn test_pressure_out_of_bounds() {
        let mut state = SimulationState::new(3);
        state.pressure.fill(2.);

        assert_eq!(state.pressure_at(1, 1), 2.);
        assert_eq!(state.pressure_at(-1, 1), 0.);
        assert_eq!(state.pressure_at(1, 3), 0.);
        assert_eq!(state.pressure_at(3, 0), 0.);
    }

    #[test]
    fn test_set_face_velocity() {
        let mut state = SimulationState::new(4);

        assert!(state.set_face_velocity(FaceId::Horizontal { row: 2, col: 3 }, 1.5));
        assert!(state.set_face_velocity(FaceId::Vertical { row: 3, col: 0 }, -0.5));
        assert!(!state.set_face_velocity(FaceId::Horizontal { row: 4, col: 1 }, 1.));
        assert!(!state.set_face_velocity(FaceId::Vertical { row: 2, col: 4 }, 1.));

        assert_eq!(state.horizontal[(2, 3)], 1.5);
        assert_eq!(state.vertical[(3, 0)], -0.5);
        assert_eq!(state.face_velocity(FaceId::Horizontal { row: 2, col: 3 }), Some(1.5));
        assert_eq!(state.face_velocity(FaceId::Vertical { row: 9, col: 0 }), None);
    }

    #[test]
    fn test_wall_faces_rejected() {
        let mut state = SimulationState::new(4);

        assert!(!state.set_face_velocity(FaceId::Horizontal { row: 1, col: 0 }, 5.));
        assert!(!state.set_face_velocity(FaceId::Horizontal { row: 1, col: 4 }, 5.));
        assert!(!state.set_face_velocity(FaceId::Vertical { row: 0, col: 2 }, 5.));
        assert!(!state.set_face_velocity(FaceId::Vertical { row: 4, col: 2 }, 5.));

        assert!(state.walls_are_zero());
        assert_eq!(state, SimulationState::new(4));
    }

    #[test]
    fn test_randomize_non_finite_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SimulationState::new(4);

        state.randomize_velocities(&mut rng, 0.0..f32::INFINITY);
        state.randomize_velocities(&mut rng, f32::NAN..1.0);

        assert!(state.is_finite());
        assert_eq!(state.max_speed(), 0.);
    }

    #[test]
    fn test_randomize_and_reset() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = SimulationState::new(8);

        state.randomize_velocities(&mut rng, 0.5..2.0);

        assert!(state.walls_are_zero());
        for row in 0..8 {
            for col in 1..8 {
                let v = state.horizontal[(row, col)].abs();
                assert!((0.5..2.0).contains(&v), "{v} outside of range");
            }
        }
        assert!(state.max_speed() > 0.);

        state.pressure.fill(3.);
        state.reset_to_zero();

        assert_eq!(state, SimulationState::new(8));
    }
}
