// Discrete edits applied to the grid between ticks

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sim::state::{FaceId, SimulationState};

/// A user edit of the velocity field
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Action {
    /// Drag a face velocity to `value`
    SetFaceVelocity { face: FaceId, value: f32 },

    /// Randomize every interior face with magnitudes up to `magnitude`
    Randomize { magnitude: f32 },

    /// Zero pressure and velocity
    Reset,
}

impl Action {
    /// Whether every number carried by the action is finite
    pub fn is_finite(&self) -> bool {
        match self {
            Action::SetFaceVelocity { value, .. } => value.is_finite(),
            Action::Randomize { magnitude } => magnitude.is_finite(),
            Action::Reset => true,
        }
    }

    pub fn apply<R: Rng>(&self, state: &mut SimulationState, rng: &mut R) {
        match self {
            Action::SetFaceVelocity { face, value } if !value.is_finite() => {
                warn!("Ignoring non-finite velocity {} for face {:?}", value, face);
            }
            Action::SetFaceVelocity { face, value } => {
                let previous = state.face_velocity(*face);
                if state.set_face_velocity(*face, *value) {
                    debug!("face {:?}: {:?} -> {}", face, previous, value);
                } else {
                    warn!("Ignoring edit of face {:?}; it is a wall or outside of the grid", face);
                }
            }
            Action::Randomize { magnitude } if !magnitude.is_finite() => {
                warn!("Ignoring randomize with non-finite magnitude {}", magnitude);
            }
            Action::Randomize { magnitude } => {
                state.randomize_velocities(rng, 0.0..magnitude.abs());
            }
            Action::Reset => state.reset_to_zero(),
        }
    }
}

/// An action to apply right before tick `tick` runs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScheduledAction {
    pub tick: usize,
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_non_finite_actions_ignored() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = SimulationState::new(4);

        Action::Randomize {
            magnitude: f32::INFINITY,
        }
        .apply(&mut state, &mut rng);
        Action::SetFaceVelocity {
            face: FaceId::Horizontal { row: 1, col: 2 },
            value: f32::NAN,
        }
        .apply(&mut state, &mut rng);

        assert_eq!(state, SimulationState::new(4));
    }

    #[test]
    fn test_is_finite() {
        assert!(Action::Reset.is_finite());
        assert!(Action::Randomize { magnitude: 2. }.is_finite());
        assert!(!Action::Randomize { magnitude: f32::INFINITY }.is_finite());
        assert!(
            !Action::SetFaceVelocity {
                face: FaceId::Vertical { row: 1, col: 1 },
                value: f32::NEG_INFINITY
            }
            .is_finite()
        );
    }

    #[test]
    fn test_wall_edit_ignored() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = SimulationState::new(4);

        Action::SetFaceVelocity {
            face: FaceId::Horizontal { row: 1, col: 0 },
            value: 5.,
        }
        .apply(&mut state, &mut rng);

        assert!(state.walls_are_zero());
    }
}
