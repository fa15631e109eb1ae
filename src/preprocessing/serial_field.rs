use std::error::Error;

use na::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{ScalarField, sim::state::SimulationState};

/// A field flattened in column-major order for JSON storage
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SerialField {
    data: Vec<f32>,
    nrows: usize,
    ncols: usize,
}

impl SerialField {
    pub fn from_field(field: &ScalarField) -> Self {
        let (nrows, ncols) = field.shape();

        Self {
            data: field.as_slice().to_vec(),
            nrows,
            ncols,
        }
    }

    pub fn to_field(&self) -> Result<ScalarField, Box<dyn Error>> {
        if self.data.len() != self.nrows * self.ncols {
            return Err(format!(
                "field has {} values but claims a {}x{} shape",
                self.data.len(),
                self.nrows,
                self.ncols
            )
            .into());
        }

        Ok(DMatrix::from_column_slice(self.nrows, self.ncols, &self.data))
    }
}

/// All three grid arrays, as stored in input and state files
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SerialState {
    pub pressure: SerialField,
    pub horizontal: SerialField,
    pub vertical: SerialField,
}

impl SerialState {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            pressure: SerialField::from_field(&state.pressure),
            horizontal: SerialField::from_field(&state.horizontal),
            vertical: SerialField::from_field(&state.vertical),
        }
    }

    /// Rebuild the grid, checking that it is `grid_size × grid_size`
    pub fn to_state(&self, grid_size: usize) -> Result<SimulationState, Box<dyn Error>> {
        let pressure = self.pressure.to_field()?;
        let horizontal = self.horizontal.to_field()?;
        let vertical = self.vertical.to_field()?;

        let n = grid_size;
        if n == 0
            || pressure.shape() != (n, n)
            || horizontal.shape() != (n, n + 1)
            || vertical.shape() != (n + 1, n)
        {
            return Err(format!(
                "stored state does not describe a {n}x{n} grid (pressure {:?}, horizontal {:?}, vertical {:?})",
                pressure.shape(),
                horizontal.shape(),
                vertical.shape()
            )
            .into());
        }

        Ok(SimulationState::from_fields(pressure, horizontal, vertical))
    }
}
