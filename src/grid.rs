//! Discretized strategy spaces

use std::ops::Deref;

use crate::{Result, SolverError};

/// An ordered, non-empty sequence of admissible strategies for one player
///
/// Values need not be evenly spaced; their order only fixes the indexing of
/// the result matrices. A grid cannot be modified once built.
///
/// # Example
///
/// ```
/// use ara_mcmc::StrategyGrid;
///
/// let grid = StrategyGrid::arange(0.0, 1.0, 0.25, "defender").unwrap();
/// assert_eq!(grid.values(), &[0.0, 0.25, 0.5, 0.75]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyGrid {
    values: Vec<f64>,
}

impl StrategyGrid {
    /// Builds a grid from explicit values
    ///
    /// `name` identifies the grid in the error returned when `values` is empty.
    pub fn new(values: Vec<f64>, name: &'static str) -> Result<Self> {
        if values.is_empty() {
            return Err(SolverError::EmptyGrid(name));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SolverError::InvalidConfiguration(format!(
                "{} grid contains non-finite strategy {}",
                name, bad
            )));
        }
        Ok(StrategyGrid { values })
    }

    /// Builds the evenly spaced grid `start, start + step, ...` below `stop`
    pub fn arange(start: f64, stop: f64, step: f64, name: &'static str) -> Result<Self> {
        if !(step > 0.0) || !step.is_finite() {
            return Err(SolverError::InvalidConfiguration(format!(
                "{} grid step must be positive, got {}",
                name, step
            )));
        }
        let count = ((stop - start) / step).ceil().max(0.0) as usize;
        let values = (0..count).map(|i| start + i as f64 * step).collect();
        Self::new(values, name)
    }

    /// The strategies, in grid order
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Deref for StrategyGrid {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values
    }
}
