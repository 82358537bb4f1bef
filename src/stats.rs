//! Statistics collection for solver runs
//!
//! This module provides structures for collecting and reporting diagnostics
//! about a game or ARA solve. None of these values feed back into the
//! decision.

use std::time::Duration;

/// Statistics collected during a solve
#[derive(Debug, Clone)]
pub struct SolveStatistics {
    /// Number of (defense, attack) cells evaluated
    pub cells: usize,

    /// Total number of outcome samples drawn
    pub draws: u64,

    /// Number of random attacker instances drawn (ARA only)
    pub instances: u64,

    /// Width of the worker pool used
    pub workers: usize,

    /// Total time spent solving
    pub total_time: Duration,

    /// Time spent per defender strategy
    ///
    /// For the game solver this covers the attacker sweep only; for ARA it
    /// covers the whole row.
    pub defender_times: Vec<Duration>,
}

impl SolveStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SolveStatistics {
            cells: 0,
            draws: 0,
            instances: 0,
            workers: 1,
            total_time: Duration::from_secs(0),
            defender_times: Vec::new(),
        }
    }

    /// Returns the number of outcome draws per second
    pub fn draws_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.draws as f64 / self.total_time.as_secs_f64()
    }

    /// Returns the average time per cell in microseconds
    pub fn avg_time_per_cell_us(&self) -> f64 {
        if self.cells == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.cells as f64
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        format!(
            "Solve Statistics:\n\
             - Cells: {}\n\
             - Outcome draws: {}\n\
             - Attacker instances: {}\n\
             - Workers: {}\n\
             - Total time: {:.3} seconds\n\
             - Avg time per cell: {:.3} µs\n\
             - Draws per second: {:.1}",
            self.cells,
            self.draws,
            self.instances,
            self.workers,
            self.total_time.as_secs_f64(),
            self.avg_time_per_cell_us(),
            self.draws_per_second()
        )
    }
}

impl Default for SolveStatistics {
    fn default() -> Self {
        Self::new()
    }
}
