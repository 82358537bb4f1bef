//! Fork-join execution of independent Monte Carlo units
//!
//! Each unit receives its own seeded random stream and returns one value.
//! Results come back in dispatch order regardless of pool width, so a run is
//! reproducible from the seeds alone.

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use crate::{Result, SolverError};

/// A bounded pool of worker threads
///
/// A width of one runs every unit inline on the calling thread without
/// spawning anything.
pub struct WorkerPool {
    pool: Option<rayon::ThreadPool>,
    width: usize,
}

impl WorkerPool {
    /// Creates a pool of `n_jobs` workers
    ///
    /// `0` sizes the pool to the number of available cores.
    pub fn new(n_jobs: usize) -> Result<Self> {
        if n_jobs == 1 {
            return Ok(WorkerPool {
                pool: None,
                width: 1,
            });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_jobs)
            .thread_name(|i| format!("ara-worker-{}", i))
            .build()
            .map_err(|e| SolverError::InvalidConfiguration(e.to_string()))?;
        let width = pool.current_num_threads();
        Ok(WorkerPool {
            pool: Some(pool),
            width,
        })
    }

    /// Number of workers in the pool
    pub fn width(&self) -> usize {
        self.width
    }

    /// Runs one unit per seed and gathers the results in seed order
    ///
    /// `task` receives the unit index and a random stream seeded from
    /// `seeds[index]`. Units share nothing mutable.
    ///
    /// # Errors
    ///
    /// Any failing unit aborts the batch with [`SolverError::WorkerFailure`]
    /// naming its index; no partial results are returned.
    pub fn run<T, F>(&self, seeds: &[u64], task: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize, &mut StdRng) -> Result<T> + Sync,
    {
        let unit = |(iteration, &seed): (usize, &u64)| {
            let mut rng = StdRng::seed_from_u64(seed);
            task(iteration, &mut rng).map_err(|e| SolverError::WorkerFailure {
                iteration,
                source: Box::new(e),
            })
        };
        match &self.pool {
            None => seeds.iter().enumerate().map(unit).collect(),
            Some(pool) => pool.install(|| seeds.par_iter().enumerate().map(unit).collect()),
        }
    }
}
