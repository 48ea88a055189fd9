use rayon::prelude::*;
use num_complex::Complex64;

use crate::{Error, Vector3D};

/// Accumulators that can be merged by component-wise sum
pub trait Reduce: Send {
    /// Add `other` into `self`
    fn reduce(&mut self, other: Self);
}

impl Reduce for f64 {
    fn reduce(&mut self, other: f64) {
        *self += other;
    }
}

impl Reduce for Complex64 {
    fn reduce(&mut self, other: Complex64) {
        *self += other;
    }
}

impl Reduce for Vector3D {
    fn reduce(&mut self, other: Vector3D) {
        *self += other;
    }
}

impl<T: Reduce> Reduce for Vec<T> {
    fn reduce(&mut self, other: Vec<T>) {
        assert_eq!(self.len(), other.len(), "can not reduce accumulators with different sizes");
        for (value, other) in self.iter_mut().zip(other) {
            value.reduce(other);
        }
    }
}

impl<A: Reduce, B: Reduce> Reduce for (A, B) {
    fn reduce(&mut self, other: (A, B)) {
        self.0.reduce(other.0);
        self.1.reduce(other.1);
    }
}

/// Distribution of an atom-indexed loop over a fixed number of workers.
///
/// Item `i` is processed by worker `i % workers`, each worker accumulating
/// into its own private accumulator. The partial results are then summed in
/// worker order, so the result only depends on the number of workers and not
/// on the scheduling of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelReduction {
    workers: usize,
}

impl ParallelReduction {
    /// Create a new `ParallelReduction` using `workers` logical workers
    pub fn new(workers: usize) -> Result<ParallelReduction, Error> {
        if workers == 0 {
            return Err(Error::InvalidParameter(
                "the number of workers must be at least 1".into()
            ));
        }

        Ok(ParallelReduction { workers })
    }

    /// Create a `ParallelReduction` running on the current thread only
    pub fn serial() -> ParallelReduction {
        ParallelReduction { workers: 1 }
    }

    /// Create a `ParallelReduction` with one worker per thread in the
    /// current rayon pool
    pub fn from_thread_pool() -> ParallelReduction {
        ParallelReduction { workers: rayon::current_num_threads().max(1) }
    }

    /// Get the number of workers
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `body(accumulator, i)` for all `i` in `0..n_items`, where each
    /// worker starts from a fresh accumulator created by `init`, and return
    /// the sum of all accumulators.
    pub fn map_reduce<A, I, F>(&self, n_items: usize, init: I, body: F) -> A
    where
        A: Reduce,
        I: Fn() -> A + Sync,
        F: Fn(&mut A, usize) + Sync,
    {
        let workers = self.workers;
        let run_worker = |rank: usize| {
            let mut accumulator = init();
            for i in (rank..n_items).step_by(workers) {
                body(&mut accumulator, i);
            }
            accumulator
        };

        let partials = if workers == 1 {
            vec![run_worker(0)]
        } else {
            (0..workers).into_par_iter().map(run_worker).collect::<Vec<_>>()
        };

        let mut partials = partials.into_iter();
        let mut result = match partials.next() {
            Some(first) => first,
            None => init(),
        };
        for partial in partials {
            result.reduce(partial);
        }

        return result;
    }
}
