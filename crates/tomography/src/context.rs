// This code is part of Qiskit.
//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

//! Splitting per-pair work across a fixed set of workers and gathering it on the coordinator.

use std::env;
use std::ops::Range;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{IdleTomographyError, Result};
use crate::getenv_use_multiple_threads;

/// Contiguous, disjoint slices of `0..num_items`, one per worker in rank order.
///
/// The first `num_items % num_workers` workers get one extra item; trailing workers may get an
/// empty slice.
pub fn distribute_indices(num_items: usize, num_workers: usize) -> Vec<Range<usize>> {
    let num_workers = num_workers.max(1);
    let base = num_items / num_workers;
    let extra = num_items % num_workers;
    let mut start = 0;
    (0..num_workers)
        .map(|rank| {
            let len = base + usize::from(rank < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Which worker this is and how many there are.
///
/// Rank 0 is the coordinator: it receives every worker's results in rank order and is the only
/// one that inverts the design matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    num_workers: usize,
    rank: usize,
    parallel: bool,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            num_workers: 1,
            rank: 0,
            parallel: false,
        }
    }
}

impl ExecutionContext {
    /// A coordinator for `num_workers` workers, run one after another.
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
            ..Self::default()
        }
    }

    /// A context configured from the process environment.
    ///
    /// `IDLETOMO_NUM_WORKERS` sets the number of workers, defaulting to the size of the rayon pool
    /// when threads are allowed and to one otherwise.  Worker slices run on the rayon pool unless
    /// [getenv_use_multiple_threads] says not to.
    pub fn from_env() -> Self {
        let parallel = getenv_use_multiple_threads();
        let num_workers = env::var("IDLETOMO_NUM_WORKERS")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or_else(|| {
                if parallel {
                    rayon::current_num_threads()
                } else {
                    1
                }
            });
        Self::with_workers(num_workers).with_parallel(parallel)
    }

    /// The same pool of workers, seen from worker `rank`.
    pub fn with_rank(self, rank: usize) -> Result<Self> {
        if rank >= self.num_workers {
            return Err(IdleTomographyError::InvalidRank {
                rank,
                num_workers: self.num_workers,
            });
        }
        Ok(Self { rank, ..self })
    }

    pub fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    #[inline]
    pub fn is_coordinator(&self) -> bool {
        self.rank == 0
    }

    /// Map `f` over `items`, each worker taking its slice from [distribute_indices].
    ///
    /// The coordinator gets every result, in the order of `items`.  Any other rank computes only
    /// its own slice and gets `None`.  The first error in rank order is returned.
    pub fn run_workers<T, R, F>(&self, items: &[T], f: F) -> Result<Option<Vec<R>>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync,
    {
        let slices = distribute_indices(items.len(), self.num_workers);
        let work = |rank: usize, range: &Range<usize>| -> Result<Vec<R>> {
            debug!(rank, start = range.start, end = range.end, "worker slice");
            items[range.clone()].iter().map(&f).collect()
        };

        if !self.is_coordinator() {
            work(self.rank, &slices[self.rank])?;
            return Ok(None);
        }

        let gathered: Vec<Vec<R>> = if self.parallel && self.num_workers > 1 {
            slices
                .par_iter()
                .enumerate()
                .map(|(rank, range)| work(rank, range))
                .collect::<Result<_>>()?
        } else {
            slices
                .iter()
                .enumerate()
                .map(|(rank, range)| work(rank, range))
                .collect::<Result<_>>()?
        };
        Ok(Some(gathered.into_iter().flatten().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test::in_scoped_thread_pool;

    #[test]
    fn slices_are_contiguous_and_balanced() {
        assert_eq!(distribute_indices(10, 3), vec![0..4, 4..7, 7..10]);
        assert_eq!(distribute_indices(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
        assert_eq!(distribute_indices(0, 2), vec![0..0, 0..0]);
        assert_eq!(distribute_indices(5, 0), vec![0..5]);
        for num_items in 0..20 {
            for num_workers in 1..7 {
                let slices = distribute_indices(num_items, num_workers);
                assert_eq!(slices.len(), num_workers);
                assert_eq!(slices.last().map(|r| r.end), Some(num_items));
                let lens = slices.iter().map(|r| r.len()).collect::<Vec<_>>();
                assert!(lens.windows(2).all(|w| w[0] >= w[1] && w[0] - w[1] <= 1));
            }
        }
    }

    #[test]
    fn gather_preserves_item_order() {
        let items = (0..37).collect::<Vec<u64>>();
        let serial = ExecutionContext::default()
            .run_workers(&items, |x| Ok(x * x))
            .unwrap()
            .unwrap();
        let parallel = in_scoped_thread_pool(4, || {
            ExecutionContext::with_workers(5)
                .with_parallel(true)
                .run_workers(&items, |x| Ok(x * x))
        })
        .unwrap()
        .unwrap()
        .unwrap();
        assert_eq!(serial, parallel);
        assert_eq!(serial[6], 36);
    }

    #[test]
    fn only_the_coordinator_gathers() {
        let items = [1, 2, 3];
        let worker = ExecutionContext::with_workers(2).with_rank(1).unwrap();
        assert!(!worker.is_coordinator());
        assert!(worker.run_workers(&items, |x| Ok(*x)).unwrap().is_none());
        assert!(matches!(
            ExecutionContext::with_workers(2).with_rank(2),
            Err(IdleTomographyError::InvalidRank {
                rank: 2,
                num_workers: 2
            })
        ));
    }

    #[test]
    fn errors_reach_the_caller() {
        let items = [1, 2, 3, 4];
        let result = ExecutionContext::with_workers(2).run_workers(&items, |x| {
            if *x == 3 {
                Err(IdleTomographyError::EmptyLengthSweep)
            } else {
                Ok(*x)
            }
        });
        assert!(matches!(result, Err(IdleTomographyError::EmptyLengthSweep)));
    }
}
