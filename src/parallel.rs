//! Fork-join helpers over a dedicated rayon pool.
//!
//! Every parallel stage of the pipeline runs inside a [`Workers`] pool with a
//! fixed thread count. Work is split into one contiguous partition per worker,
//! so the partition boundaries depend only on the input length and the worker
//! count, never on scheduling.

use crate::errors::{EqualizeError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// A fixed-size pool of worker threads.
pub struct Workers {
    pool: ThreadPool,
    count: usize,
}

impl Workers {
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(EqualizeError::InvalidWorkerCount { count });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(count)
            .thread_name(|i| format!("histeq-worker-{}", i))
            .build()
            .map_err(|e| EqualizeError::ThreadPoolError {
                message: e.to_string(),
            })?;

        tracing::debug!(workers = count, "worker pool ready");
        Ok(Self { pool, count })
    }

    /// Single worker; the reference mode every other worker count must match.
    pub fn sequential() -> Result<Self> {
        Self::new(1)
    }

    /// One worker per detected hardware thread.
    pub fn available() -> Result<Self> {
        Self::new(num_cpus::get().max(1))
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Run `op` inside the pool so nested rayon iterators use these workers.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Length of each worker's partition for `len` items. Never zero, so an
    /// empty input still yields valid (empty) chunks.
    pub fn partition_len(&self, len: usize) -> usize {
        len.div_ceil(self.count).max(1)
    }

    /// The contiguous slice owned by `worker`. Workers past the end of the
    /// input get an empty slice.
    pub fn partition<'a, T>(&self, items: &'a [T], worker: usize) -> &'a [T] {
        let chunk = self.partition_len(items.len());
        let start = (worker * chunk).min(items.len());
        let end = (start + chunk).min(items.len());
        &items[start..end]
    }

    /// Private accumulate, then sequential merge.
    ///
    /// Each worker folds its own partition into a fresh accumulator from
    /// `init`; no accumulator is visible to more than one worker. Once every
    /// worker has finished, the partials are merged in partition order on the
    /// calling thread.
    pub fn partition_reduce<T, A, I, F, M>(&self, items: &[T], init: I, fold: F, mut merge: M) -> A
    where
        T: Sync,
        A: Send,
        I: Fn() -> A + Sync + Send,
        F: Fn(&mut A, &[T]) + Sync + Send,
        M: FnMut(&mut A, A),
    {
        let partials: Vec<A> = self.install(|| {
            (0..self.count)
                .into_par_iter()
                .map(|worker| {
                    let mut acc = init();
                    fold(&mut acc, self.partition(items, worker));
                    acc
                })
                .collect()
        });

        let mut total = init();
        for partial in partials {
            merge(&mut total, partial);
        }
        total
    }

    /// Pair up `input` and `output` partitions and process each pair on its
    /// own worker. Both slices are split at the same boundaries.
    pub fn for_each_partition_mut<T, U, F>(&self, input: &[T], output: &mut [U], op: F)
    where
        T: Sync,
        U: Send,
        F: Fn(&[T], &mut [U]) + Sync + Send,
    {
        let chunk = self.partition_len(input.len());
        self.install(|| {
            output
                .par_chunks_mut(chunk)
                .zip(input.par_chunks(chunk))
                .for_each(|(dst, src)| op(src, dst));
        });
    }
}

impl std::fmt::Debug for Workers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workers").field("count", &self.count).finish()
    }
}
