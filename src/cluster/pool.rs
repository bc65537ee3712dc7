//! Fixed-size worker pool with submit-and-barrier semantics.

use std::num::NonZeroUsize;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{Error, Result};

/// A reusable pool of worker threads.
///
/// Built once per fit and reused by every iteration. [`WorkerPool::scatter`]
/// blocks until every submitted task has finished.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Build a pool with `num_workers` threads, or one per available
    /// processor when `None`.
    pub fn new(num_workers: Option<usize>) -> Result<Self> {
        let workers = match num_workers {
            Some(0) => {
                return Err(Error::InvalidParameter {
                    name: "num_workers",
                    message: "must be at least 1",
                })
            }
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("cleave-worker-{i}"))
            .build()?;

        debug!(workers, "worker pool ready");
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `work` once per task on the pool and wait for all of them.
    pub fn scatter<T, F>(&self, tasks: Vec<T>, work: F)
    where
        T: Send,
        F: Fn(T) + Sync,
    {
        let work = &work;
        self.pool.scope(move |scope| {
            for task in tasks {
                scope.spawn(move |_| work(task));
            }
        });
    }
}
