//! 並列処理機能を提供するモジュール
//!
//! Two primitives back every parallel operator in the crate:
//!
//! * [`for_each_slot`] partitions `[0, n)` across the worker pool; task `i` owns
//!   output slot `i`, so results come back in slot order regardless of which
//!   worker finished first.
//! * [`spawn`] submits one task and returns a [`TaskHandle`] whose
//!   [`join`](TaskHandle::join) blocks for the task's result.
//!
//! Neither primitive recovers from failures: the caller scans the results at the
//! join point and aborts on the first error ([`try_collect`]).

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver};
use lazy_static::lazy_static;
use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Worker pool plus the dispatch settings it was built with
struct WorkerPool {
    /// `None` when the dedicated pool could not be built; rayon's global pool is used instead
    pool: Option<ThreadPool>,
    min_len: usize,
}

impl WorkerPool {
    fn build(config: &EngineConfig) -> Self {
        let threads = config.threading.effective_worker_threads();
        let pool = match ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("framekit-worker-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("cannot build a {}-thread worker pool ({}), using the global rayon pool", threads, e);
                None
            }
        };
        debug!("worker pool ready: {} threads", threads);
        Self {
            pool,
            min_len: config.threading.min_parallel_len.max(1),
        }
    }

    fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    fn spawn<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.pool {
            Some(pool) => pool.spawn(f),
            None => rayon::spawn(f),
        }
    }

    fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

lazy_static! {
    static ref WORKER_POOL: Mutex<Option<Arc<WorkerPool>>> = Mutex::new(None);
}

fn worker_pool() -> Arc<WorkerPool> {
    let mut guard = WORKER_POOL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guard
        .get_or_insert_with(|| {
            let config = EngineConfig::load().unwrap_or_else(|e| {
                warn!("invalid engine configuration ({}), using defaults", e);
                EngineConfig::default()
            });
            Arc::new(WorkerPool::build(&config))
        })
        .clone()
}

/// 明示的な設定でワーカープールを初期化する
///
/// Must run before the first parallel operation; afterwards the pool is fixed
/// and this fails with [`Error::Parallel`].
pub fn init(config: &EngineConfig) -> Result<()> {
    config.validate()?;
    let mut guard = WORKER_POOL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.is_some() {
        return Err(Error::Parallel(
            "worker pool is already initialized".to_string(),
        ));
    }
    *guard = Some(Arc::new(WorkerPool::build(config)));
    Ok(())
}

/// Number of threads operators fan out to
pub fn num_threads() -> usize {
    worker_pool().num_threads()
}

/// Runs `task(i)` for every `i` in `[0, n)` on the worker pool.
///
/// The returned vector is indexed by slot, not by completion order.
pub fn for_each_slot<T, F>(n: usize, task: F) -> Vec<Result<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Send + Sync,
{
    let pool = worker_pool();
    let min_len = pool.min_len;
    pool.install(|| {
        (0..n)
            .into_par_iter()
            .with_min_len(min_len)
            .map(|i| task(i))
            .collect()
    })
}

/// First error in slot order, or all values
pub fn try_collect<T>(slots: Vec<Result<T>>) -> Result<Vec<T>> {
    slots.into_iter().collect()
}

/// 非同期タスクのハンドル
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finishes; a panicked task is reported as [`Error::Parallel`]
    pub fn join(self) -> Result<T> {
        self.receiver
            .recv()
            .map_err(|_| Error::Parallel("task ended without a result".to_string()))?
    }
}

fn run_task<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    panic::catch_unwind(AssertUnwindSafe(task))
        .unwrap_or_else(|_| Err(Error::Parallel("task panicked".to_string())))
}

/// Submits `task` to the worker pool
///
/// Called from a thread that already belongs to a rayon pool, the task runs
/// inline before `spawn` returns: a worker blocked in [`TaskHandle::join`]
/// must never wait on a task queued behind itself.
pub fn spawn<T, F>(task: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (sender, receiver) = bounded(1);
    if rayon::current_thread_index().is_some() {
        let _ = sender.send(run_task(task));
        return TaskHandle { receiver };
    }
    worker_pool().spawn(move || {
        // The handle may have been dropped; the result is discarded then
        let _ = sender.send(run_task(task));
    });
    TaskHandle { receiver }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_keep_order() {
        let slots = for_each_slot(100, |i| Ok(i * 2));
        let values = try_collect(slots).unwrap();
        assert_eq!(values, (0..100).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_error_in_slot_order_wins() {
        let slots = for_each_slot(10, |i| {
            if i == 3 || i == 7 {
                Err(Error::InvalidInput(format!("slot {}", i)))
            } else {
                Ok(i)
            }
        });
        match try_collect(slots) {
            Err(Error::InvalidInput(msg)) => assert_eq!(msg, "slot 3"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_spawn_joins_in_submission_order() {
        let handles: Vec<_> = (0..8).map(|i| spawn(move || Ok(i + 1))).collect();
        let results: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_spawn_from_worker_thread() {
        let slots = for_each_slot(16, |i| spawn(move || Ok(i * 10)).join());
        let values = try_collect(slots).unwrap();
        assert_eq!(values, (0..16).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn test_spawn_inside_single_thread_pool() {
        let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let result = pool.install(|| {
            let handles: Vec<_> = (0..4).map(|i| spawn(move || Ok(i))).collect();
            handles.into_iter().map(TaskHandle::join).collect::<Result<Vec<_>>>()
        });
        assert_eq!(result.unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_panicking_task_reports_parallel_error() {
        let handle: TaskHandle<()> = spawn(|| panic!("boom"));
        assert!(matches!(handle.join(), Err(Error::Parallel(_))));
    }
}
