//! Fixed-size worker pool with a FIFO task queue.

use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    tasks: VecDeque<Task>,
    stop: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    condition: Condvar,
}

impl Shared {
    /// Task bodies never run under the lock, so a poisoned queue is still consistent.
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A pool of named worker threads pulling boxed tasks from a shared queue.
///
/// `stop` lets workers drain the queue and exit; tasks already queued still
/// run. Dropping the pool stops and joins it.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `size` workers (at least one).
    pub fn new(size: usize) -> io::Result<Self> {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                stop: false,
            }),
            condition: Condvar::new(),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(size),
        };
        for index in 0..size {
            let shared = Arc::clone(&pool.shared);
            // On failure, dropping `pool` stops and joins the workers spawned so far
            let handle = thread::Builder::new()
                .name(format!("lumen-worker-{index}"))
                .spawn(move || worker_loop(&shared))?;
            pool.workers.push(handle);
        }

        log::debug!("Started thread pool with {size} workers");
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a task and wake one idle worker.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.lock().tasks.push_back(Box::new(task));
        self.shared.condition.notify_one();
    }

    /// Ask every worker to exit once the queue is empty.
    pub fn stop(&self) {
        self.shared.lock().stop = true;
        self.shared.condition.notify_all();
    }

    /// Block until every worker has exited. Only returns after [`ThreadPool::stop`].
    pub fn join(&mut self) {
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("Worker thread exited with a panic");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut queue = shared.lock();
            loop {
                if let Some(task) = queue.tasks.pop_front() {
                    break task;
                }
                if queue.stop {
                    return;
                }
                queue = shared
                    .condition
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        // Lock released; a panicking task must not take the worker down with it
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            log::error!(
                "Task panicked on {}",
                thread::current().name().unwrap_or("unnamed worker")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn test_runs_every_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = ThreadPool::new(4).expect("spawn pool");
            assert_eq!(pool.size(), 4);
            for _ in 0..100 {
                let counter = Arc::clone(&counter);
                pool.enqueue(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            // Drop drains the queue before joining
        }
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_single_worker_is_fifo() {
        let (tx, rx) = mpsc::channel();
        let mut pool = ThreadPool::new(1).expect("spawn pool");
        for i in 0..20 {
            let tx = tx.clone();
            pool.enqueue(move || {
                let _ = tx.send(i);
            });
        }
        pool.stop();
        pool.join();
        drop(tx);

        let order: Vec<i32> = rx.iter().collect();
        assert_eq!(order, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_panicking_task_keeps_worker_alive() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (tx, rx) = mpsc::channel();
        let pool = ThreadPool::new(1).expect("spawn pool");

        pool.enqueue(|| panic!("task failure"));
        pool.enqueue(move || {
            let _ = tx.send("still running");
        });

        assert_eq!(rx.recv().ok(), Some("still running"));
    }

    #[test]
    fn test_zero_size_gets_one_worker() {
        let pool = ThreadPool::new(0).expect("spawn pool");
        assert_eq!(pool.size(), 1);
    }
}
