use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};

/// Parallel executor using crossbeam scoped worker threads.
///
/// Work items are tagged with their input position so results come back
/// in input order regardless of which worker finished first.
pub struct ParallelExecutor {
    max_workers: usize,
    buffer_size: usize,
}

impl ParallelExecutor {
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            buffer_size: max_workers * 2,
        }
    }

    /// Run `processor` over every item; `processor` receives the item and the worker id
    pub fn execute<T, R, F>(&self, work_items: Vec<T>, processor: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(&T, usize) -> R + Sync,
    {
        if work_items.is_empty() {
            return Ok(Vec::new());
        }

        let total_items = work_items.len();
        let actual_workers = std::cmp::min(self.max_workers, total_items);
        let (work_tx, work_rx): (Sender<(usize, T)>, Receiver<(usize, T)>) =
            bounded(self.buffer_size);
        let (result_tx, result_rx): (Sender<(usize, R)>, Receiver<(usize, R)>) =
            bounded(self.buffer_size);

        let processor = &processor;

        crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();

                s.spawn(move |_| {
                    while let Ok((index, item)) = work_rx.recv() {
                        let result = processor(&item, worker_id);
                        if result_tx.send((index, result)).is_err() {
                            break; // Collector dropped
                        }
                    }
                    tracing::trace!(worker_id, "worker finished");
                });
            }

            // Producer: feed indexed work to the workers
            s.spawn(move |_| {
                for indexed in work_items.into_iter().enumerate() {
                    if work_tx.send(indexed).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Drop our copies so the channels close once workers finish
            drop(work_rx);
            drop(result_tx);

            collect_in_order(result_rx, total_items)
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel execution"))
    }
}

fn collect_in_order<R>(result_rx: Receiver<(usize, R)>, total_items: usize) -> Vec<R> {
    let mut indexed: Vec<(usize, R)> = Vec::with_capacity(total_items);
    while let Ok(result) = result_rx.recv() {
        indexed.push(result);
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, result)| result).collect()
}

/// Sequential executor - same contract as [`ParallelExecutor`] on the calling thread
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<T, R, F>(work_items: Vec<T>, processor: F) -> Vec<R>
    where
        F: Fn(&T, usize) -> R,
    {
        work_items.iter().map(|item| processor(item, 0)).collect()
    }
}

/// How a batch of work is executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    pub fn execute<T, R, F>(&self, work_items: Vec<T>, processor: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(&T, usize) -> R + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => {
                Ok(SequentialExecutor::execute(work_items, processor))
            }
            ExecutionStrategy::Parallel { workers } => {
                ParallelExecutor::new(*workers).execute(work_items, processor)
            }
        }
    }

    /// Parallel once the workload reaches `min_items_for_parallel`, sequential below it
    pub fn auto(
        work_items_count: usize,
        min_items_for_parallel: usize,
        optimal_workers: usize,
    ) -> Self {
        if work_items_count >= min_items_for_parallel && optimal_workers > 1 {
            ExecutionStrategy::Parallel {
                workers: optimal_workers,
            }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Worker count from available cores, a percentage of them, and an optional cap
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();

        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        // 0 means no cap
        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }

    pub fn worker_count(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { workers } => *workers,
        }
    }
}
