//! Parallel task runner for per-file tool invocations
//!
//! A fixed set of worker threads pulls items from a bounded FIFO channel,
//! applies a caller-supplied action to each, and sends the classified outcome
//! to a single collecting consumer. The collector folds outcomes into a
//! [`RunReport`] which the caller maps to a process exit code.
//!
//! Workers never abort on a failing item: launch failures and non-zero exits
//! are classified into the report, so one broken file cannot hang the run or
//! starve the remaining queue.

use anyhow::Result;
use crossbeam::channel::{Receiver, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Classified result of running the external tool against one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Tool ran cleanly and reported nothing actionable.
    Clean,
    /// Tool ran cleanly but the item needs action (formatting diff, warning).
    Flagged,
    /// Tool could not be launched or exited non-zero.
    Failed {
        /// Full command line, for the failure summary.
        command: String,
    },
}

/// Aggregated outcomes of one run, append-only while the run is in flight.
#[derive(Debug)]
pub struct RunReport<T> {
    /// Command lines that could not be launched or exited non-zero.
    pub failed_commands: Vec<String>,
    /// Items the tool flagged as needing action.
    pub flagged_items: Vec<T>,
    /// Total number of items classified.
    pub processed: usize,
}

impl<T> RunReport<T> {
    pub fn empty() -> Self {
        Self {
            failed_commands: Vec::new(),
            flagged_items: Vec::new(),
            processed: 0,
        }
    }

    fn record(&mut self, item: T, outcome: TaskOutcome) {
        self.processed += 1;
        match outcome {
            TaskOutcome::Clean => {}
            TaskOutcome::Flagged => self.flagged_items.push(item),
            TaskOutcome::Failed { command } => self.failed_commands.push(command),
        }
    }

    /// Map the aggregate to the final run verdict. Any hard failure outranks
    /// flagged items; an empty report is a success.
    pub fn verdict(&self) -> Verdict {
        if !self.failed_commands.is_empty() {
            Verdict::ToolFailure
        } else if !self.flagged_items.is_empty() {
            Verdict::NeedsAttention
        } else {
            Verdict::Clean
        }
    }
}

/// Final classification of a whole run, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    /// Every item clean.
    Clean,
    /// At least one flagged item, no hard failures.
    NeedsAttention,
    /// At least one command failed to launch or exited non-zero.
    ToolFailure,
}

impl Verdict {
    /// Process exit code: 0 clean, 1 needs attention, 2 tool failure.
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Clean => 0,
            Verdict::NeedsAttention => 1,
            Verdict::ToolFailure => 2,
        }
    }

    /// Combine with another verdict, keeping the worse of the two.
    pub fn worst(self, other: Verdict) -> Verdict {
        self.max(other)
    }
}

/// Bounded-concurrency runner for slow, fallible per-item commands.
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with the requested concurrency; 0 means one worker per
    /// available CPU.
    pub fn new(requested: usize) -> Self {
        let workers = if requested == 0 {
            num_cpus::get().max(1)
        } else {
            requested
        };
        Self { workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `action` against every item and collect the classified outcomes.
    ///
    /// Items are distributed over a bounded FIFO channel; ordering of entries
    /// in the report depends on completion timing and carries no meaning.
    /// The call returns once every item has been classified exactly once.
    pub fn run<T, F>(&self, items: Vec<T>, action: F) -> Result<RunReport<T>>
    where
        T: Send,
        F: Fn(&T) -> TaskOutcome + Send + Sync,
    {
        let total = items.len();
        if total == 0 {
            return Ok(RunReport::empty());
        }

        // No point spinning up more workers than items.
        let workers = self.workers.min(total);
        let (work_tx, work_rx) = bounded::<T>(workers * 2);
        let (result_tx, result_rx) = bounded::<(T, TaskOutcome)>(workers * 2);
        let progress = Arc::new(AtomicUsize::new(0));
        let action = &action;

        crossbeam::thread::scope(|s| -> Result<RunReport<T>> {
            // Worker threads: dequeue, classify, report. The action call
            // happens outside any lock so tool processes truly overlap.
            for worker_id in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let progress = progress.clone();

                s.spawn(move |_| {
                    while let Ok(item) = work_rx.recv() {
                        let outcome = action(&item);
                        let current = progress.fetch_add(1, Ordering::Relaxed) + 1;
                        tracing::debug!(worker = worker_id, current, total, "task finished");

                        if result_tx.send((item, outcome)).is_err() {
                            break; // Collector gone
                        }
                    }
                });
            }

            // Producer: feed the queue, then close it by dropping the sender
            // so idle workers unblock once the queue drains.
            s.spawn(move |_| {
                for item in items {
                    if work_tx.send(item).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Drop the originals so only live threads hold channel ends.
            drop(work_rx);
            drop(result_tx);

            Ok(collect(result_rx, total))
        })
        .map_err(|_| anyhow::anyhow!("Worker thread panicked during parallel run"))?
    }
}

/// Fold worker outcomes into the report, stopping once every item is
/// accounted for.
fn collect<T>(result_rx: Receiver<(T, TaskOutcome)>, total: usize) -> RunReport<T> {
    let mut report = RunReport::empty();

    while let Ok((item, outcome)) = result_rx.recv() {
        report.record(item, outcome);
        if report.processed >= total {
            break;
        }
    }

    report
}
