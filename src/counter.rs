//! Runs one scoped thread per partition against a shared table.

use log::{error, info, warn};

use crate::count_table::{CountSink, Table, DEFAULT_ROWS};
use crate::error::CountError;
use crate::partition::{effective_workers, partition};
use crate::scanner::{scan_partition, ScanStats, WordClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountConfig {
    pub workers: usize,
    pub rows: u32,
    pub word_class: WordClass,
}

impl Default for CountConfig {
    fn default() -> Self {
        CountConfig {
            workers: 1,
            rows: DEFAULT_ROWS,
            word_class: WordClass::default(),
        }
    }
}

#[derive(Debug)]
pub struct WorkerFailure {
    pub worker: usize,
    pub error: CountError,
}

/// What every worker reported after the join.
#[derive(Debug, Default)]
pub struct CountOutcome {
    pub stats: Vec<ScanStats>,
    pub failures: Vec<WorkerFailure>,
}

impl CountOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn words(&self) -> u64 {
        self.stats.iter().map(|s| s.words).sum()
    }

    /// Turns any worker failure into `CountError::Incomplete`, carrying the
    /// failure of the lowest numbered worker.
    pub fn into_result(self) -> Result<Vec<ScanStats>, CountError> {
        let failed = self.failures.len();
        match self.failures.into_iter().min_by_key(|f| f.worker) {
            None => Ok(self.stats),
            Some(first) => Err(CountError::Incomplete {
                failed,
                first: Box::new(first.error),
            }),
        }
    }
}

/// Scans `buffer` with `workers` threads, all writing into `sink`.
///
/// Every worker runs to completion or to its first error; a failing worker
/// does not stop the others. Failures are collected after the join.
pub fn count_into<S>(buffer: &[u8], workers: usize, sink: &S, class: WordClass) -> CountOutcome
where
    S: CountSink + ?Sized,
{
    let partitions = partition(buffer.len(), workers);
    let mut outcome = CountOutcome::default();

    let joined = crossbeam::scope(|scope| {
        let handles: Vec<_> = partitions
            .iter()
            .map(|part| {
                let handle = scope.spawn(move |_| scan_partition(buffer, part, sink, class));
                (part.id, handle)
            })
            .collect();

        for (worker, handle) in handles {
            match handle.join() {
                Ok(Ok(stats)) => outcome.stats.push(stats),
                Ok(Err(err)) => {
                    error!("worker {} failed to count, stopping it: {}", worker, err);
                    outcome.failures.push(WorkerFailure { worker, error: err });
                }
                Err(_) => {
                    error!("worker {} panicked", worker);
                    outcome.failures.push(WorkerFailure {
                        worker,
                        error: CountError::WorkerPanicked { worker },
                    });
                }
            }
        }
    });

    // every handle was joined above, so the scope itself has nothing left to report
    debug_assert!(joined.is_ok());

    outcome
}

/// Counts all words of `buffer` into a fresh table.
///
/// Fails if the buffer is empty, the table can't be built, or any worker
/// stopped early.
pub fn count_words(buffer: &[u8], config: &CountConfig) -> Result<Table, CountError> {
    if buffer.is_empty() {
        return Err(CountError::EmptyInput);
    }

    let workers = effective_workers(buffer.len(), config.workers);
    if workers != config.workers {
        warn!(
            "{} worker(s) requested for {} bytes of input, using {}",
            config.workers,
            buffer.len(),
            workers
        );
    }

    let table = Table::new(config.rows)?;
    let outcome = count_into(buffer, workers, &table, config.word_class);
    let stats = outcome.into_result()?;

    info!(
        "counted {} words with {} worker(s) into {} rows",
        stats.iter().map(|s| s.words).sum::<u64>(),
        stats.len(),
        table.row_count()
    );

    Ok(table)
}
