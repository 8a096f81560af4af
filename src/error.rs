use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CountError {
    #[error("table needs at least one row")]
    InvalidRowCount,

    #[error("refusing to count an empty key")]
    EmptyKey,

    #[error("input does not contain any data to count")]
    EmptyInput,

    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("partition {id} [{start}, {end}] does not fit a buffer of {len} bytes")]
    InvalidPartition {
        id: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    /// At least one worker stopped early, the table holds undercounts.
    #[error("{failed} worker(s) failed, counts are incomplete: {first}")]
    Incomplete {
        failed: usize,
        first: Box<CountError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid num_threads specified: {0}, must be in the range of 1 to {max}", max = usize::MAX)]
    InvalidThreads(i64),

    #[error("Invalid row count specified: {0}, must be at least 1")]
    InvalidRows(u32),

    #[error("{0}")]
    WordClass(String),

    #[error("unknown log level \"{0}\"")]
    LogLevel(String),
}
