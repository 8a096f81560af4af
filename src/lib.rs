pub mod logging;
pub mod util;
pub mod error;

pub mod count_table;
pub mod partition;
pub mod scanner;
pub mod counter;
pub mod collect;
mod chain_stats;
pub use crate::chain_stats::ChainStats;

pub use crate::collect::{collect, sort_pairs, write_counts};
pub use crate::count_table::{one_at_a_time, Count, CountSink, KeyValue, Table};
pub use crate::counter::{count_into, count_words, CountConfig, CountOutcome};
pub use crate::error::{ConfigError, CountError};
pub use crate::partition::{effective_workers, partition, Partition};
pub use crate::scanner::{scan_partition, words, ScanStats, WordClass};
