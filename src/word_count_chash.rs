// Counts words of a file with a fixed set of threads sharing one locked-row
// hash table, then prints `word=count` lines in byte order.

use std::process::exit;
use std::time::Instant;

use log::{debug, error, info};

use chash_word_count::logging::set_logger_or_exit;
use chash_word_count::util::*;
use chash_word_count::{collect, count_words, sort_pairs, write_counts, ChainStats};

fn main() {
    let conf = parse_args("word count with a shared concurrent hash table");

    let log_level = match conf.level_filter() {
        Ok(level) => level,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };
    set_logger_or_exit(&conf.log_stream, log_level);

    let count_conf = match conf.count_config() {
        Ok(count_conf) => count_conf,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    let text = match load_input(&conf.input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("can't read {}: {}", conf.input, err);
            exit(1);
        }
    };

    let (start_usr_time, start_sys_time) = get_cputime_usecs();
    let start_time = Instant::now();

    let mut table = match count_words(&text, &count_conf) {
        Ok(table) => table,
        Err(err) => {
            error!("{}", err);
            eprintln!("ERROR: {}", err);
            exit(1);
        }
    };

    if log::log_enabled!(log::Level::Debug) {
        debug!("chains: {}", ChainStats::from_lengths(&table.chain_lengths()));
        table.log_entries();
    }

    // the input buffer is no longer needed, keys are owned by the table
    drop(text);

    let mut pairs = collect(table);
    sort_pairs(&mut pairs);

    let written = open_output(&conf).and_then(|mut output| write_counts(&mut output, &pairs));
    if let Err(err) = written {
        eprintln!("can't write output: {}", err);
        exit(1);
    }

    let difference = start_time.elapsed();
    let (end_usr_time, end_sys_time) = get_cputime_usecs();
    let usr_time = end_usr_time.saturating_sub(start_usr_time) as f64 / 1_000_000.0;
    let sys_time = end_sys_time.saturating_sub(start_sys_time) as f64 / 1_000_000.0;
    info!(
        "{} distinct words, walltime: {:?} (usr: {:.3}s sys: {:.3}s)",
        pairs.len(),
        difference,
        usr_time,
        sys_time
    );
}
