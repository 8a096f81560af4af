use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::process::exit;

use argparse::{ArgumentParser, Print, Store, StoreOption};
use libc::{getrusage, rusage, RUSAGE_SELF};
use log::LevelFilter;

use crate::count_table::DEFAULT_ROWS;
use crate::counter::CountConfig;
use crate::error::{ConfigError, CountError};
use crate::scanner::WordClass;

pub fn get_cputime_usecs() -> (u64, u64) {
    // all fields are plain integers, zero is a valid value for each of them
    let mut usage: rusage = unsafe { std::mem::zeroed() };

    unsafe {
        getrusage(RUSAGE_SELF, &mut usage as *mut rusage);
    }

    let u_time = (usage.ru_utime.tv_sec as u64 * 1_000_000) + usage.ru_utime.tv_usec as u64;
    let s_time = (usage.ru_stime.tv_sec as u64 * 1_000_000) + usage.ru_stime.tv_usec as u64;

    (u_time, s_time)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: String,
    pub threads: i64,
    pub output: Option<String>,
    pub rows: u32,
    pub word_class: String,
    pub log_stream: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: String::new(),
            threads: 1,
            output: None,
            rows: DEFAULT_ROWS,
            word_class: "alnum".to_owned(),
            log_stream: "-".to_owned(),
            log_level: "warn".to_owned(),
        }
    }
}

impl Config {
    pub fn count_config(&self) -> Result<CountConfig, ConfigError> {
        if self.threads <= 0 {
            return Err(ConfigError::InvalidThreads(self.threads));
        }
        if self.rows == 0 {
            return Err(ConfigError::InvalidRows(self.rows));
        }
        let word_class: WordClass = self.word_class.parse().map_err(ConfigError::WordClass)?;

        Ok(CountConfig {
            workers: usize::try_from(self.threads).unwrap_or(usize::MAX),
            rows: self.rows,
            word_class,
        })
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

pub fn parse_args_from(
    description: &str,
    args: Vec<String>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<Config, i32> {
    let mut conf = Config::default();

    {
        // this block limits scope of borrows by ap.refer() method
        let mut ap = ArgumentParser::new();

        ap.set_description(description);
        ap.add_option(
            &["-V", "--version"],
            Print(env!("CARGO_PKG_VERSION").to_string()),
            "Show version",
        );

        ap.refer(&mut conf.input)
            .add_argument("input", Store, "input file")
            .required();

        ap.refer(&mut conf.threads)
            .add_argument("num_threads", Store, "number of counting threads")
            .required();

        ap.refer(&mut conf.output).add_option(
            &["-o", "--output"],
            StoreOption,
            "output file - default: stdout",
        );

        ap.refer(&mut conf.rows).add_option(
            &["-r", "--rows"],
            Store,
            "rows of the count table - default: 5000",
        );

        ap.refer(&mut conf.word_class).add_option(
            &["-w", "--words"],
            Store,
            "word characters: alnum or nonspace - default: alnum",
        );

        ap.refer(&mut conf.log_stream).add_option(
            &["--log"],
            Store,
            "log file, - for stderr - default: -",
        );

        ap.refer(&mut conf.log_level).add_option(
            &["--log-level"],
            Store,
            "off, error, warn, info, debug or trace - default: warn",
        );

        ap.parse(args, stdout, stderr)?;
    }

    Ok(conf)
}

pub fn parse_args(description: &str) -> Config {
    let args = std::env::args().collect();
    match parse_args_from(description, args, &mut io::stdout(), &mut io::stderr()) {
        Ok(conf) => conf,
        Err(code) => exit(code),
    }
}

/// Reads the whole input file into memory. An empty file is an error.
pub fn load_input(filename: &str) -> Result<Vec<u8>, CountError> {
    let mut buffer = Vec::new();
    File::open(filename)?.read_to_end(&mut buffer)?;
    if buffer.is_empty() {
        return Err(CountError::EmptyInput);
    }
    Ok(buffer)
}

pub fn open_output(conf: &Config) -> io::Result<Box<dyn Write>> {
    let output: Box<dyn Write> = match &conf.output {
        None => Box::new(BufWriter::new(io::stdout())),
        Some(filename) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(filename)?;
            Box::new(BufWriter::new(file))
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, i32> {
        let args = std::iter::once("wc-chash")
            .chain(args.iter().copied())
            .map(str::to_owned)
            .collect();
        parse_args_from("test", args, &mut io::sink(), &mut io::sink())
    }

    #[test]
    fn positional_arguments() {
        let conf = parse(&["words.txt", "4"]).unwrap();
        assert_eq!(conf.input, "words.txt");
        assert_eq!(conf.threads, 4);
        assert_eq!(conf.rows, DEFAULT_ROWS);
        assert_eq!(conf.output, None);

        let count = conf.count_config().unwrap();
        assert_eq!(count.workers, 4);
        assert_eq!(count.word_class, WordClass::AsciiAlphanumeric);
    }

    #[test]
    fn options() {
        let conf = parse(&["-r", "17", "-w", "nonspace", "-o", "out.txt", "in.txt", "2"]).unwrap();
        assert_eq!(conf.rows, 17);
        assert_eq!(conf.output.as_deref(), Some("out.txt"));
        assert_eq!(conf.count_config().unwrap().word_class, WordClass::NonWhitespace);
    }

    #[test]
    fn missing_thread_count_is_a_usage_error() {
        assert!(parse(&["in.txt"]).is_err());
    }

    #[test]
    fn thread_count_must_be_positive() {
        let conf = Config {
            threads: 0,
            ..Config::default()
        };
        assert_eq!(conf.count_config(), Err(ConfigError::InvalidThreads(0)));
    }

    #[test]
    fn rows_must_be_positive() {
        let conf = Config {
            rows: 0,
            ..Config::default()
        };
        assert_eq!(conf.count_config(), Err(ConfigError::InvalidRows(0)));
    }

    #[test]
    fn unknown_word_class() {
        let conf = Config {
            word_class: "locale".to_owned(),
            ..Config::default()
        };
        assert!(matches!(conf.count_config(), Err(ConfigError::WordClass(_))));
    }

    #[test]
    fn log_levels() {
        let mut conf = Config::default();
        assert_eq!(conf.level_filter(), Ok(LevelFilter::Warn));
        conf.log_level = "loud".to_owned();
        assert!(conf.level_filter().is_err());
    }

    #[test]
    fn load_input_rejects_empty_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(
            load_input(empty.to_str().unwrap()),
            Err(CountError::EmptyInput)
        ));

        let missing = dir.path().join("missing.txt");
        assert!(matches!(
            load_input(missing.to_str().unwrap()),
            Err(CountError::Io(_))
        ));
    }

    #[test]
    fn cputime_is_monotonic() {
        let (usr_a, sys_a) = get_cputime_usecs();
        let mut x = 0u64;
        for i in 0..100_000u64 {
            x = x.wrapping_add(i * i);
        }
        assert!(x > 0);
        let (usr_b, sys_b) = get_cputime_usecs();
        assert!(usr_b >= usr_a);
        assert!(sys_b >= sys_a);
    }
}
