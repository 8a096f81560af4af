use std::str::FromStr;

use log::{debug, trace};

use crate::count_table::CountSink;
use crate::error::CountError;
use crate::partition::Partition;

/// Which bytes make up a word. Everything else separates words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordClass {
    /// `[0-9A-Za-z]`, what `isalnum` accepts in the C locale.
    #[default]
    AsciiAlphanumeric,
    /// Any byte that is not ASCII whitespace.
    NonWhitespace,
}

impl WordClass {
    #[inline]
    pub fn is_word_byte(self, byte: u8) -> bool {
        match self {
            WordClass::AsciiAlphanumeric => byte.is_ascii_alphanumeric(),
            WordClass::NonWhitespace => !byte.is_ascii_whitespace(),
        }
    }
}

impl FromStr for WordClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alnum" => Ok(WordClass::AsciiAlphanumeric),
            "nonspace" => Ok(WordClass::NonWhitespace),
            other => Err(format!(
                "unknown word class \"{}\" (expected alnum or nonspace)",
                other
            )),
        }
    }
}

/// Single threaded word split, the reference the partitioned scan must agree with.
pub fn words(buffer: &[u8], class: WordClass) -> impl Iterator<Item = &[u8]> + '_ {
    buffer
        .split(move |byte| !class.is_word_byte(*byte))
        .filter(|word| !word.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub partition: usize,
    /// First index scanned after skipping a word owned by the previous worker.
    pub start: usize,
    /// One past the last index scanned.
    pub stop: usize,
    pub words: u64,
}

/// Counts every word that starts inside `part` into `sink`.
///
/// A word running into `part` from the left belongs to the previous worker
/// and is skipped. A word that starts inside `part` but crosses `part.end`
/// is followed to its end, at most to `part.last`.
pub fn scan_partition<S>(
    buffer: &[u8],
    part: &Partition,
    sink: &S,
    class: WordClass,
) -> Result<ScanStats, CountError>
where
    S: CountSink + ?Sized,
{
    if part.start > part.end || part.end > part.last || part.last >= buffer.len() {
        return Err(CountError::InvalidPartition {
            id: part.id,
            start: part.start,
            end: part.end,
            len: buffer.len(),
        });
    }

    let text = &buffer[..=part.last];
    let is_word = |byte: u8| class.is_word_byte(byte);

    let mut start = part.start;
    if start != 0 && is_word(text[start]) && is_word(text[start - 1]) {
        while start <= part.end && is_word(text[start]) {
            start += 1;
        }
    }

    let mut stats = ScanStats {
        partition: part.id,
        start,
        stop: start,
        words: 0,
    };

    if start > part.end {
        debug!("worker {}: range lies inside a single word, nothing to do", part.id);
        return Ok(stats);
    }

    let mut word_start: Option<usize> = None;
    stats.stop = text.len();

    for (idx, &byte) in text.iter().enumerate().skip(start) {
        let byte_is_word = is_word(byte);
        match word_start {
            None if idx > part.end => {
                stats.stop = idx;
                break;
            }
            None if byte_is_word => word_start = Some(idx),
            Some(from) if !byte_is_word => {
                emit(sink, &text[from..idx], part.id, &mut stats)?;
                word_start = None;
            }
            _ => {}
        }
    }

    // still inside a word when the buffer ran out
    if let Some(from) = word_start {
        emit(sink, &text[from..], part.id, &mut stats)?;
    }

    debug!(
        "worker {}: [{}, {}] scanned [{}, {}) words {}",
        part.id, part.start, part.end, stats.start, stats.stop, stats.words
    );

    Ok(stats)
}

#[inline]
fn emit<S>(sink: &S, word: &[u8], worker: usize, stats: &mut ScanStats) -> Result<(), CountError>
where
    S: CountSink + ?Sized,
{
    trace!("worker {} found word: {}", worker, String::from_utf8_lossy(word));
    sink.record(word)?;
    stats.words += 1;
    Ok(())
}
