use std::fmt;

/// Occupancy of the table rows, chain lengths binned by bit length.
///
/// Bin 0 holds empty rows, bin `i` rows with `2^(i-1) <= len < 2^i`.
pub struct ChainStats {
    rows: u64,
    entries: u64,
    longest: u64,
    hist: [u64; 65],
}

const BARS: &[char; 9] = &['_', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BARS_MAX: usize = 8;

impl ChainStats {
    pub fn new() -> Self {
        ChainStats {
            rows: 0,
            entries: 0,
            longest: 0,
            hist: [0; 65],
        }
    }

    pub fn from_lengths(lengths: &[usize]) -> Self {
        let mut stats = ChainStats::new();
        for &len in lengths {
            stats.add_row(len as u64);
        }
        stats
    }

    pub fn add_row(&mut self, len: u64) {
        self.rows += 1;
        self.entries += len;
        self.longest = self.longest.max(len);
        self.hist[(64 - len.leading_zeros()) as usize] += 1;
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn longest(&self) -> u64 {
        self.longest
    }

    pub fn empty_rows(&self) -> u64 {
        self.hist[0]
    }

    pub fn load_factor(&self) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        self.entries as f64 / self.rows as f64
    }

    fn sparkline(&self) -> String {
        let used = 65 - self.hist.iter().rev().take_while(|&&f| f == 0).count();
        let f_max = self.hist.iter().copied().max().unwrap_or(0);
        let log_f_max = 64 - f_max.leading_zeros() as i32;

        self.hist[..used]
            .iter()
            .map(|&f| {
                let log_f = 64 - f.leading_zeros() as i32;
                let b = if log_f_max > BARS_MAX as i32 {
                    log_f - (log_f_max - BARS_MAX as i32)
                } else {
                    log_f
                };
                if b < 0 {
                    if f > 0 {
                        '.'
                    } else {
                        ' '
                    }
                } else {
                    BARS[b as usize]
                }
            })
            .collect()
    }
}

impl Default for ChainStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows: {} entries: {} empty: {} load: {:.3} longest: {} |{}|",
            self.rows,
            self.entries,
            self.empty_rows(),
            self.load_factor(),
            self.longest,
            self.sparkline()
        )
    }
}

impl fmt::Debug for ChainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainStats")
            .field("rows", &self.rows)
            .field("entries", &self.entries)
            .field("longest", &self.longest)
            .field("hist", &format_args!("{}", self.sparkline()))
            .finish()
    }
}
