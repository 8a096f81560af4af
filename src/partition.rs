/// Inclusive byte range `[start, end]` handed to one worker. `last` is the
/// final index of the whole buffer, a worker may read up to it to finish a
/// word that crosses `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    pub last: usize,
}

impl Partition {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Number of workers actually used for a buffer of `len` bytes.
///
/// Every worker gets at least one byte, so the request is clamped to
/// `[1, len]`.
pub fn effective_workers(len: usize, requested: usize) -> usize {
    if len == 0 {
        return 0;
    }
    requested.clamp(1, len)
}

/// Splits `[0, len - 1]` into contiguous ranges of `len / n` bytes, the last
/// one taking the remainder.
pub fn partition(len: usize, requested: usize) -> Vec<Partition> {
    let workers = effective_workers(len, requested);
    if workers == 0 {
        return Vec::new();
    }

    let last = len - 1;
    let chunk = len / workers;
    let mut partitions = Vec::with_capacity(workers);
    let mut start = 0;

    for id in 0..workers {
        let end = if id == workers - 1 {
            last
        } else {
            start + chunk - 1
        };
        partitions.push(Partition {
            id,
            start,
            end,
            last,
        });
        start = end + 1;
    }

    partitions
}
