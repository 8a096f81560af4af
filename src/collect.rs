use std::io::{self, Write};

use crate::count_table::{KeyValue, Table};

/// Drains the table into an unordered list of pairs. The table is dropped
/// afterwards; the keys stay alive through the returned pairs.
pub fn collect(mut table: Table) -> Vec<KeyValue> {
    table.enumerate()
}

/// Byte-wise key order, so `Zebra` sorts before `apple`.
pub fn sort_pairs(pairs: &mut [KeyValue]) {
    pairs.sort_unstable_by(|a, b| a.key.cmp(&b.key));
}

pub fn write_counts<W: Write>(out: &mut W, pairs: &[KeyValue]) -> io::Result<()> {
    for pair in pairs {
        out.write_all(&pair.key)?;
        writeln!(out, "={}", pair.count)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn kv(key: &'static str, count: u32) -> KeyValue {
        KeyValue {
            key: Bytes::from_static(key.as_bytes()),
            count,
        }
    }

    #[test]
    fn collect_returns_every_entry() {
        let table = Table::new(2).unwrap();
        for word in ["b", "a", "b", "c", "b"] {
            table.increment_or_insert(word.as_bytes()).unwrap();
        }
        let mut pairs = collect(table);
        sort_pairs(&mut pairs);
        assert_eq!(pairs, vec![kv("a", 1), kv("b", 3), kv("c", 1)]);
    }

    #[test]
    fn uppercase_sorts_first() {
        let mut pairs = vec![kv("apple", 1), kv("Zebra", 2), kv("app", 3), kv("10", 4)];
        sort_pairs(&mut pairs);
        let keys: Vec<&[u8]> = pairs.iter().map(|p| &p.key[..]).collect();
        assert_eq!(keys, vec![&b"10"[..], &b"Zebra"[..], &b"app"[..], &b"apple"[..]]);
    }

    #[test]
    fn renders_key_equals_count() {
        let mut out = Vec::new();
        write_counts(&mut out, &[kv("abc", 2), kv("hello", 1)]).unwrap();
        assert_eq!(out, b"abc=2\nhello=1\n");
    }

    #[test]
    fn empty_list_writes_nothing() {
        let mut out = Vec::new();
        write_counts(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }
}
