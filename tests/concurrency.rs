// Many threads hammering the same rows of one table.

use std::sync::Barrier;

use chash_word_count::{collect, count_words, CountConfig, Table};

#[test]
fn same_key_from_every_thread() {
    const THREADS: usize = 16;
    const ROUNDS: u32 = 5_000;

    let table = Table::new(1).unwrap();
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                for _ in 0..ROUNDS {
                    table.increment_or_insert(b"x").unwrap();
                }
            });
        }
    });

    assert_eq!(table.get(b"x"), Some(THREADS as u32 * ROUNDS));
}

#[test]
fn racing_first_inserts_create_one_entry() {
    const THREADS: usize = 8;

    for _ in 0..200 {
        let table = Table::new(4).unwrap();
        let barrier = Barrier::new(THREADS);

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    barrier.wait();
                    table.increment_or_insert(b"fresh").unwrap();
                });
            }
        });

        let pairs = collect(table);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].count, THREADS as u32);
    }
}

#[test]
fn one_word_per_partition() {
    // "x " repeated: with chunks of two bytes every worker owns exactly one "x"
    for workers in [1usize, 2, 4, 16, 64] {
        let text = b"x ".repeat(workers);
        let config = CountConfig {
            workers,
            rows: 3,
            ..CountConfig::default()
        };
        let table = count_words(&text, &config).unwrap();
        assert_eq!(table.get(b"x"), Some(workers as u32));
    }
}

#[test]
fn large_text_many_workers() {
    let vocabulary: Vec<String> = (0..500).map(|i| format!("w{}", i)).collect();
    let mut text = Vec::new();
    for round in 0..40 {
        for (i, word) in vocabulary.iter().enumerate() {
            if i % 3 == round % 3 {
                text.extend_from_slice(b"\t");
            }
            text.extend_from_slice(word.as_bytes());
            text.push(if i % 7 == 0 { b'\n' } else { b' ' });
        }
    }

    let config = CountConfig {
        workers: 12,
        rows: 97,
        ..CountConfig::default()
    };
    let mut table = count_words(&text, &config).unwrap();
    assert_eq!(table.len(), vocabulary.len());
    for word in &vocabulary {
        assert_eq!(table.get(word.as_bytes()), Some(40), "{}", word);
    }
}
