//! Sparse encoding benchmark on a synthetic corpus
//! Measures batch encoding throughput and in-memory query QPS
//!
//! Usage: cargo bench --bench encode_batch

use std::time::Instant;
use sparsedb_core::sparse::SparseEncoder;
use sparsedb_core::store::{Chunk, MemoryIndex, VectorStore};

const NUM_DOCS: usize = 20_000;
const WORDS_PER_DOC: usize = 120;
const LEXICON_SIZE: usize = 30_000;
const NUM_QUERIES: usize = 1_000;

/// Deterministic xorshift so runs are comparable without a rand dependency.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Zipf-ish skew: small ranks are drawn much more often.
    fn word_rank(&mut self) -> usize {
        let u = (self.next() % 1_000_000) as f64 / 1_000_000.0;
        ((LEXICON_SIZE as f64).powf(u) as usize).min(LEXICON_SIZE - 1)
    }
}

fn word(rank: usize) -> String {
    let mut s = String::from("w");
    let mut r = rank;
    loop {
        s.push((b'a' + (r % 26) as u8) as char);
        r /= 26;
        if r == 0 {
            break;
        }
    }
    s
}

fn main() {
    println!("=== Sparse Encoding Benchmark (synthetic) ===");
    println!();

    let mut rng = XorShift(0x5eed_1234_abcd_ef01);
    let docs: Vec<String> = (0..NUM_DOCS)
        .map(|_| {
            (0..WORDS_PER_DOC)
                .map(|_| word(rng.word_rank()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    println!("Corpus: {NUM_DOCS} docs x {WORDS_PER_DOC} words, lexicon {LEXICON_SIZE}");

    println!();
    println!("--- Batch Encoding ---");
    for &batch in &[100usize, 1_000, NUM_DOCS] {
        let mut encoder = SparseEncoder::new();
        let t0 = Instant::now();
        let mut nnz = 0usize;
        for slice in docs.chunks(batch) {
            nnz += encoder.encode_batch(slice).iter().map(|v| v.nnz()).sum::<usize>();
        }
        let elapsed = t0.elapsed();
        println!(
            "batch={:>6}: {:.3}s ({:.0} docs/s), avg nnz {:.1}, vocabulary {}",
            batch,
            elapsed.as_secs_f64(),
            NUM_DOCS as f64 / elapsed.as_secs_f64(),
            nnz as f64 / NUM_DOCS as f64,
            encoder.vocabulary().len()
        );
    }

    println!();
    println!("--- Upload + Query (MemoryIndex) ---");
    let store = VectorStore::new(MemoryIndex::new());
    let chunks: Vec<Chunk> = docs
        .iter()
        .enumerate()
        .map(|(i, text)| Chunk::new(text.clone(), Some(i as i64 / 3 + 1), None))
        .collect();
    let t0 = Instant::now();
    let written = store.upload_chunks(&chunks, "bench", 50).unwrap();
    println!(
        "Uploaded {written} records in {:.3}s",
        t0.elapsed().as_secs_f64()
    );

    let queries: Vec<String> = (0..NUM_QUERIES)
        .map(|_| (0..3).map(|_| word(rng.word_rank())).collect::<Vec<_>>().join(" "))
        .collect();
    for &k in &[3usize, 10] {
        let t0 = Instant::now();
        let mut hits = 0usize;
        for q in &queries {
            hits += store.similarity_search(q, "bench", k).unwrap().len();
        }
        let elapsed = t0.elapsed();
        println!(
            "k={:>2}: {:.0} QPS, avg hits {:.2}",
            k,
            NUM_QUERIES as f64 / elapsed.as_secs_f64(),
            hits as f64 / NUM_QUERIES as f64
        );
    }
}
