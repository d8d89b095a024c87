//! Basic usage examples for fixed-bloom

use fixed_bloom::{BloomFilter, ConcurrentBloomFilter, FlagSlots, Verdict};
use std::sync::Arc;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fixed Bloom Examples ===\n");

    // Example 1: Basic Bloom Filter
    println!("1. Basic Bloom Filter:");
    let mut bloom = BloomFilter::new(1000)?;

    let members = ["apple", "banana", "cherry", "damson", "elderberry"];
    for item in &members {
        bloom.add(item.as_bytes());
    }

    for item in &members {
        println!("  {} in filter: {}", item, bloom.contains(item.as_bytes()));
    }

    // Negative verdicts say which hash function found an unset slot
    for item in &["fig", "grape", "kiwi"] {
        match bloom.query(item.as_bytes()) {
            Verdict::Absent { hash_index, slot } => {
                println!("  {} absent (hash {} -> slot {} unset)", item, hash_index, slot)
            }
            Verdict::PossiblyPresent => println!("  {} possibly present", item),
        }
    }

    println!("  {}", bloom.stats());
    println!();

    // Example 2: One flag per slot
    println!("2. Flag storage:");
    let mut flags = BloomFilter::<FlagSlots>::with_storage(1000)?;
    for item in &members {
        flags.add(item.as_bytes());
    }
    println!("  {}", flags.stats());
    println!();

    // Example 3: Shared between threads
    println!("3. Concurrent filter:");
    let shared = Arc::new(ConcurrentBloomFilter::new(10_000)?);
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..100 {
                    shared.add(format!("worker{}-{}", t, i).as_bytes());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "worker panicked")?;
    }
    println!(
        "  {} keys added, load factor {:.3}, worker0-7 present: {}",
        shared.len(),
        shared.load_factor(),
        shared.contains(b"worker0-7")
    );

    Ok(())
}
