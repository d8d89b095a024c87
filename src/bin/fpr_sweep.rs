use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use fixed_bloom::storage::{FlagSlots, PackedSlots, SlotStorage};
use fixed_bloom::utils::{count_false_positives, theoretical_fpr};
use fixed_bloom::BloomFilter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Storage {
    Packed,
    Flags,
}

/// Measure the false positive rate of the filter across a range of capacities
#[derive(Parser, Debug)]
#[command(name = "fpr_sweep")]
struct Cli {
    /// Keys added to every filter
    #[arg(long, default_value_t = 500)]
    members: usize,
    /// Keys that are only queried
    #[arg(long, default_value_t = 500)]
    non_members: usize,
    /// First capacity tested
    #[arg(long, default_value_t = 1000)]
    start: usize,
    /// Capacity bound (exclusive)
    #[arg(long, default_value_t = 10_000)]
    end: usize,
    #[arg(long, default_value_t = 100)]
    step: usize,
    /// Seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = Storage::Packed)]
    storage: Storage,
}

/// Unique random UUID strings
fn generate_keys(rng: &mut StdRng, count: usize, taken: &mut HashSet<String>) -> Vec<String> {
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key = uuid::Builder::from_random_bytes(rng.gen())
            .into_uuid()
            .to_string();
        if taken.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

fn sweep<S: SlotStorage>(cli: &Cli, members: &[String], non_members: &[String]) -> Result<()> {
    println!("capacity,false_positives,fp_percent,theoretical_percent");

    for capacity in (cli.start..cli.end).step_by(cli.step) {
        let mut filter = BloomFilter::<S>::with_storage(capacity)
            .with_context(|| format!("creating filter with capacity {}", capacity))?;
        for key in members {
            filter.add(key.as_bytes());
        }

        let missed = members
            .iter()
            .filter(|key| !filter.contains(key.as_bytes()))
            .count();
        if missed > 0 {
            bail!("{} members reported absent at capacity {}", missed, capacity);
        }

        let false_positives = count_false_positives(&filter, non_members);
        let percent = if non_members.is_empty() {
            0.0
        } else {
            false_positives as f64 * 100.0 / non_members.len() as f64
        };
        let predicted = theoretical_fpr(capacity, members.len(), filter.num_hash_functions());

        println!(
            "{},{},{:.2},{:.2}",
            capacity,
            false_positives,
            percent,
            predicted * 100.0
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.step == 0 {
        bail!("--step must be > 0");
    }
    if cli.start == 0 || cli.start >= cli.end {
        bail!("capacity range {}..{} is empty or starts at 0", cli.start, cli.end);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut taken = HashSet::with_capacity(cli.members + cli.non_members);
    let members = generate_keys(&mut rng, cli.members, &mut taken);
    let non_members = generate_keys(&mut rng, cli.non_members, &mut taken);

    info!(
        members = members.len(),
        non_members = non_members.len(),
        start = cli.start,
        end = cli.end,
        step = cli.step,
        storage = ?cli.storage,
        "starting false positive sweep"
    );

    match cli.storage {
        Storage::Packed => sweep::<PackedSlots>(&cli, &members, &non_members)?,
        Storage::Flags => sweep::<FlagSlots>(&cli, &members, &non_members)?,
    }

    info!("sweep finished");
    Ok(())
}
