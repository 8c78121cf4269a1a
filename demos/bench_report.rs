//! Workbench report generator for the collision-resolution engines.
//!
//! Selected engine families are driven over a geometric ladder of corpus
//! sizes with a mixed insert/find/remove workload, and one
//! `size\tmean_time` table (mean nanoseconds per operation) is written per
//! engine/hasher combination under the output directory.
//!
//! ```text
//! cargo run --example bench_report --release -- chain linear quadratic doublehashing cuckoo
//! ```

use std::fs;
use std::fs::File;
use std::hash::BuildHasher;
use std::hint::black_box;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use clap::Parser;
use collide_hash::ChainingSet;
use collide_hash::CuckooSet;
use collide_hash::DoubleHashingSet;
use collide_hash::LinearSet;
use collide_hash::QuadraticSet;
use collide_hash::Set;
use collide_hash::probe::DoubleHashing;
use collide_hash::probe::Linear;
use collide_hash::probe::Quadratic;
use foldhash::fast::FixedState;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::seq::SliceRandom;
use rand_distr::Bernoulli;
use rand_distr::Distribution;
use siphasher::sip::SipHasher;
use siphasher::sip::SipHasher13;

#[derive(Parser, Debug)]
struct Args {
    /// Engine families to exercise: chain, linear, quadratic, doublehashing,
    /// cuckoo.
    #[arg(required = true)]
    families: Vec<String>,

    /// Largest corpus size on the geometric ladder.
    #[arg(short = 'n', long, default_value_t = 100_000)]
    max_size: usize,

    /// Timing rounds averaged per ladder step.
    #[arg(short, long, default_value_t = 10)]
    rounds: usize,

    /// Directory receiving one report file per engine/hasher combination.
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Seed for corpus generation and workload sampling.
    #[arg(short, long, default_value_t = 0xC0FFEE)]
    seed: u64,

    /// Newline-separated word corpus; a synthetic one is generated if
    /// absent.
    #[arg(short, long)]
    words: Option<PathBuf>,
}

/// SipHash-1-3 provider with explicit keys.
#[derive(Clone)]
struct Sip13State {
    k1: u64,
    k2: u64,
}

impl BuildHasher for Sip13State {
    type Hasher = SipHasher13;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher13::new_with_keys(self.k1, self.k2)
    }
}

/// SipHash-2-4 provider with explicit keys.
#[derive(Clone)]
struct Sip24State {
    k1: u64,
    k2: u64,
}

impl BuildHasher for Sip24State {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k1, self.k2)
    }
}

fn fold(seed: u64) -> FixedState {
    FixedState::with_seed(seed)
}

fn sip13(seed: u64) -> Sip13State {
    Sip13State {
        k1: seed,
        k2: seed.rotate_left(17) ^ 0x9E37_79B9_7F4A_7C15,
    }
}

fn sip24(seed: u64) -> Sip24State {
    Sip24State {
        k1: seed.rotate_left(31),
        k2: seed ^ 0xD1B5_4A32_D192_ED03,
    }
}

/// Draws an insertion sample of `n` words plus a query stream that mixes
/// keys known present, keys never inserted, and keys from the sample's
/// overlap region.
fn gen_data(source: &[String], n: usize, rng: &mut SmallRng) -> (Vec<String>, Vec<String>) {
    let mut data: Vec<String> = source
        .choose_multiple(rng, n * 3 / 2)
        .cloned()
        .collect();
    let size = data.len();

    let mut questions: Vec<String> = Vec::with_capacity(size);
    questions.extend_from_slice(&data[..size / 2]);
    questions.extend_from_slice(&data[size * 2 / 3..]);
    questions.shuffle(rng);

    data.truncate(size * 2 / 3);

    (data, questions)
}

/// Times one engine flavor over the size ladder and writes its report rows.
fn measure<S, F>(
    mut make: F,
    source: &[String],
    max_size: usize,
    rounds: usize,
    rng: &mut SmallRng,
    out: &mut dyn Write,
) -> io::Result<()>
where
    S: Set<String>,
    F: FnMut() -> S,
{
    writeln!(out, "size\tmean_time")?;

    let mostly_find = Bernoulli::new(0.9).expect("0.9 is a valid probability");

    let mut n = 10;
    while n < max_size {
        let mut total = Duration::ZERO;

        for _ in 0..rounds {
            let (sample, questions) = gen_data(source, n, rng);
            let mut set = make();

            let start = Instant::now();
            for word in sample {
                black_box(set.insert(word));
            }
            for word in &questions {
                if mostly_find.sample(rng) {
                    black_box(set.find(word));
                } else {
                    black_box(set.remove(word));
                }
            }
            total += start.elapsed();
        }

        let mean = total.as_nanos() / (rounds as u128 * 2 * n as u128);
        writeln!(out, "{n}\t{mean}")?;

        n = n * 3 / 2;
    }

    Ok(())
}

fn report<S, F>(
    args: &Args,
    label: &str,
    source: &[String],
    rng: &mut SmallRng,
    make: F,
) -> io::Result<()>
where
    S: Set<String>,
    F: FnMut() -> S,
{
    let path = args.output.join(format!("{label}.tsv"));
    let mut out = BufWriter::new(File::create(&path)?);
    measure(make, source, args.max_size, args.rounds, rng, &mut out)?;
    out.flush()
}

fn load_corpus(args: &Args, rng: &mut SmallRng) -> io::Result<Vec<String>> {
    let needed = args.max_size * 3 / 2;

    let mut source: Vec<String> = match &args.words {
        Some(path) => fs::read_to_string(path)?
            .split_whitespace()
            .map(str::to_owned)
            .collect(),
        None => (0..needed)
            .map(|_| format!("word_{:08x}", rng.random::<u32>()))
            .collect(),
    };

    if source.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "word corpus is empty",
        ));
    }

    // Short corpora are replicated until the largest sample can be drawn.
    while source.len() < needed {
        source.extend_from_within(..);
    }

    Ok(source)
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let mut chain = false;
    let mut linear = false;
    let mut quadratic = false;
    let mut doublehashing = false;
    let mut cuckoo = false;

    for family in &args.families {
        match family.as_str() {
            "chain" => chain = true,
            "linear" => linear = true,
            "quadratic" => quadratic = true,
            "doublehashing" => doublehashing = true,
            "cuckoo" => cuckoo = true,
            other => eprintln!("unknown family ignored: {other}"),
        }
    }

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let source = load_corpus(&args, &mut rng)?;
    fs::create_dir_all(&args.output)?;

    let seed = args.seed;

    if chain {
        println!("Testing chain...");
        report(&args, "chain_fold", &source, &mut rng, || {
            ChainingSet::with_hasher(fold(seed))
        })?;
        report(&args, "chain_sip13", &source, &mut rng, || {
            ChainingSet::with_hasher(sip13(seed))
        })?;
        report(&args, "chain_sip24", &source, &mut rng, || {
            ChainingSet::with_hasher(sip24(seed))
        })?;
    }

    if linear {
        println!("Testing linear...");
        report(&args, "linear_fold", &source, &mut rng, || {
            LinearSet::with_strategy(Linear::with_hasher(fold(seed)))
        })?;
        report(&args, "linear_sip13", &source, &mut rng, || {
            LinearSet::with_strategy(Linear::with_hasher(sip13(seed)))
        })?;
        report(&args, "linear_sip24", &source, &mut rng, || {
            LinearSet::with_strategy(Linear::with_hasher(sip24(seed)))
        })?;
    }

    if quadratic {
        println!("Testing quadratic...");
        report(&args, "quadratic_fold", &source, &mut rng, || {
            QuadraticSet::with_strategy(Quadratic::with_hasher(fold(seed)))
        })?;
        report(&args, "quadratic_sip13", &source, &mut rng, || {
            QuadraticSet::with_strategy(Quadratic::with_hasher(sip13(seed)))
        })?;
        report(&args, "quadratic_sip24", &source, &mut rng, || {
            QuadraticSet::with_strategy(Quadratic::with_hasher(sip24(seed)))
        })?;
    }

    if doublehashing {
        println!("Testing doublehashing...");
        report(&args, "doublehashing_fold", &source, &mut rng, || {
            DoubleHashingSet::with_strategy(DoubleHashing::with_hashers(
                fold(seed),
                sip24(!seed),
            ))
        })?;
        report(&args, "doublehashing_sip13", &source, &mut rng, || {
            DoubleHashingSet::with_strategy(DoubleHashing::with_hashers(
                sip13(seed),
                sip24(!seed),
            ))
        })?;
        report(&args, "doublehashing_sip24", &source, &mut rng, || {
            DoubleHashingSet::with_strategy(DoubleHashing::with_hashers(
                sip24(seed),
                sip24(!seed),
            ))
        })?;
    }

    if cuckoo {
        println!("Testing cuckoo...");
        report(&args, "cuckoo_fold_sip13", &source, &mut rng, || {
            CuckooSet::with_hashers(fold(seed), sip13(seed))
        })?;
        report(&args, "cuckoo_fold_sip24", &source, &mut rng, || {
            CuckooSet::with_hashers(fold(seed), sip24(seed))
        })?;
        report(&args, "cuckoo_sip13_sip24", &source, &mut rng, || {
            CuckooSet::with_hashers(sip13(seed), sip24(seed))
        })?;
    }

    Ok(())
}
