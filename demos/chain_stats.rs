use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use clap::ValueEnum;
use siphasher::sip::SipHasher;
use strategy_set::FnStrategy;
use strategy_set::HashingStrategy;
use strategy_set::StrategySet;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Hashing {
    /// SipHash of the value, folded to 32 bits
    Sip,
    /// The value itself
    Identity,
    /// The value with its low bits cleared
    Clustered,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u32,

    #[arg(short = 'c', long = "initial_capacity", default_value_t = 16)]
    initial_capacity: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.75)]
    load_factor: f32,

    #[arg(long, value_enum, default_value_t = Hashing::Sip)]
    hashing: Hashing,
}

fn sip(value: &u32) -> u32 {
    let mut hasher = SipHasher::new();
    value.hash(&mut hasher);
    hasher.finish() as u32
}

fn run<S: HashingStrategy<u32>>(args: &Args, strategy: S) -> Result<(), strategy_set::Error> {
    let mut set =
        StrategySet::with_capacity_and_load_factor(strategy, args.initial_capacity, args.load_factor)?;

    println!(
        "Created set with {} slots (max {} elements before growth)",
        set.capacity(),
        set.max_occupied()
    );
    println!("Adding {} values with {:?} hashing...", args.count, args.hashing);

    set.add_all(0..args.count);

    println!("Added {} values, {} slots", set.len(), set.capacity());
    println!(
        "Final load: {:.2}%",
        (set.len() as f64 / set.capacity() as f64) * 100.0
    );

    set.print_chain_histogram();
    set.debug_stats().print();
    Ok(())
}

fn main() -> Result<(), strategy_set::Error> {
    let args = Args::parse();

    let eq = |a: &u32, b: &u32| a == b;
    match args.hashing {
        Hashing::Sip => run(&args, FnStrategy::new(sip, eq)),
        Hashing::Identity => run(&args, FnStrategy::new(|v: &u32| *v, eq)),
        Hashing::Clustered => run(&args, FnStrategy::new(|v: &u32| *v & !0xFF, eq)),
    }
}
