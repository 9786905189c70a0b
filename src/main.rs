use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sumheap::{verify_prefix_sums, ForkJoinConfig, SumHeap};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sumheap", about = "Parallel sum and prefix sum over an implicit heap")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a heap over 2^k copies of one value, scan it and report timing.
    Run {
        #[command(flatten)]
        input: InputArgs,
        /// Deepest tree level that forks (defaults to SUMHEAP_DEPTH_THRESHOLD or hardware-tuned).
        #[arg(long, conflicts_with = "sequential")]
        depth_threshold: Option<u32>,
        /// Disable forking entirely.
        #[arg(long)]
        sequential: bool,
        /// Run on a dedicated pool of this many threads.
        #[arg(long)]
        threads: Option<usize>,
        /// Check every prefix against a sequential running sum.
        #[arg(long)]
        verify: bool,
    },
    /// Time construction + scan for every threshold up to a maximum.
    Sweep {
        #[command(flatten)]
        input: InputArgs,
        /// Largest depth threshold to try.
        #[arg(long, default_value_t = 8)]
        max_threshold: u32,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// log2 of the leaf count.
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(0..=34))]
    log2_size: u32,
    /// Value stored in every leaf.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    fill: i64,
}

impl InputArgs {
    fn leaves(&self) -> Vec<i64> {
        vec![self.fill; 1usize << self.log2_size]
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            depth_threshold,
            sequential,
            threads,
            verify,
        } => {
            let mut config = ForkJoinConfig::from_env().context("invalid SUMHEAP_* environment")?;
            if sequential {
                config = config.with_threshold(None);
            } else if let Some(depth) = depth_threshold {
                config = config.with_threshold(Some(depth));
            }
            if let Some(threads) = threads {
                config = config.with_num_threads(threads);
            }
            run(&input, config, verify)?
        }
        Commands::Sweep {
            input,
            max_threshold,
        } => sweep(&input, max_threshold)?,
    }

    Ok(())
}

fn run(input: &InputArgs, config: ForkJoinConfig, verify: bool) -> Result<()> {
    let leaves = input.leaves();
    let mut prefix = vec![0i64; leaves.len()];
    info!(leaves = leaves.len(), threshold = ?config.depth_threshold, threads = ?config.num_threads, "starting");

    let start = Instant::now();
    let heap = SumHeap::with_config(&leaves, config).context("failed to build sum heap")?;
    heap.compute_prefix_sums(&mut prefix).context("prefix scan failed")?;
    let elapsed = start.elapsed();

    println!(
        "total={}\tleaves={}\tforks={}\tin {:.3}ms",
        heap.total(),
        leaves.len(),
        heap.reduction_stats().forks,
        elapsed.as_secs_f64() * 1e3
    );

    if verify {
        if let Some(idx) = verify_prefix_sums(&leaves, &prefix) {
            bail!("FAILED RESULT at {}", idx);
        }
        println!("verification passed");
    }

    Ok(())
}

fn sweep(input: &InputArgs, max_threshold: u32) -> Result<()> {
    let leaves = input.leaves();
    let mut prefix = vec![0i64; leaves.len()];

    let thresholds = std::iter::once(None).chain((0..=max_threshold).map(Some));
    println!("threshold\tforks\tms");
    for threshold in thresholds {
        let config = ForkJoinConfig::default().with_threshold(threshold);

        let start = Instant::now();
        let heap = SumHeap::with_config(&leaves, config)
            .with_context(|| format!("failed to build heap at threshold {:?}", threshold))?;
        heap.compute_prefix_sums(&mut prefix)?;
        let elapsed = start.elapsed();

        let label = threshold.map_or_else(|| "sequential".to_string(), |d| d.to_string());
        println!(
            "{}\t{}\t{:.3}",
            label,
            heap.reduction_stats().forks,
            elapsed.as_secs_f64() * 1e3
        );
    }

    Ok(())
}
