//! pagesim CLI - replay a trace through one policy, or sweep frame counts.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use pagesim::{read_trace, run_sweep, PolicyKind, Report, SweepConfig};

/// Virtual-memory paging simulator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging (per-fault observability lines)
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay one trace through one policy and print its counters
    Run {
        /// Trace file (.gz or plain text)
        #[arg(long)]
        trace: PathBuf,

        /// Number of physical frames
        #[arg(long)]
        frames: usize,

        /// Replacement policy: rand, lru, or clock
        #[arg(long)]
        policy: String,

        /// RNG seed for the rand policy
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sweep frame counts for each trace and write a JSON report
    Sweep {
        /// Trace files (.gz or plain text)
        #[arg(long, required = true, num_args = 1..)]
        trace: Vec<PathBuf>,

        /// Report output path
        #[arg(long, default_value = "data.json")]
        output: PathBuf,

        /// Maximum number of frame-count rungs per trace
        #[arg(long)]
        max_points: Option<usize>,

        /// Headroom multiple over each trace's unique-page count
        #[arg(long)]
        headroom: Option<f64>,

        /// Drop rungs below this frame count
        #[arg(long)]
        min_frames: Option<usize>,

        /// RNG seed, for reproducible rand results
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads (defaults to the number of CPUs)
        #[arg(long)]
        threads: Option<usize>,
    },
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Run {
            trace,
            frames,
            policy,
            seed,
        } => run_single(&trace, frames, &policy, seed, args.debug),
        Command::Sweep {
            trace,
            output,
            max_points,
            headroom,
            min_frames,
            seed,
            threads,
        } => {
            let mut config = SweepConfig {
                seed,
                ..SweepConfig::default()
            };
            if let Some(max_points) = max_points {
                config.max_points = max_points;
            }
            if let Some(headroom) = headroom {
                config.headroom = headroom;
            }
            if let Some(min_frames) = min_frames {
                config.min_frames = min_frames;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            run_sweep_command(&trace, &output, &config)
        }
    }
}

fn run_single(
    trace: &Path,
    frames: usize,
    policy: &str,
    seed: Option<u64>,
    debug: bool,
) -> Result<()> {
    let kind: PolicyKind = policy.parse().map_err(|e: String| anyhow!(e))?;
    let events = read_trace(trace)
        .with_context(|| format!("failed to read trace {}", trace.display()))?;

    let mut mmu = match seed {
        Some(seed) => kind.build_seeded(frames, seed)?,
        None => kind.build(frames)?,
    };
    if debug {
        mmu.enable_debug();
    }

    for event in &events {
        mmu.access(event.page, event.kind.is_write())?;
    }

    let counters = mmu.counters();
    println!("policy:       {kind}");
    println!("frames:       {frames}");
    println!("accesses:     {}", events.len());
    println!("page faults:  {}", counters.page_faults);
    println!("disk reads:   {}", counters.disk_reads);
    println!("disk writes:  {}", counters.disk_writes);
    println!(
        "fault rate:   {:.4}%",
        counters.fault_rate(events.len() as u64)
    );

    Ok(())
}

fn run_sweep_command(traces: &[PathBuf], output: &Path, config: &SweepConfig) -> Result<()> {
    let mut report = Report::new();

    for path in traces {
        let name = trace_name(path);
        info!("collecting results for {name}...");

        let events = read_trace(path)
            .with_context(|| format!("failed to read trace {}", path.display()))?;
        let result = run_sweep(&events, config)
            .with_context(|| format!("sweep failed for {name}"))?;

        report.insert(name, result);
    }

    report
        .save(output)
        .with_context(|| format!("failed to write report {}", output.display()))?;
    println!("wrote {}", output.display());

    Ok(())
}

/// Trace name used as the report key: the file name up to its first dot,
/// so `gcc.trace.gz` becomes `gcc`.
fn trace_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    file_name
        .split('.')
        .next()
        .unwrap_or(&file_name)
        .to_string()
}
