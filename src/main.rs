use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use packsim::config::{ClockPolicy, SimConfig, DEFAULT_NODE_CORES, DEFAULT_NODE_MEMORY, DEFAULT_POOL_SIZE};
use packsim::report::{ConsoleReporter, CsvReporter, MultiReporter, Reporter};
use packsim::scheduler::SchedulerEngine;
use packsim::source::JobSource;
use packsim::Result;

#[derive(Parser, Debug)]
#[command(name = "packsim")]
#[command(version)]
#[command(about = "First-fit bin-packing placement simulator for compute clusters")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run a placement simulation over a job trace file
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Path to the job trace (one record per line)
    jobs: PathBuf,

    /// Write the per-job audit report as CSV to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Number of worker nodes in the pool
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
    nodes: usize,

    /// Cores per node
    #[arg(long, default_value_t = DEFAULT_NODE_CORES)]
    cores: u32,

    /// Memory units per node
    #[arg(long, default_value_t = DEFAULT_NODE_MEMORY)]
    memory: u32,

    /// Clock policy: advance one hour per job, or follow arrival stamps
    #[arg(long, value_enum, default_value = "per-job")]
    clock: ClockArg,

    /// Evict a queued job after this many failed retry passes
    #[arg(long)]
    max_retries: Option<u32>,

    /// After the trace ends, run up to this many idle ticks to drain the
    /// retry queue
    #[arg(long, default_value_t = 0)]
    drain: u64,

    /// Suppress per-job console lines
    #[arg(long, short)]
    quiet: bool,

    /// Output format for the final summary
    #[arg(long, short = 'o', value_enum, default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClockArg {
    PerJob,
    ArrivalStamped,
}

impl From<ClockArg> for ClockPolicy {
    fn from(arg: ClockArg) -> Self {
        match arg {
            ClockArg::PerJob => ClockPolicy::PerJob,
            ClockArg::ArrivalStamped => ClockPolicy::ArrivalStamped,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let config = SimConfig::new(args.nodes, args.cores, args.memory)
        .with_clock_policy(args.clock.into())
        .with_max_retries(args.max_retries);
    config.validate()?;

    let mut reporter = MultiReporter::new();
    if !args.quiet {
        reporter.push(Box::new(ConsoleReporter));
    }
    if let Some(path) = &args.report {
        reporter.push(Box::new(CsvReporter::create(path)?));
    }

    let mut engine = SchedulerEngine::new(&config);
    for record in JobSource::open(&args.jobs)? {
        let job = record?;
        for event in engine.on_arrival(job) {
            reporter.record(&event)?;
        }
    }

    // Optional drain phase: idle ticks until the queue empties or the
    // budget runs out.
    for _ in 0..args.drain {
        if engine.queued() == 0 {
            break;
        }
        for event in engine.idle_tick() {
            reporter.record(&event)?;
        }
    }
    reporter.finish()?;

    let summary = engine.summary();
    match args.output {
        OutputFormat::Table => {
            println!();
            println!("Jobs processed:          {}", summary.arrivals);
            println!("Allocated immediately:   {}", summary.allocated);
            println!("Reinserted:              {}", summary.reinserted);
            println!("Allocated after retry:   {}", summary.allocated_after_retry);
            println!("Rejected:                {}", summary.rejected);
            println!("Completed:               {}", summary.completed);
            println!("Still running:           {}", summary.still_running);
            println!("Still queued:            {}", summary.still_queued);
            println!("Ticks simulated:         {}", summary.ticks);
            println!(
                "Final clock:             day {} hour {}",
                summary.final_day, summary.final_hour
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let result = match args.command {
        Commands::Simulate(simulate_args) => run_simulate(simulate_args),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
