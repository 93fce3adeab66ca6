//! hotel-sim: command-line driver for the hotel booking demand simulator.
//!
//! ```text
//! hotel-sim generate   --travellers 500 --casual 0.7 --seed 42 --out state.json
//! hotel-sim run        --state state.json --output out/
//! hotel-sim run-priced --state state.json --capacity 50 --fixed 100 --output out/
//! hotel-sim run-priced --state state.json --capacity 50 --min 80 --max 160
//! ```
//!
//! Logging goes to stderr through `tracing`; set `RUST_LOG` to filter
//! (default `info`).  Results go to stdout.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use hs_core::{Day, SimConfig};
use hs_output::{CsvWriter, SimOutputObserver, load_state_file, save_state_file};
use hs_pricing::PriceTableStrategy;
use hs_sim::{MatchingStrategy, NoopObserver, Sim, SimBuilder, SimSession, SimulationParameters};
use hs_supply::Booking;

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Hotel booking demand simulator
#[derive(Parser, Debug)]
#[command(name = "hotel-sim")]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate travellers and their demand, and save the state
    Generate(GenerateArgs),

    /// Run the multi-supplier simulation (hotels and resellers)
    Run(RunArgs),

    /// Run the single-supplier simulation against a price table
    RunPriced(RunPricedArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of travellers
    #[arg(long)]
    travellers: usize,

    /// Share of casual travellers, 0 to 1
    #[arg(long)]
    casual: f64,

    /// Seed for reproducible generation (fresh entropy if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation id (defaults to `sim_<unix seconds>`)
    #[arg(long)]
    sim_id: Option<String>,

    /// Supplier configuration (JSON); the reference setup if omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the generated state
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory for booking and day-summary output
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write output to SQLite instead of CSV
    #[cfg(feature = "sqlite")]
    #[arg(long, requires = "output")]
    sqlite: bool,

    /// Write the state, with booked itineraries, here after the run
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// State produced by `generate`
    #[arg(long)]
    state: PathBuf,

    /// Supplier configuration (JSON); the reference setup if omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// First simulated day
    #[arg(long, allow_negative_numbers = true, default_value_t = Day::FIRST_SHOPPING.0)]
    start: i32,

    /// Last simulated day
    #[arg(long, allow_negative_numbers = true, default_value_t = Day::LAST.0)]
    end: i32,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct RunPricedArgs {
    /// State produced by `generate`
    #[arg(long)]
    state: PathBuf,

    /// Supplier configuration (JSON); only its operational window is used
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rooms available on every stay day
    #[arg(long)]
    capacity: u32,

    /// Flat price per night
    #[arg(long, conflicts_with_all = ["min", "max"], required_unless_present = "min")]
    fixed: Option<f64>,

    /// Price per night when empty (availability-linear pricing)
    #[arg(long, requires = "max")]
    min: Option<f64>,

    /// Price per night when full (availability-linear pricing)
    #[arg(long, requires = "min")]
    max: Option<f64>,

    #[command(flatten)]
    output: OutputArgs,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Run(args) => run(args),
        Command::RunPriced(args) => run_priced(args),
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let mut config = match path {
        Some(p) => SimConfig::from_json_file(p).with_context(|| format!("loading config {}", p.display()))?,
        None => SimConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn generate(args: GenerateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut params = SimulationParameters::new(args.travellers, args.casual);
    if let Some(seed) = args.seed {
        params = params.with_seed(seed);
    }
    if let Some(id) = args.sim_id {
        params = params.with_simulation_id(id);
    }

    let t0 = Instant::now();
    let session = SimSession::generate(params, &config)?;
    save_state_file(&session, &args.out)?;

    let pop = &session.population;
    println!("Simulation        {}", session.params.simulation_id);
    println!("Seed              {}", session.params.seed.unwrap_or_default());
    println!("Travellers        {}", pop.len());
    println!("Itineraries       {}", pop.total_itineraries());
    println!("Demands           {}", pop.total_demands());
    println!("Hotel capacity    {}", session.params.total_hotel_capacity);
    println!("Saved to          {}  ({:.2?})", args.out.display(), t0.elapsed());
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut session = load_state_file(&args.state)?;
    session.params.describe(&config);

    let mut sim = SimBuilder::multi_supplier(session, config)?
        .window(Day(args.start), Day(args.end))
        .build()?;
    execute(&mut sim, &args.output)
}

fn run_priced(args: RunPricedArgs) -> Result<()> {
    let strategy = match (args.fixed, args.min, args.max) {
        (Some(price), _, _) => PriceTableStrategy::fixed(price)?,
        (None, Some(min), Some(max)) => PriceTableStrategy::availability_linear(min, max)?,
        _ => bail!("give either --fixed or both --min and --max"),
    };
    let stays = load_config(args.config.as_deref())?.operational_days();
    let session = load_state_file(&args.state)?;

    println!("Single supplier: {} rooms/day over {}, {:?}", args.capacity, stays, strategy);
    let mut sim = SimBuilder::single_supplier(session, strategy, args.capacity, stays)?.build()?;
    execute(&mut sim, &args.output)
}

/// Run to the end of the clock window, writing output if asked, then print
/// the statistics and missed-demand summary.
fn execute<M: MatchingStrategy>(sim: &mut Sim<M>, out: &OutputArgs) -> Result<()> {
    let t0 = Instant::now();
    let bookings = match &out.output {
        None => sim.run(&mut NoopObserver)?,
        Some(dir) => run_with_output(sim, dir, out)?,
    };
    let elapsed = t0.elapsed();

    let stats = sim.statistics();
    let missed = sim.missed_demand();
    println!();
    println!("Simulation {} ({} bookings in {:.2?})", sim.session.simulation_id(), bookings.len(), elapsed);
    println!("{stats}");
    println!();
    println!("Missed itineraries  {:>12}", missed.len());
    println!("  lost to price     {:>12}", missed.lost_to_price);
    println!("  lost to capacity  {:>12}", missed.lost_to_capacity);
    println!("  never checked     {:>12}", missed.never_checked);

    if let Some(path) = &out.save {
        save_state_file(&sim.session, path)?;
        println!("State saved to {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
fn run_with_output<M: MatchingStrategy>(
    sim: &mut Sim<M>,
    dir: &Path,
    out: &OutputArgs,
) -> Result<Vec<Booking>> {
    if out.sqlite {
        let mut obs = SimOutputObserver::new(hs_output::SqliteWriter::new(dir)?);
        let bookings = sim.run(&mut obs)?;
        finish_output(&mut obs, dir)?;
        return Ok(bookings);
    }
    run_csv(sim, dir)
}

#[cfg(not(feature = "sqlite"))]
fn run_with_output<M: MatchingStrategy>(
    sim: &mut Sim<M>,
    dir: &Path,
    _out: &OutputArgs,
) -> Result<Vec<Booking>> {
    run_csv(sim, dir)
}

fn run_csv<M: MatchingStrategy>(sim: &mut Sim<M>, dir: &Path) -> Result<Vec<Booking>> {
    let mut obs = SimOutputObserver::new(CsvWriter::new(dir)?);
    let bookings = sim.run(&mut obs)?;
    finish_output(&mut obs, dir)?;
    Ok(bookings)
}

fn finish_output<W: hs_output::OutputWriter>(obs: &mut SimOutputObserver<W>, dir: &Path) -> Result<()> {
    if let Some(e) = obs.take_error() {
        return Err(e).with_context(|| format!("writing output to {}", dir.display()));
    }
    println!("Output written to {} ({} bookings)", dir.display(), obs.bookings_written());
    Ok(())
}
