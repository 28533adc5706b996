use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rail_core::track::validate_layout;
use rail_core::{
    apply_command, decode_state, encode_state, tick, CameraState, Command, GameMode, SavedState,
    SimState, TrainState, Yard,
};
use rail_world::{build_initial_state, load_content, load_scenario, load_yard_def, validate_scenario};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "rail_cli", about = "Yard switching simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario headless for a span of wall-clock frame time.
    Run {
        #[arg(long, default_value = "./content")]
        content_dir: String,
        /// Frame time to simulate, in seconds (scaled by the time multiplier).
        #[arg(long, default_value_t = 600.0)]
        seconds: f64,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Seed for frame jitter. Random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Uniform jitter added to every frame delta, in milliseconds.
        #[arg(long, default_value_t = 0.0)]
        jitter_ms: f64,
        /// Resume from a save file instead of the scenario's planning state.
        #[arg(long = "state")]
        state_file: Option<String>,
        /// Write a save file when the run ends.
        #[arg(long)]
        save: Option<String>,
        /// Print a status line every N game seconds.
        #[arg(long, default_value_t = 30.0)]
        print_every: f64,
    },
    /// Check the yard layout and scenario without running.
    Validate {
        #[arg(long, default_value = "./content")]
        content_dir: String,
    },
}

struct RunArgs {
    content_dir: String,
    seconds: f64,
    fps: f64,
    seed: Option<u64>,
    jitter_ms: f64,
    state_file: Option<String>,
    save: Option<String>,
    print_every: f64,
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn load_state(state_file: Option<&str>, content: &rail_world::Content) -> Result<SimState> {
    let Some(path) = state_file else {
        return Ok(build_initial_state(&content.scenario));
    };
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading state file: {path}"))?;
    let saved = decode_state(&json).with_context(|| format!("decoding state file: {path}"))?;
    Ok(saved.restore(&content.yard))
}

fn save_state(path: &str, state: &SimState) -> Result<()> {
    let json = encode_state(&SavedState::capture(state, CameraState::default()))
        .context("encoding state")?;
    std::fs::write(path, json).with_context(|| format!("writing state file: {path}"))?;
    println!("State saved to {path}");
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    if args.fps <= 0.0 {
        bail!("--fps must be positive");
    }
    let content = load_content(&args.content_dir)?;
    let mut state = load_state(args.state_file.as_deref(), &content)?;
    apply_command(
        &mut state,
        &content.yard,
        &Command::SetMode {
            mode: GameMode::Running,
        },
    )?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::debug!(seed, jitter_ms = args.jitter_ms, "frame clock seeded");
    let frame_ms = 1000.0 / args.fps;
    let jitter = args.jitter_ms.abs();

    println!(
        "Starting simulation: scenario={:?} seconds={} fps={} seed={seed} scheduled={}",
        content.scenario.name,
        args.seconds,
        args.fps,
        state.scheduled_trains.len(),
    );
    println!("{}", "-".repeat(80));

    let mut elapsed_ms = 0.0;
    let mut next_status = state.game_time;
    while elapsed_ms < args.seconds * 1000.0 {
        let delta_ms = if jitter > 0.0 {
            (frame_ms + rng.gen_range(-jitter..=jitter)).max(1.0)
        } else {
            frame_ms
        };
        elapsed_ms += delta_ms;

        for envelope in tick(&mut state, &content.yard, delta_ms) {
            println!(
                "[{}] {}",
                clock(envelope.game_time),
                serde_json::to_string(&envelope.event).context("formatting event")?
            );
        }
        if state.game_time >= next_status {
            print_status(&state);
            next_status += args.print_every.max(1.0);
        }
    }

    println!("{}", "-".repeat(80));
    println!("Done. Final state at {}:", clock(state.game_time));
    print_status(&state);

    if let Some(path) = &args.save {
        save_state(path, &state)?;
    }
    Ok(())
}

fn clock(game_time: f64) -> String {
    let total = game_time.max(0.0).floor();
    let hours = (total / 3600.0).floor();
    let minutes = ((total - hours * 3600.0) / 60.0).floor();
    let seconds = total - hours * 3600.0 - minutes * 60.0;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn print_status(state: &SimState) {
    println!(
        "[{}]  turnout={:?}  active={}  east_stock={}  west_stock={}",
        clock(state.game_time),
        state.turnout_state,
        state.active_trains.len(),
        state.inventories.east.len(),
        state.inventories.west.len(),
    );
    for train in &state.active_trains {
        let status = match &train.train_state {
            TrainState::Stopped { reason } => format!("stopped ({reason})"),
            other => format!("{other:?}"),
        };
        println!(
            "    {}  pos={:7.1}/{:.1}  speed={:5.2}  order={}/{}  {status}",
            train.id,
            train.position,
            train.route.total_length,
            train.speed,
            train.program_counter,
            train.program.len(),
        );
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(content_dir: &str) -> Result<()> {
    let dir = Path::new(content_dir);
    let yard = Yard::build(&load_yard_def(dir)?);
    let report = validate_layout(&yard.layout);
    println!(
        "Layout: {} elements, {} connections",
        yard.layout.elements().len(),
        yard.layout.connections().len()
    );
    for error in &report.errors {
        println!("  error: {error}");
    }

    let scenario = load_scenario(dir)?;
    validate_scenario(&scenario, &yard)?;
    println!("Scenario {:?}: {} trains", scenario.name, scenario.trains.len());

    if !report.valid {
        bail!("layout has {} errors", report.errors.len());
    }
    println!("OK");
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            content_dir,
            seconds,
            fps,
            seed,
            jitter_ms,
            state_file,
            save,
            print_every,
        } => run(RunArgs {
            content_dir,
            seconds,
            fps,
            seed,
            jitter_ms,
            state_file,
            save,
            print_every,
        })?,
        Commands::Validate { content_dir } => validate(&content_dir)?,
    }
    Ok(())
}
