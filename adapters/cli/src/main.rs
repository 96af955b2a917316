#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Labyrinth session.

mod maze_transfer;
mod script;
mod terminal;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result as AnyResult};
use clap::Parser;
use labyrinth_core::{Command, Event, Rgb, UserId, VisionMode};
use labyrinth_rendering::{Palette, Presentation, Presenter, Scene};
use labyrinth_system_content::{CollectionRelay, ContentAssignment, PhotoLibrary};
use labyrinth_world::{self as world, query, Config, World};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{maze_transfer::MazeCode, terminal::TerminalPresenter};

const PIXELS_PER_PHOTO: usize = 48;
const PHOTO_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const BACKDROP: Rgb = Rgb::from_rgb(0xf6, 0xf6, 0xf4);

/// Walk a generated labyrinth, collecting photos on the way to the exit.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
struct Args {
    /// Number of maze rows
    #[arg(long)]
    rows: Option<u32>,

    /// Number of maze columns
    #[arg(long)]
    columns: Option<u32>,

    /// Seed for maze generation; drawn at random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Carve actions granted to the player
    #[arg(long)]
    carves: Option<u32>,

    /// Identifier of the playing user
    #[arg(short, long)]
    user: Option<u64>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Moves to play: n/e/s/w step, N/E/S/W carve through a wall
    #[arg(short, long, default_value = "")]
    moves: String,

    /// Only reveal the player's cell and its open neighbors
    #[arg(short, long, default_value_t = false)]
    limited_vision: bool,

    /// Number of synthetic photos in the catalogue
    #[arg(long, default_value_t = 64)]
    photos: usize,

    /// Print a shareable maze code before playing
    #[arg(long, default_value_t = false)]
    export: bool,

    /// Regenerate the maze described by a shared code
    #[arg(long, value_name = "CODE")]
    import: Option<String>,

    /// Paint cell tints with 24-bit ANSI colors
    #[arg(long, default_value_t = false)]
    color: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Entry point for the Labyrinth command-line interface.
fn main() -> AnyResult<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = resolve_config(&args)?;
    if args.export {
        println!("{}", MazeCode::from_config(&config).encode()?);
    }

    let mut world = World::new(config.clone()).context("could not build the labyrinth")?;
    let view = query::grid_view(&world);
    info!(
        "{} passages, {} cells reachable from the start",
        view.passage_count(),
        view.reachable_count(query::player(&world).cell)
    );

    let mut library = photo_library(config.seed, args.photos)?;
    let mut relay = CollectionRelay::new();
    let mut commands = Vec::new();
    let assigned = ContentAssignment::new().handle(
        query::grid_view(&world),
        config.user,
        &mut library,
        &mut commands,
    );
    debug!("assigned {assigned} photos");
    commands.push(Command::PropagateColors);
    commands.extend(script::parse(&args.moves)?);

    for event in run_session(&mut world, commands, &mut library, &mut relay) {
        if matches!(event, Event::ContentAttached { .. }) {
            debug!("{}", terminal::describe(&event));
        } else {
            println!("{}", terminal::describe(&event));
        }
    }

    let palette = Palette::default();
    let scene = Scene::build(
        query::grid_view(&world),
        query::player(&world),
        &query::visibility_mask(&world),
        &palette,
    )?;
    let presentation = Presentation::new(query::welcome_banner(&world), palette.background, scene);
    TerminalPresenter::new(io::stdout().lock(), args.color).present(&presentation)?;

    info!(
        "{} collections recorded, {} rejected, {} photos collected by user {} overall",
        relay.recorded(),
        relay.failed(),
        library.collected_by(config.user).count(),
        config.user.get()
    );
    Ok(())
}

/// Applies `commands` in order, relaying collections, until the exit is reached.
///
/// Diffusion only runs when the command stream asks for it; collections do
/// not trigger a new pass.
fn run_session(
    world: &mut World,
    commands: Vec<Command>,
    library: &mut PhotoLibrary,
    relay: &mut CollectionRelay,
) -> Vec<Event> {
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(world, command, &mut events);
        relay.handle(&events, library);

        let finished = events
            .iter()
            .any(|event| matches!(event, Event::ExitReached { .. }));
        log.extend(events);
        if finished {
            break;
        }
    }

    log
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Layers defaults, the optional config file, an imported maze code and flags.
fn resolve_config(args: &Args) -> AnyResult<Config> {
    let (mut config, file_sets_seed) = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            config_from_json(&text)
                .with_context(|| format!("could not parse {}", path.display()))?
        }
        None => (Config::default(), false),
    };

    if let Some(code) = &args.import {
        MazeCode::decode(code)
            .context("invalid maze code")?
            .apply_to(&mut config);
    }

    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(carves) = args.carves {
        config.carve_actions = carves;
    }
    if let Some(user) = args.user {
        config.user = UserId::new(user);
    }
    if args.limited_vision {
        config.vision_mode = VisionMode::Limited;
    }

    match args.seed {
        Some(seed) => config.seed = seed,
        None if !file_sets_seed && args.import.is_none() => {
            config.seed = rand::random();
            info!("using random seed {}", config.seed);
        }
        None => info!("using seed {}", config.seed),
    }

    config.validate()?;
    Ok(config)
}

/// Parses a JSON config file, reporting whether it pins the seed.
fn config_from_json(text: &str) -> AnyResult<(Config, bool)> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let sets_seed = value.get("seed").is_some();
    Ok((serde_json::from_value(value)?, sets_seed))
}

/// Builds a deterministic catalogue of synthetic photos.
fn photo_library(seed: u64, count: usize) -> AnyResult<PhotoLibrary> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ PHOTO_SEED_SALT);
    let mut library = PhotoLibrary::new();

    for _ in 0..count {
        let subject = Rgb::from_rgb(rng.gen(), rng.gen(), rng.gen());
        let pixels: Vec<Rgb> = (0..PIXELS_PER_PHOTO)
            .map(|index| {
                if index % 3 == 0 {
                    BACKDROP
                } else {
                    jitter(subject, &mut rng)
                }
            })
            .collect();
        let _ = library.add_image(&pixels)?;
    }

    Ok(library)
}

fn jitter<R: Rng>(color: Rgb, rng: &mut R) -> Rgb {
    let mut channel = |value: u8| value.saturating_add(rng.gen_range(0..8));
    Rgb::from_rgb(
        channel(color.red()),
        channel(color.green()),
        channel(color.blue()),
    )
}
