use std::path::PathBuf;

use clap::Parser;

use chaos_world::config::{SpawnTable, WorldGenConfig};
use chaos_world::rules::RuleSet;
use chaos_world::tiles::TileCatalog;
use chaos_world::world::World;

#[derive(Parser, Debug)]
#[command(name = "chaos_world")]
#[command(about = "Generate a procedural symbol world and evolve it with cellular automaton rules")]
struct Args {
    /// Directory holding world_gen.cfg, world_spawn.cfg, cellular_rules.cfg
    /// and tiles.json
    #[arg(short, long, default_value = "config")]
    config_dir: PathBuf,

    /// Override the configured world width
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Override the configured world height
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Override the seed (implies a fixed, non-random seed)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Automaton generations to run after generation
    #[arg(short = 'n', long, default_value = "10")]
    steps: usize,

    /// Print the world after every generation instead of only first and last
    #[arg(long)]
    show_steps: bool,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let catalog = TileCatalog::load_from_file(args.config_dir.join("tiles.json"));

    let mut config = match WorldGenConfig::load_from_file(args.config_dir.join("world_gen.cfg")) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load world config ({err}), using defaults");
            WorldGenConfig::default()
        }
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
        config.use_random_seed = false;
    }

    let spawn = match SpawnTable::load_from_file(args.config_dir.join("world_spawn.cfg")) {
        Ok(spawn) => spawn,
        Err(err) => {
            eprintln!("Failed to load spawn table ({err}), world will be empty");
            SpawnTable::default()
        }
    };

    let rules = match RuleSet::load_from_file(args.config_dir.join("cellular_rules.cfg")) {
        Ok(rules) => rules,
        Err(err) => {
            eprintln!("Failed to load automaton rules ({err}), automaton stays idle");
            RuleSet::default()
        }
    };

    let mut world = World::new(catalog, config, spawn, rules);

    println!("Generating {}x{} world with seed {}", world.content_width(), world.content_height(), world.seed());
    world.generate();
    println!("{}", render_ascii(&world));

    world.set_automaton_enabled(true);
    for generation in 1..=args.steps {
        let stats = world.step();
        println!(
            "Generation {generation}: {} births, {} deaths",
            stats.births, stats.deaths
        );
        if args.show_steps {
            println!("{}", render_ascii(&world));
        }
    }

    if !args.show_steps && args.steps > 0 {
        println!("{}", render_ascii(&world));
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Render the full grid, border included, one symbol per cell.
fn render_ascii(world: &World) -> String {
    let grid = world.grid();
    let mut out = String::with_capacity(grid.total_height() * (grid.total_width() + 1));
    for y in 0..grid.total_height() {
        for x in 0..grid.total_width() {
            out.push(world.catalog().symbol_for_id(grid.get(x, y)));
        }
        out.push('\n');
    }
    out
}
