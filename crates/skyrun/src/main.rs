use anyhow::{Context, Result};
use clap::Parser;
use skyrun::config::AppConfig;
use skyrun::preview::{LevelExport, PreviewSink, render_ascii};
use skyrun_core::world::{HazardRecord, LevelGenConfig, StructureKind, WorldGenerator};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Master seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// How far the simulated player walks, in pixels
    #[arg(long)]
    distance: Option<f64>,

    /// Keep the frontier this far ahead of the player, in pixels
    #[arg(long)]
    trigger: Option<f64>,

    /// Level preset: default, dense, sparse, hazardous
    #[arg(long)]
    preset: Option<String>,

    /// Level generation config (RON); overrides --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write tiles, hazards and stats to a RON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the generated level as text
    #[arg(long)]
    ascii: bool,

    /// List available level presets
    #[arg(long)]
    list_presets: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Command-line flags take priority over every config layer
    fn apply(&self, config: &mut AppConfig) {
        if self.seed.is_some() {
            config.run.seed = self.seed;
        }
        if let Some(distance) = self.distance {
            config.run.distance = distance;
        }
        if let Some(trigger) = self.trigger {
            config.run.trigger_distance = trigger;
        }
        if let Some(preset) = &self.preset {
            config.run.preset = preset.clone();
        }
        if let Some(path) = &self.config {
            config.run.level_file = Some(path.to_string_lossy().into_owned());
        }
        if let Some(path) = &self.export {
            config.preview.export_path = Some(path.to_string_lossy().into_owned());
        }
        if self.ascii {
            config.preview.ascii = true;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if args.list_presets {
        for name in LevelGenConfig::PRESET_NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut app = AppConfig::load()?;
    args.apply(&mut app);
    let level = app.level_config().context("Failed to resolve level config")?;

    let mut generator = WorldGenerator::from_config(
        PreviewSink::with_level_textures(),
        Vec::<HazardRecord>::new(),
        app.run.seed,
        level,
    );

    let frontier = generator.generate_world();
    log::info!(
        "Level '{}' seed={} primed to x={}",
        generator.config().name,
        generator.seed(),
        frontier
    );

    // Walk the player forward and stream chunks like a game loop would
    let step = app.run.step.max(1.0);
    let mut player_x = 0.0;
    let mut streamed = 0;
    while player_x < app.run.distance {
        player_x = (player_x + step).min(app.run.distance);
        streamed += generator.ensure_ahead(player_x, app.run.trigger_distance);
    }

    let stats = generator.stats().clone();
    log::info!(
        "Walked to x={}: {} chunks streamed, frontier x={}",
        player_x,
        streamed,
        generator.world_generation_x()
    );
    for kind in StructureKind::ALL {
        log::info!(
            "  {:<16} placed {:>4}  skipped {:>4}",
            kind.name(),
            stats.placed_of(kind),
            stats.skipped_of(kind)
        );
    }
    log::info!(
        "  {} floor tiles, {} hazards, {} biome switches",
        stats.floor_tiles,
        stats.hazards,
        stats.biome_switches
    );

    let missing_textures: Vec<String> = generator
        .sinks()
        .missing_textures()
        .map(str::to_string)
        .collect();
    let snapshot = generator.snapshot();
    let config = generator.config().clone();
    let (sink, hazards) = generator.into_sinks();

    if app.preview.ascii {
        let width = app.preview.ascii_max_columns as f64 * config.tiles.tile_size;
        let to_x = snapshot.world_generation_x.min(width);
        print!("{}", render_ascii(sink.tiles(), &config, 0.0, to_x));
    }

    if let Some(path) = &app.preview.export_path {
        let export = LevelExport {
            config_name: config.name.clone(),
            seed: snapshot.seed,
            frontier: snapshot.world_generation_x,
            snapshot,
            stats,
            missing_textures,
            tiles: sink.into_tiles(),
            hazards,
        };
        export.write_to(&PathBuf::from(path))?;
    }

    Ok(())
}
