#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted editor input against an Underworld map.

mod config;
mod script;

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use underworld_core::{Command, Event, TileSize, TileType};
use underworld_rendering::{RenderingBackend, Scene, TextBackend, Viewport};
use underworld_system_editor::{
    Camera, ClickOutcome, EditController, EditOutcome, ToolbarSelection,
};
use underworld_world::{apply, query, World};

use crate::config::SessionConfig;

/// Command-line arguments for the Underworld editor.
#[derive(Debug, Parser)]
#[command(
    name = "underworld",
    version,
    about = "Builds an Underworld map and replays scripted editor input against it"
)]
struct CliArgs {
    /// TOML file overriding world, palette and viewport defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Input script replayed through the editor, one event per line.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Number of entities to spawn, overriding the configured population.
    #[arg(long, value_name = "COUNT", allow_negative_numbers = true)]
    population: Option<i64>,
    /// Size of the map preview in tiles, formatted as COLSxROWS.
    #[arg(long, value_name = "COLSxROWS")]
    map_window: Option<MapWindow>,
}

/// Preview size measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MapWindow {
    columns: u32,
    rows: u32,
}

impl MapWindow {
    fn viewport(self, tile_size: TileSize) -> Viewport {
        Viewport::new(
            self.columns.saturating_mul(tile_size.width()),
            self.rows.saturating_mul(tile_size.height()),
        )
    }
}

impl FromStr for MapWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (columns, rows) = value
            .split_once(|c: char| c.eq_ignore_ascii_case(&'x'))
            .ok_or_else(|| format!("map window '{value}' must be formatted as COLSxROWS"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|error| format!("invalid map window dimension '{part}': {error}"))
        };
        Ok(Self {
            columns: parse(columns)?,
            rows: parse(rows)?,
        })
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let palette = config.palette().context("invalid toolbar palette")?;
    let population = args.population.unwrap_or(config.population);
    let viewport_config = config.viewport;

    let mut world =
        World::with_config(config.world).context("invalid world configuration")?;
    prepare_world(&mut world, population)?;

    let events = match &args.script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            script::parse(&source)
                .with_context(|| format!("failed to parse script {}", path.display()))?
        }
        None => Vec::new(),
    };

    let mut toolbar = ToolbarSelection::new(palette);
    let mut camera = Camera::tile_stepped(world.tile_size());
    let outcomes = EditController::new(&mut world, &mut toolbar)
        .handle(&events, &mut camera)
        .context("input script violated the editor contract")?;
    let painted = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, EditOutcome::Clicked(ClickOutcome::Painted(_))))
        .count();
    info!(events = events.len(), painted, "script replayed");

    let viewport = args.map_window.map_or_else(
        || Viewport::from(viewport_config),
        |window| window.viewport(world.tile_size()),
    );
    let scene = Scene::capture(&world, &toolbar, camera.offset(), viewport);

    let stdout = io::stdout();
    let mut backend = TextBackend::new(stdout.lock());
    backend.present(&scene)?;
    let mut out = backend.into_inner();
    write_summary(&mut out, &world)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Builds the grid and spawns the initial population through world commands.
fn prepare_world(world: &mut World, population: i64) -> Result<()> {
    let mut events = Vec::new();
    apply(world, Command::BuildWorld, &mut events);
    apply(world, Command::Populate { count: population }, &mut events);

    for event in events {
        match event {
            Event::CommandRejected { command, reason } => {
                return Err(anyhow::Error::new(reason))
                    .with_context(|| format!("world rejected {command:?}"));
            }
            Event::WorldBuilt { tiles } => debug!(tiles, "grid ready"),
            Event::EntitySpawned { id, kind, position } => debug!(
                id = id.get(),
                kind = kind.name_tag(),
                x = position.x(),
                y = position.y(),
                "entity ready"
            ),
            Event::TileReplaced { .. } => {}
        }
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, world: &World) -> Result<()> {
    let mut histogram: BTreeMap<TileType, usize> = BTreeMap::new();
    for tile in query::tiles(world).iter() {
        *histogram.entry(tile.tile_type()).or_default() += 1;
    }

    let (width, height) = query::dimensions(world);
    writeln!(out, "World '{}' ({width}x{height})", query::name(world))
        .context("failed to write summary")?;
    for (tile_type, count) in &histogram {
        writeln!(out, "  {:<6} {count}", tile_type.label()).context("failed to write summary")?;
    }
    writeln!(out, "Entities: {}", world.entity_count()).context("failed to write summary")?;
    out.flush().context("failed to flush summary")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_window_parses_columns_and_rows() {
        assert_eq!(
            "16x12".parse::<MapWindow>(),
            Ok(MapWindow {
                columns: 16,
                rows: 12
            })
        );
        assert_eq!(
            "3X2".parse::<MapWindow>().map(|window| window.viewport(TileSize::new(50, 40))),
            Ok(Viewport::new(150, 80))
        );
        assert!("16".parse::<MapWindow>().is_err());
        assert!("ax2".parse::<MapWindow>().is_err());
    }

    #[test]
    fn prepare_world_rejects_negative_population() {
        let mut world = World::new("t", 2, 2).expect("valid dimensions");
        let error = prepare_world(&mut world, -1).expect_err("negative population");
        assert!(error.to_string().contains("Populate"));
        assert!(query::is_built(&world));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn summary_lists_tile_counts_by_type() {
        let mut world = World::new("caves", 2, 2).expect("valid dimensions");
        prepare_world(&mut world, 3).expect("valid population");
        let _ = world
            .replace_tile(3, TileType::Lava)
            .expect("index inside grid");

        let mut out = Vec::new();
        write_summary(&mut out, &world).expect("writing to a vec succeeds");

        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            "World 'caves' (2x2)\n  STONE  3\n  LAVA   1\nEntities: 3\n"
        );
    }
}
