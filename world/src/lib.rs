#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Underworld editor.

mod entities;
mod tiles;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use underworld_core::{
    Command, EntityId, EntityKind, Event, GridCoord, PixelPoint, TileSize, TileType, WorldError,
    DEFAULT_TILE_SIZE,
};

pub use entities::{Entity, EntityRegistry};
pub use tiles::{Tile, TileGrid, TileReplacement};

const DEFAULT_WORLD_NAME: &str = "Underworld";
const DEFAULT_GRID_COLUMNS: u32 = 160;
const DEFAULT_GRID_ROWS: u32 = 100;
const DEFAULT_FILL: TileType = TileType::Stone;

/// Width of the viewport the default spawn point is centred in.
pub const DEFAULT_VIEWPORT_WIDTH: i32 = 800;
/// Height of the viewport the default spawn point is centred in.
pub const DEFAULT_VIEWPORT_HEIGHT: i32 = 600;

/// Position every populated entity starts at: the viewport centre, in screen pixels.
pub const DEFAULT_SPAWN_POINT: PixelPoint =
    PixelPoint::new(DEFAULT_VIEWPORT_WIDTH / 2, DEFAULT_VIEWPORT_HEIGHT / 2);

/// Construction parameters for a [`World`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Human readable world name.
    pub name: String,
    /// Number of tile columns.
    pub width: u32,
    /// Number of tile rows.
    pub height: u32,
    /// Pixel dimensions of each tile.
    pub tile_size: TileSize,
    /// Material every tile holds right after [`World::build`].
    pub fill: TileType,
    /// Pixel position entities are spawned at by [`World::populate`].
    pub spawn_point: PixelPoint,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_WORLD_NAME.to_owned(),
            width: DEFAULT_GRID_COLUMNS,
            height: DEFAULT_GRID_ROWS,
            tile_size: DEFAULT_TILE_SIZE,
            fill: DEFAULT_FILL,
            spawn_point: DEFAULT_SPAWN_POINT,
        }
    }
}

/// Represents the authoritative world state: one tile grid and one entity registry.
#[derive(Clone, Debug)]
pub struct World {
    name: String,
    fill: TileType,
    spawn_point: PixelPoint,
    tiles: TileGrid,
    entities: EntityRegistry,
    built: bool,
}

impl World {
    /// Creates an unbuilt world with the default tile size and spawn point.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Result<Self, WorldError> {
        Self::with_config(WorldConfig {
            name: name.into(),
            width,
            height,
            ..WorldConfig::default()
        })
    }

    /// Creates an unbuilt world from explicit configuration.
    ///
    /// Rejects zero-sized tiles and grids whose pixel extent does not fit in
    /// `i32`, so every tile keeps a distinct origin and coordinate.
    pub fn with_config(config: WorldConfig) -> Result<Self, WorldError> {
        let _ = config
            .tile_size
            .validate()?
            .validate_extent(config.width, config.height)?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: WorldConfig) -> Self {
        Self {
            tiles: TileGrid::empty(config.width, config.height, config.tile_size),
            entities: EntityRegistry::new(),
            name: config.name,
            fill: config.fill,
            spawn_point: config.spawn_point,
            built: false,
        }
    }

    /// Populates the tile grid with `width * height` tiles of the fill material.
    ///
    /// Only the first call has an effect; later calls leave the grid untouched
    /// and return `false`.
    pub fn build(&mut self) -> bool {
        if self.built {
            debug!(world = %self.name, "world already built, ignoring rebuild");
            return false;
        }

        self.tiles.build(self.fill);
        self.built = true;
        info!(
            world = %self.name,
            tiles = self.tiles.len(),
            "tiles added to world"
        );
        true
    }

    /// Spawns `count` entities at the configured spawn point.
    ///
    /// Returns the identifiers allocated for the new entities in spawn order.
    /// Fails without spawning anything when `count` is negative or exceeds
    /// the identifiers left.
    pub fn populate(&mut self, count: i64) -> Result<Vec<EntityId>, WorldError> {
        if count < 0 {
            return Err(WorldError::InvalidArgument(format!(
                "population count must be non-negative, got {count}"
            )));
        }

        let remaining = self.entities.remaining_ids();
        if count.unsigned_abs() > remaining {
            return Err(WorldError::InvalidArgument(format!(
                "cannot spawn {count} entities, only {remaining} identifiers left"
            )));
        }

        let spawned = (0..count)
            .map(|_| self.entities.spawn(EntityKind::Zombie, self.spawn_point))
            .collect::<Result<Vec<EntityId>, WorldError>>()?;
        if !spawned.is_empty() {
            info!(
                world = %self.name,
                spawned = spawned.len(),
                total = self.entities.len(),
                "populated world"
            );
        }
        Ok(spawned)
    }

    /// Retrieves the tile stored at `index`.
    pub fn tile_at(&self, index: i64) -> Result<&Tile, WorldError> {
        self.tiles.get(index)
    }

    /// Retrieves the tile at `coord`, if the grid contains one.
    #[must_use]
    pub fn tile_at_coord(&self, coord: GridCoord) -> Option<&Tile> {
        self.tiles.at(coord)
    }

    /// Resolves the grid index of the tile at `coord`, if the grid contains one.
    #[must_use]
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        self.tiles.index_of(coord)
    }

    /// Stores `tile_type` at `index`, preserving the tile's position.
    ///
    /// Painting with [`TileType::None`] is accepted but changes nothing and
    /// yields `Ok(None)`.
    pub fn replace_tile(
        &mut self,
        index: i64,
        tile_type: TileType,
    ) -> Result<Option<TileReplacement>, WorldError> {
        let replacement = self.tiles.replace(index, tile_type)?;
        if let Some(replacement) = replacement {
            debug!(
                index = replacement.index,
                coord = %replacement.coord,
                from = %replacement.from,
                to = %replacement.to,
                "replaced tile"
            );
        }
        Ok(replacement)
    }

    /// Number of tiles currently stored in the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of entities spawned into the world.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Human readable world name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tile columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.tiles.columns()
    }

    /// Number of tile rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.tiles.rows()
    }

    /// Pixel dimensions of each tile.
    #[must_use]
    pub fn tile_size(&self) -> TileSize {
        self.tiles.tile_size()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Failed commands leave the world untouched and surface as
/// [`Event::CommandRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BuildWorld => {
            if world.build() {
                out_events.push(Event::WorldBuilt {
                    tiles: world.tile_count(),
                });
            }
        }
        Command::Populate { count } => match world.populate(count) {
            Ok(spawned) => {
                for id in spawned {
                    if let Some(entity) = world.entities.find(id) {
                        out_events.push(Event::EntitySpawned {
                            id,
                            kind: entity.kind(),
                            position: entity.position(),
                        });
                    }
                }
            }
            Err(reason) => out_events.push(Event::CommandRejected { command, reason }),
        },
        Command::ReplaceTile { index, tile_type } => match world.replace_tile(index, tile_type) {
            Ok(Some(replacement)) => out_events.push(Event::TileReplaced {
                index: replacement.index,
                coord: replacement.coord,
                from: replacement.from,
                to: replacement.to,
            }),
            Ok(None) => {}
            Err(reason) => out_events.push(Event::CommandRejected { command, reason }),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{EntityRegistry, TileGrid, World};
    use underworld_core::{PixelPoint, TileSize};

    /// Retrieves the world's name.
    #[must_use]
    pub fn name(world: &World) -> &str {
        &world.name
    }

    /// Provides read-only access to the world's tile grid.
    #[must_use]
    pub fn tiles(world: &World) -> &TileGrid {
        &world.tiles
    }

    /// Provides read-only access to the entities inhabiting the world.
    #[must_use]
    pub fn entities(world: &World) -> &EntityRegistry {
        &world.entities
    }

    /// Grid dimensions as `(columns, rows)` in tile units.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.tiles.columns(), world.tiles.rows())
    }

    /// Pixel dimensions of each tile.
    #[must_use]
    pub fn tile_size(world: &World) -> TileSize {
        world.tiles.tile_size()
    }

    /// Pixel position newly populated entities start at.
    #[must_use]
    pub fn spawn_point(world: &World) -> PixelPoint {
        world.spawn_point
    }

    /// Reports whether the grid has been built.
    #[must_use]
    pub fn is_built(world: &World) -> bool {
        world.built
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_build_reports_tile_count_once() {
        let mut world = World::new("t", 4, 3).expect("valid dimensions");
        let mut events = Vec::new();

        apply(&mut world, Command::BuildWorld, &mut events);
        apply(&mut world, Command::BuildWorld, &mut events);

        assert_eq!(events, vec![Event::WorldBuilt { tiles: 12 }]);
        assert_eq!(world.tile_count(), 12);
    }

    #[test]
    fn apply_populate_emits_one_event_per_entity() {
        let mut world = World::new("t", 2, 2).expect("valid dimensions");
        let mut events = Vec::new();

        apply(&mut world, Command::Populate { count: 3 }, &mut events);

        assert_eq!(events.len(), 3);
        for (expected, event) in events.iter().enumerate() {
            assert_eq!(
                event,
                &Event::EntitySpawned {
                    id: EntityId::new(expected as u32),
                    kind: EntityKind::Zombie,
                    position: DEFAULT_SPAWN_POINT,
                }
            );
        }
    }

    #[test]
    fn apply_rejects_negative_population() {
        let mut world = World::new("t", 2, 2).expect("valid dimensions");
        let mut events = Vec::new();

        apply(&mut world, Command::Populate { count: -1 }, &mut events);

        assert!(matches!(
            events.as_slice(),
            [Event::CommandRejected {
                reason: WorldError::InvalidArgument(_),
                ..
            }]
        ));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn apply_replace_reports_previous_type() {
        let mut world = World::new("t", 3, 3).expect("valid dimensions");
        let _ = world.build();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ReplaceTile {
                index: 4,
                tile_type: TileType::Water,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TileReplaced {
                index: 4,
                coord: GridCoord::new(1, 1),
                from: TileType::Stone,
                to: TileType::Water,
            }]
        );
    }

    #[test]
    fn apply_replace_with_none_emits_nothing() {
        let mut world = World::new("t", 3, 3).expect("valid dimensions");
        let _ = world.build();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ReplaceTile {
                index: 4,
                tile_type: TileType::None,
            },
            &mut events,
        );

        assert!(events.is_empty());
    }

    #[test]
    fn populate_is_all_or_nothing_when_identifiers_run_out() {
        let mut world = World::new("t", 1, 1).expect("valid dimensions");
        world.entities = EntityRegistry::starting_at(EntityId::new(u32::MAX - 2));

        assert!(matches!(
            world.populate(3),
            Err(WorldError::InvalidArgument(_))
        ));
        assert_eq!(world.entity_count(), 0);

        let spawned = world.populate(2).expect("two identifiers left");
        assert_eq!(
            spawned,
            vec![EntityId::new(u32::MAX - 2), EntityId::new(u32::MAX - 1)]
        );
        assert!(world.populate(1).is_err());
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn with_config_rejects_zero_tile_size() {
        let config = WorldConfig {
            tile_size: TileSize::new(0, 50),
            ..WorldConfig::default()
        };
        assert!(matches!(
            World::with_config(config),
            Err(WorldError::InvalidArgument(_))
        ));
    }

    #[test]
    fn default_config_matches_source_dimensions() {
        let config = WorldConfig::default();
        assert_eq!((config.width, config.height), (160, 100));
        assert_eq!(config.tile_size, TileSize::new(50, 50));
        assert_eq!(config.spawn_point, PixelPoint::new(400, 300));
    }
}
