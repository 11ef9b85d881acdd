#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Underworld editor.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and the editor system. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually changed. Tile content is a closed [`TileType`] enumeration whose
//! per-variant behaviour lives in match tables rather than in distinct types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of selectable slots exposed by the toolbar palette.
pub const PALETTE_SLOTS: usize = 10;

/// Pixel dimensions of a tile when no configuration overrides them.
pub const DEFAULT_TILE_SIZE: TileSize = TileSize::new(50, 50);

/// Paintable material stored in a grid cell.
///
/// [`TileType::None`] is the palette sentinel meaning "do not alter this cell".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    /// Empty palette entry; painting with it leaves cells untouched.
    #[default]
    None,
    /// Solid rock, the material freshly built worlds are filled with.
    Stone,
    /// Loose soil.
    Dirt,
    /// Soil covered in grass.
    Grass,
    /// Still water.
    Water,
    /// Molten rock.
    Lava,
}

impl TileType {
    /// Every variant in declaration order.
    pub const ALL: [TileType; 6] = [
        TileType::None,
        TileType::Stone,
        TileType::Dirt,
        TileType::Grass,
        TileType::Water,
        TileType::Lava,
    ];

    /// Upper-case label used by status displays and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Stone => "STONE",
            Self::Dirt => "DIRT",
            Self::Grass => "GRASS",
            Self::Water => "WATER",
            Self::Lava => "LAVA",
        }
    }

    /// Fill colour renderers use for the tile.
    #[must_use]
    pub const fn color(self) -> TileColor {
        match self {
            Self::None => TileColor::from_rgb(0x00, 0x00, 0x00),
            Self::Stone => TileColor::from_rgb(0x80, 0x80, 0x80),
            Self::Dirt => TileColor::from_rgb(0x8b, 0x5a, 0x2b),
            Self::Grass => TileColor::from_rgb(0x3c, 0xb3, 0x41),
            Self::Water => TileColor::from_rgb(0x1e, 0x64, 0xd2),
            Self::Lava => TileColor::from_rgb(0xe6, 0x50, 0x0f),
        }
    }

    /// Single character glyph used by text previews of the grid.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::None => ' ',
            Self::Stone => '#',
            Self::Dirt => ':',
            Self::Grass => '"',
            Self::Water => '~',
            Self::Lava => '^',
        }
    }

    /// Reports whether painting with this type alters a cell.
    #[must_use]
    pub const fn is_placeable(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TileType {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "null" => Ok(Self::None),
            "stone" => Ok(Self::Stone),
            "dirt" => Ok(Self::Dirt),
            "grass" => Ok(Self::Grass),
            "water" => Ok(Self::Water),
            "lava" => Ok(Self::Lava),
            _ => Err(CoreError::UnknownTileType(value.to_owned())),
        }
    }
}

/// Opaque RGB colour attached to a tile type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl TileColor {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Pixel dimensions of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSize {
    width: u32,
    height: u32,
}

impl TileSize {
    /// Creates a tile size from explicit pixel dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of a tile in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of a tile in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Fails when either dimension is zero, since pixel-to-tile division would be undefined.
    pub fn validate(self) -> Result<Self, CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidArgument(format!(
                "tile size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(self)
    }

    /// Fails when a `columns` by `rows` grid of these tiles would place a
    /// pixel edge beyond `i32::MAX`.
    pub fn validate_extent(self, columns: u32, rows: u32) -> Result<Self, CoreError> {
        let limit = u64::from(i32::MAX.unsigned_abs());
        let span_x = u64::from(columns) * u64::from(self.width);
        let span_y = u64::from(rows) * u64::from(self.height);
        if span_x > limit || span_y > limit {
            return Err(CoreError::InvalidArgument(format!(
                "{columns}x{rows} grid of {}x{} tiles exceeds the pixel range",
                self.width, self.height
            )));
        }
        Ok(self)
    }

    /// Pixel origin of the tile at the provided grid coordinate.
    #[must_use]
    pub fn origin_of(&self, coord: GridCoord) -> PixelPoint {
        PixelPoint::new(
            coord.x().saturating_mul(self.width_i32()),
            coord.y().saturating_mul(self.height_i32()),
        )
    }

    /// Grid coordinate of the tile whose origin is the provided pixel point.
    ///
    /// Uses flooring division so that negative pixels map to negative tiles.
    #[must_use]
    pub fn coord_of(&self, origin: PixelPoint) -> GridCoord {
        GridCoord::new(
            origin.x().div_euclid(self.width_i32()),
            origin.y().div_euclid(self.height_i32()),
        )
    }

    /// Tile width as a signed pixel distance.
    #[must_use]
    pub fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX).max(1)
    }

    /// Tile height as a signed pixel distance.
    #[must_use]
    pub fn height_i32(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX).max(1)
    }
}

impl Default for TileSize {
    fn default() -> Self {
        DEFAULT_TILE_SIZE
    }
}

/// Location of a tile expressed in whole tile units.
///
/// Signed so that coordinates resolved from clicks left of or above the grid
/// remain representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: i32,
    y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Location expressed in pixels, either in world or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    x: i32,
    y: i32,
}

impl PixelPoint {
    /// Creates a new pixel point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Translation of the viewport relative to the world origin, in pixels.
///
/// A world drawn `offset` pixels away from the screen origin; negative values
/// mean the view has scrolled right or down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraOffset {
    x: i32,
    y: i32,
}

impl CameraOffset {
    /// Camera aligned with the world origin.
    pub const ZERO: CameraOffset = CameraOffset::new(0, 0);

    /// Creates a camera offset.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal offset in pixels.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical offset in pixels.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the offset shifted by the provided pixel deltas.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Unique identifier assigned to a spawned entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of actors that can be spawned into a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Shambling hostile; the only kind the world populates itself with.
    #[default]
    Zombie,
}

impl EntityKind {
    /// Name tag given to entities of this kind at spawn time.
    #[must_use]
    pub const fn name_tag(self) -> &'static str {
        match self {
            Self::Zombie => "Zombie",
        }
    }
}

/// One of the ten toolbar positions, zero-indexed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct PaletteSlot(u8);

impl TryFrom<u8> for PaletteSlot {
    type Error = CoreError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(index))
    }
}

impl PaletteSlot {
    /// Slot that is active when the editor starts.
    pub const FIRST: PaletteSlot = PaletteSlot(0);

    /// Creates a slot, failing when the index lies outside `0..=9`.
    pub fn new(index: usize) -> Result<Self, CoreError> {
        if index >= PALETTE_SLOTS {
            return Err(CoreError::InvalidArgument(format!(
                "palette slot {index} outside 0..={}",
                PALETTE_SLOTS - 1
            )));
        }
        let value = u8::try_from(index)
            .map_err(|_| CoreError::InvalidArgument(format!("palette slot {index} overflows")))?;
        Ok(Self(value))
    }

    /// Resolves the slot addressed by a number key.
    ///
    /// The palette is one-indexed for the user: `1` selects slot 0 and `9`
    /// selects slot 8, while `0` wraps around to the last slot.
    pub fn from_digit_key(digit: u8) -> Result<Self, CoreError> {
        match digit {
            0 => Ok(Self(9)),
            1..=9 => Ok(Self(digit - 1)),
            _ => Err(CoreError::InvalidArgument(format!(
                "digit key {digit} outside 0..=9"
            ))),
        }
    }

    /// Zero-based index of the slot.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Iterator over every slot in palette order.
    pub fn all() -> impl Iterator<Item = PaletteSlot> {
        (0..PALETTE_SLOTS as u8).map(PaletteSlot)
    }
}

impl fmt::Display for PaletteSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed mapping from palette slots to the tile type each one paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Palette {
    entries: [TileType; PALETTE_SLOTS],
}

impl Palette {
    /// Builds a palette from up to ten types, leaving remaining slots empty.
    pub fn from_types(types: &[TileType]) -> Result<Self, CoreError> {
        if types.len() > PALETTE_SLOTS {
            return Err(CoreError::InvalidArgument(format!(
                "palette holds {PALETTE_SLOTS} slots, got {} entries",
                types.len()
            )));
        }
        let mut entries = [TileType::None; PALETTE_SLOTS];
        entries[..types.len()].copy_from_slice(types);
        Ok(Self { entries })
    }

    /// Tile type painted while the provided slot is active.
    #[must_use]
    pub fn tile_type(&self, slot: PaletteSlot) -> TileType {
        self.entries[slot.index()]
    }

    /// Entries in slot order.
    #[must_use]
    pub fn entries(&self) -> &[TileType; PALETTE_SLOTS] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut entries = [TileType::None; PALETTE_SLOTS];
        entries[0] = TileType::Stone;
        entries[1] = TileType::Dirt;
        entries[2] = TileType::Grass;
        entries[3] = TileType::Water;
        entries[4] = TileType::Lava;
        Self { entries }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fills the world's tile grid for the first time.
    BuildWorld,
    /// Spawns the requested number of entities at the configured spawn point.
    Populate {
        /// Number of entities to spawn; negative counts are rejected.
        count: i64,
    },
    /// Swaps the type stored at a grid index, keeping the tile's position.
    ReplaceTile {
        /// Position of the tile within the grid's construction order.
        index: i64,
        /// Material to store; [`TileType::None`] leaves the tile unchanged.
        tile_type: TileType,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was constructed.
    WorldBuilt {
        /// Number of tiles the grid now holds.
        tiles: usize,
    },
    /// Confirms that an entity joined the registry.
    EntitySpawned {
        /// Identifier allocated for the entity.
        id: EntityId,
        /// Kind of entity that was spawned.
        kind: EntityKind,
        /// Pixel position the entity was spawned at.
        position: PixelPoint,
    },
    /// Confirms that a tile took on a new type.
    TileReplaced {
        /// Grid index of the tile.
        index: usize,
        /// Grid coordinate of the tile, unchanged by the replacement.
        coord: GridCoord,
        /// Type stored before the replacement.
        from: TileType,
        /// Type stored after the replacement.
        to: TileType,
    },
    /// Reports that a command failed validation and changed nothing.
    CommandRejected {
        /// Command that was rejected.
        command: Command,
        /// Reason the world refused the command.
        reason: WorldError,
    },
}

/// Failures raised by direct world accessors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The index lies outside the addressed collection.
    #[error("index {index} out of range for {len} elements")]
    OutOfRange {
        /// Index supplied by the caller.
        index: i64,
        /// Number of elements in the collection.
        len: usize,
    },
    /// The caller supplied an argument that violates the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Failures raised while constructing core values.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The value violates the constructor's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The name does not match any tile type.
    #[error("unknown tile type '{0}'")]
    UnknownTileType(String),
}

impl From<CoreError> for WorldError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidArgument(message) => Self::InvalidArgument(message),
            CoreError::UnknownTileType(name) => {
                Self::InvalidArgument(format!("unknown tile type '{name}'"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn palette_round_trips_through_bincode() {
        assert_round_trip(&Palette::default());
    }

    #[test]
    fn slot_deserialization_enforces_bounds() {
        assert_round_trip(&PaletteSlot::new(9).expect("slot in range"));
        assert!(bincode::deserialize::<PaletteSlot>(&[42]).is_err());
        assert!(bincode::deserialize::<PaletteSlot>(&[10]).is_err());
    }

    #[test]
    fn digit_keys_map_to_one_indexed_slots() {
        assert_eq!(PaletteSlot::from_digit_key(1).unwrap().index(), 0);
        assert_eq!(PaletteSlot::from_digit_key(5).unwrap().index(), 4);
        assert_eq!(PaletteSlot::from_digit_key(9).unwrap().index(), 8);
        assert_eq!(PaletteSlot::from_digit_key(0).unwrap().index(), 9);
    }

    #[test]
    fn digit_keys_beyond_nine_are_rejected() {
        assert!(matches!(
            PaletteSlot::from_digit_key(10),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn slot_constructor_bounds_index() {
        assert!(PaletteSlot::new(9).is_ok());
        assert!(PaletteSlot::new(10).is_err());
        assert_eq!(PaletteSlot::all().count(), PALETTE_SLOTS);
    }

    #[test]
    fn default_palette_wires_five_materials() {
        let palette = Palette::default();
        assert_eq!(
            &palette.entries()[..5],
            &[
                TileType::Stone,
                TileType::Dirt,
                TileType::Grass,
                TileType::Water,
                TileType::Lava,
            ]
        );
        assert!(palette.entries()[5..]
            .iter()
            .all(|entry| *entry == TileType::None));
    }

    #[test]
    fn palette_from_types_pads_with_none() {
        let palette = Palette::from_types(&[TileType::Lava, TileType::Water]).unwrap();
        assert_eq!(palette.tile_type(PaletteSlot::new(0).unwrap()), TileType::Lava);
        assert_eq!(palette.tile_type(PaletteSlot::new(1).unwrap()), TileType::Water);
        assert_eq!(palette.tile_type(PaletteSlot::new(2).unwrap()), TileType::None);
    }

    #[test]
    fn palette_from_types_rejects_overflow() {
        let types = [TileType::Stone; PALETTE_SLOTS + 1];
        assert!(Palette::from_types(&types).is_err());
    }

    #[test]
    fn tile_type_parses_case_insensitively() {
        assert_eq!("Lava".parse::<TileType>().unwrap(), TileType::Lava);
        assert_eq!(" GRASS ".parse::<TileType>().unwrap(), TileType::Grass);
        assert_eq!("null".parse::<TileType>().unwrap(), TileType::None);
        assert!("marble".parse::<TileType>().is_err());
    }

    #[test]
    fn only_none_is_not_placeable() {
        for tile_type in TileType::ALL {
            assert_eq!(tile_type.is_placeable(), tile_type != TileType::None);
        }
    }

    #[test]
    fn tile_size_converts_between_origin_and_coord() {
        let size = TileSize::new(50, 40);
        let origin = size.origin_of(GridCoord::new(3, 4));
        assert_eq!(origin, PixelPoint::new(150, 160));
        assert_eq!(size.coord_of(origin), GridCoord::new(3, 4));
        assert_eq!(size.coord_of(PixelPoint::new(-1, -41)), GridCoord::new(-1, -2));
    }

    #[test]
    fn grid_extent_must_fit_pixel_range() {
        let size = TileSize::new(1_000_000, 1);
        assert!(size.validate_extent(2147, 1).is_ok());
        assert!(matches!(
            size.validate_extent(2148, 1),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(TileSize::new(1, 2).validate_extent(1, 1_073_741_824).is_err());
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        assert!(TileSize::new(0, 50).validate().is_err());
        assert!(DEFAULT_TILE_SIZE.validate().is_ok());
    }
}
