//! Tile storage backing the authoritative world grid.

use underworld_core::{GridCoord, PixelPoint, TileSize, TileType, WorldError};

/// Single grid cell holding a material and its fixed position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    tile_type: TileType,
    origin: PixelPoint,
    coord: GridCoord,
}

impl Tile {
    /// Creates a tile whose grid coordinate is derived once from its pixel origin.
    fn new(tile_type: TileType, origin: PixelPoint, tile_size: TileSize) -> Self {
        Self {
            tile_type,
            origin,
            coord: tile_size.coord_of(origin),
        }
    }

    /// Material currently stored in the cell.
    #[must_use]
    pub const fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Top-left corner of the cell in world pixel space.
    #[must_use]
    pub const fn origin(&self) -> PixelPoint {
        self.origin
    }

    /// Coordinate of the cell measured in whole tiles.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }
}

/// Record of a completed tile replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileReplacement {
    /// Grid index of the replaced tile.
    pub index: usize,
    /// Coordinate of the replaced tile.
    pub coord: GridCoord,
    /// Type stored before the replacement.
    pub from: TileType,
    /// Type stored after the replacement.
    pub to: TileType,
}

/// Ordered tile storage laid out column by column.
///
/// Tiles are appended with the column as the outer loop and the row as the
/// inner loop, so the tile at `(x, y)` always lives at `x * rows + y`.
#[derive(Clone, Debug)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_size: TileSize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid description that holds no tiles yet.
    pub(crate) fn empty(columns: u32, rows: u32, tile_size: TileSize) -> Self {
        Self {
            columns,
            rows,
            tile_size,
            tiles: Vec::new(),
        }
    }

    /// Appends one tile per cell, filling each with the provided material.
    pub(crate) fn build(&mut self, fill: TileType) {
        let capacity = u64::from(self.columns) * u64::from(self.rows);
        self.tiles.reserve(usize::try_from(capacity).unwrap_or(0));

        let width = self.tile_size.width_i32();
        let height = self.tile_size.height_i32();
        for x in 0..self.columns {
            for y in 0..self.rows {
                let origin = PixelPoint::new(
                    signed(x).saturating_mul(width),
                    signed(y).saturating_mul(height),
                );
                self.tiles.push(Tile::new(fill, origin, self.tile_size));
            }
        }
    }

    /// Number of tiles currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the grid holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of columns the grid spans.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows the grid spans.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Pixel dimensions of every tile in the grid.
    #[must_use]
    pub const fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Retrieves the tile stored at `index`.
    pub fn get(&self, index: i64) -> Result<&Tile, WorldError> {
        let position = self.position(index)?;
        Ok(&self.tiles[position])
    }

    /// Stores `tile_type` at `index`, keeping the tile's origin and coordinate.
    ///
    /// Returns `Ok(None)` without touching the grid when `tile_type` is
    /// [`TileType::None`].
    pub(crate) fn replace(
        &mut self,
        index: i64,
        tile_type: TileType,
    ) -> Result<Option<TileReplacement>, WorldError> {
        let position = self.position(index)?;
        if !tile_type.is_placeable() {
            return Ok(None);
        }

        let tile = &mut self.tiles[position];
        let from = tile.tile_type;
        tile.tile_type = tile_type;
        Ok(Some(TileReplacement {
            index: position,
            coord: tile.coord,
            from,
            to: tile_type,
        }))
    }

    /// Resolves the index of the tile at `coord`, if the grid contains one.
    #[must_use]
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        let x = u32::try_from(coord.x()).ok()?;
        let y = u32::try_from(coord.y()).ok()?;
        if x >= self.columns || y >= self.rows {
            return None;
        }

        let rows = usize::try_from(self.rows).ok()?;
        let index = usize::try_from(x).ok()? * rows + usize::try_from(y).ok()?;
        let tile = self.tiles.get(index)?;
        debug_assert_eq!(tile.coord, coord, "grid construction order violated");
        Some(index)
    }

    /// Retrieves the tile at `coord`, if the grid contains one.
    #[must_use]
    pub fn at(&self, coord: GridCoord) -> Option<&Tile> {
        self.index_of(coord).map(|index| &self.tiles[index])
    }

    /// Iterates over the tiles in construction order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    fn position(&self, index: i64) -> Result<usize, WorldError> {
        usize::try_from(index)
            .ok()
            .filter(|position| *position < self.tiles.len())
            .ok_or(WorldError::OutOfRange {
                index,
                len: self.tiles.len(),
            })
    }
}

fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(columns: u32, rows: u32) -> TileGrid {
        let mut grid = TileGrid::empty(columns, rows, TileSize::new(50, 50));
        grid.build(TileType::Stone);
        grid
    }

    #[test]
    fn tile_coordinate_derives_from_origin() {
        let tile = Tile::new(
            TileType::Dirt,
            PixelPoint::new(150, 200),
            TileSize::new(50, 50),
        );
        assert_eq!(tile.coord(), GridCoord::new(3, 4));
    }

    #[test]
    fn build_uses_column_major_order() {
        let grid = built(3, 2);
        let coords: Vec<GridCoord> = grid.iter().map(Tile::coord).collect();
        assert_eq!(
            coords,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 0),
                GridCoord::new(1, 1),
                GridCoord::new(2, 0),
                GridCoord::new(2, 1),
            ]
        );
    }

    #[test]
    fn index_of_rejects_coordinates_outside_grid() {
        let grid = built(4, 3);
        assert_eq!(grid.index_of(GridCoord::new(-1, 0)), None);
        assert_eq!(grid.index_of(GridCoord::new(4, 0)), None);
        assert_eq!(grid.index_of(GridCoord::new(0, 3)), None);
        assert_eq!(grid.index_of(GridCoord::new(3, 2)), Some(11));
    }

    #[test]
    fn index_of_is_empty_before_build() {
        let grid = TileGrid::empty(4, 3, TileSize::new(50, 50));
        assert_eq!(grid.index_of(GridCoord::new(0, 0)), None);
    }

    #[test]
    fn replace_with_none_reports_no_change() {
        let mut grid = built(2, 2);
        assert_eq!(grid.replace(1, TileType::None), Ok(None));
        assert_eq!(grid.get(1).map(Tile::tile_type), Ok(TileType::Stone));
    }

    #[test]
    fn replace_with_none_still_checks_bounds() {
        let mut grid = built(2, 2);
        assert_eq!(
            grid.replace(4, TileType::None),
            Err(WorldError::OutOfRange { index: 4, len: 4 })
        );
    }
}
