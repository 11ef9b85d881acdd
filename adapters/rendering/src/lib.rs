#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Underworld adapters.
//!
//! Renderers never read the world directly. Between input passes the adapter
//! captures a [`Scene`], an immutable snapshot of the visible tiles, entities
//! and toolbar slots, and hands it to a [`RenderingBackend`].

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use glam::IVec2;
use underworld_core::{
    CameraOffset, EntityId, EntityKind, GridCoord, PaletteSlot, PixelPoint, TileColor, TileSize,
    TileType,
};
use underworld_system_editor::ToolbarSelection;
use underworld_world::{query, World};

/// Glyph drawn for cells holding at least one entity.
const ENTITY_GLYPH: char = 'Z';

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<TileColor> for Color {
    fn from(color: TileColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Screen area, in pixels, that a frame covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Width of the visible area in pixels.
    pub width: u32,
    /// Height of the visible area in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn size(&self) -> IVec2 {
        IVec2::new(clamp_to_i32(self.width), clamp_to_i32(self.height))
    }
}

/// Immutable snapshot of a visible tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTile {
    /// Grid coordinate of the tile.
    pub coord: GridCoord,
    /// Material stored in the tile.
    pub tile_type: TileType,
    /// Top-left corner of the tile in screen pixels.
    pub screen: IVec2,
    /// Fill colour for the tile.
    pub color: Color,
}

/// Immutable snapshot of a visible entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneEntity {
    /// Identifier allocated to the entity by the world.
    pub id: EntityId,
    /// Kind of entity.
    pub kind: EntityKind,
    /// Entity position in screen pixels.
    pub screen: IVec2,
}

/// Immutable snapshot of a toolbar slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSlot {
    /// Position of the slot within the palette.
    pub slot: PaletteSlot,
    /// Tile type the slot paints.
    pub tile_type: TileType,
    /// Whether the slot is the active one.
    pub active: bool,
    /// Swatch colour, lightened for the active slot.
    pub color: Color,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Pixel dimensions of each tile.
    pub tile_size: TileSize,
    /// Screen area covered by the frame.
    pub viewport: Viewport,
    /// Camera offset the snapshot was taken with.
    pub camera: CameraOffset,
    /// Tiles intersecting the viewport, in grid construction order.
    pub tiles: Vec<SceneTile>,
    /// Entities inside the viewport, in spawn order.
    pub entities: Vec<SceneEntity>,
    /// All toolbar slots in palette order.
    pub toolbar: Vec<SceneSlot>,
}

impl Scene {
    /// Captures the parts of the world visible through `viewport` under `camera`.
    #[must_use]
    pub fn capture(
        world: &World,
        toolbar: &ToolbarSelection,
        camera: CameraOffset,
        viewport: Viewport,
    ) -> Self {
        let tile_size = query::tile_size(world);
        let extent = IVec2::new(tile_size.width_i32(), tile_size.height_i32());
        let bounds = viewport.size();

        let tiles = query::tiles(world)
            .iter()
            .filter_map(|tile| {
                let screen = to_screen(tile.origin(), camera);
                let visible = (screen + extent).cmpgt(IVec2::ZERO).all()
                    && screen.cmplt(bounds).all();
                visible.then(|| SceneTile {
                    coord: tile.coord(),
                    tile_type: tile.tile_type(),
                    screen,
                    color: tile.tile_type().color().into(),
                })
            })
            .collect();

        let entities = query::entities(world)
            .iter()
            .filter_map(|entity| {
                let screen = to_screen(entity.position(), camera);
                let visible = screen.cmpge(IVec2::ZERO).all() && screen.cmplt(bounds).all();
                visible.then(|| SceneEntity {
                    id: entity.id(),
                    kind: entity.kind(),
                    screen,
                })
            })
            .collect();

        let toolbar = toolbar
            .slots()
            .map(|state| {
                let swatch = Color::from(state.tile_type.color());
                SceneSlot {
                    slot: state.slot,
                    tile_type: state.tile_type,
                    active: state.active,
                    color: if state.active {
                        swatch.lighten(0.35)
                    } else {
                        swatch
                    },
                }
            })
            .collect();

        Self {
            tile_size,
            viewport,
            camera,
            tiles,
            entities,
            toolbar,
        }
    }

    /// Toolbar slot that is currently active.
    #[must_use]
    pub fn active_slot(&self) -> Option<&SceneSlot> {
        self.toolbar.iter().find(|slot| slot.active)
    }

    /// Status text reporting the active palette slot and the type it paints.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.active_slot() {
            Some(slot) => format!("Selected slot {}: {}", slot.slot, slot.tile_type),
            None => "No slot selected".to_owned(),
        }
    }
}

/// Interface implemented by presentation adapters.
pub trait RenderingBackend {
    /// Draws one frame from the provided snapshot.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend that draws each frame as one glyph per tile into a writer.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing frames to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the backend, yielding the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let extent = IVec2::new(scene.tile_size.width_i32(), scene.tile_size.height_i32());
        let cells = scene.viewport.size() / extent;
        let columns = usize::try_from(cells.x).unwrap_or(0);
        let rows = usize::try_from(cells.y).unwrap_or(0);
        let mut glyphs = vec![vec![' '; columns]; rows];

        let mut plot = |screen: IVec2, glyph: char| {
            let cell = IVec2::new(
                screen.x.div_euclid(extent.x),
                screen.y.div_euclid(extent.y),
            );
            if let (Ok(column), Ok(row)) = (usize::try_from(cell.x), usize::try_from(cell.y)) {
                if let Some(slot) = glyphs.get_mut(row).and_then(|line| line.get_mut(column)) {
                    *slot = glyph;
                }
            }
        };

        for tile in &scene.tiles {
            if tile.screen.cmpge(IVec2::ZERO).all() {
                plot(tile.screen, tile.tile_type.glyph());
            }
        }
        for entity in &scene.entities {
            plot(entity.screen, ENTITY_GLYPH);
        }

        for line in glyphs {
            let line: String = line.into_iter().collect();
            writeln!(self.out, "{}", line.trim_end()).context("failed to write map row")?;
        }
        writeln!(self.out, "{}", scene.status_line()).context("failed to write status line")?;
        self.out.flush().context("failed to flush frame")?;
        Ok(())
    }
}

fn to_screen(point: PixelPoint, camera: CameraOffset) -> IVec2 {
    IVec2::new(
        point.x().saturating_add(camera.x()),
        point.y().saturating_add(camera.y()),
    )
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_world(width: u32, height: u32) -> World {
        let mut world = World::new("t", width, height).expect("valid dimensions");
        let _ = world.build();
        world
    }

    #[test]
    fn lighten_moves_towards_white() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(0.5);
        assert!((color.red - 0.5).abs() < f32::EPSILON);
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn capture_culls_tiles_outside_viewport() {
        let world = built_world(10, 10);
        let toolbar = ToolbarSelection::default();

        let scene = Scene::capture(
            &world,
            &toolbar,
            CameraOffset::ZERO,
            Viewport::new(100, 50),
        );

        let coords: Vec<GridCoord> = scene.tiles.iter().map(|tile| tile.coord).collect();
        assert_eq!(coords, vec![GridCoord::new(0, 0), GridCoord::new(1, 0)]);
    }

    #[test]
    fn capture_translates_by_camera_offset() {
        let world = built_world(10, 10);
        let toolbar = ToolbarSelection::default();

        let scene = Scene::capture(
            &world,
            &toolbar,
            CameraOffset::new(-50, 0),
            Viewport::new(50, 50),
        );

        assert_eq!(scene.tiles.len(), 1);
        assert_eq!(scene.tiles[0].coord, GridCoord::new(1, 0));
        assert_eq!(scene.tiles[0].screen, IVec2::ZERO);
    }

    #[test]
    fn status_line_names_active_slot() {
        let world = built_world(1, 1);
        let mut toolbar = ToolbarSelection::default();
        let _ = toolbar.select_slot(PaletteSlot::new(2).expect("slot in range"));

        let scene = Scene::capture(&world, &toolbar, CameraOffset::ZERO, Viewport::new(50, 50));

        assert_eq!(scene.status_line(), "Selected slot 2: GRASS");
        assert_eq!(scene.toolbar.iter().filter(|slot| slot.active).count(), 1);
    }

    #[test]
    fn text_backend_draws_one_glyph_per_tile() {
        let mut world = built_world(3, 2);
        let _ = world.replace_tile(1, TileType::Water).expect("index inside grid");
        let _ = world.populate(1).expect("non-negative count");
        let toolbar = ToolbarSelection::default();
        let scene = Scene::capture(&world, &toolbar, CameraOffset::ZERO, Viewport::new(150, 100));

        let mut backend = TextBackend::new(Vec::new());
        backend.present(&scene).expect("writing to a vec succeeds");
        let output = String::from_utf8(backend.into_inner()).expect("utf-8 output");

        assert_eq!(output, "###\n~##\nSelected slot 0: STONE\n");
    }
}
