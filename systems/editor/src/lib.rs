#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Editor system that turns number keys and clicks into palette changes and tile edits.

mod camera;
mod toolbar;

use thiserror::Error;
use tracing::{debug, trace, warn};
use underworld_core::{
    CameraOffset, CoreError, GridCoord, PaletteSlot, PixelPoint, TileSize, TileType,
};
use underworld_world::{TileReplacement, World};

pub use camera::{Camera, PanDirection};
pub use toolbar::{SlotState, ToolbarSelection};

/// Raw input delivered by the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A number key was pressed; carries the digit `0..=9`.
    DigitKey(u8),
    /// The primary mouse button was clicked at a screen position.
    PrimaryClick(PixelPoint),
    /// Any other mouse button was clicked; not part of the edit protocol.
    SecondaryClick(PixelPoint),
    /// A key was released; not part of the edit protocol.
    KeyReleased,
    /// A movement key requested a viewport pan.
    Pan(PanDirection),
}

/// Result of resolving a primary click against the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The clicked tile now holds the current palette type.
    Painted(TileReplacement),
    /// The click resolved to a coordinate the grid does not contain.
    OutsideGrid {
        /// Coordinate the click resolved to.
        coord: GridCoord,
    },
    /// The click hit a tile but the active slot paints nothing.
    NothingSelected {
        /// Coordinate the click resolved to.
        coord: GridCoord,
    },
}

/// Effect of a single input event, reported in delivery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// A palette slot became active.
    Selected {
        /// Slot that became active.
        slot: PaletteSlot,
        /// Tile type that clicks now paint.
        tile_type: TileType,
    },
    /// A primary click was resolved.
    Clicked(ClickOutcome),
    /// The viewport moved.
    Panned(CameraOffset),
    /// The event is not part of the edit protocol.
    Ignored,
}

/// Contract violations raised by the editor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    /// The caller supplied an argument outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<CoreError> for EditError {
    fn from(error: CoreError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

/// Bridges raw input to the toolbar selection and the world grid.
///
/// Borrows the world and the toolbar for the duration of one input pass, so
/// no renderer can observe a partially applied event.
#[derive(Debug)]
pub struct EditController<'a> {
    world: &'a mut World,
    toolbar: &'a mut ToolbarSelection,
}

impl<'a> EditController<'a> {
    /// Creates a controller operating on the provided world and toolbar.
    pub fn new(world: &'a mut World, toolbar: &'a mut ToolbarSelection) -> Self {
        Self { world, toolbar }
    }

    /// Selects the palette slot addressed by a number key and returns the new current type.
    pub fn on_digit_key_pressed(&mut self, digit: u8) -> Result<TileType, EditError> {
        let slot = PaletteSlot::from_digit_key(digit)?;
        Ok(self.toolbar.select_slot(slot))
    }

    /// Paints the tile under a screen position with the current palette type.
    ///
    /// Clicks that resolve outside the grid, or that land while the active
    /// slot paints nothing, leave the world untouched.
    pub fn on_primary_click(&mut self, screen: PixelPoint, camera: CameraOffset) -> ClickOutcome {
        let coord = resolve_click(screen, camera, self.world.tile_size());
        let Some(index) = self.world.index_of(coord) else {
            trace!(coord = %coord, "click outside grid ignored");
            return ClickOutcome::OutsideGrid { coord };
        };

        let current = self.toolbar.current_type();
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        match self.world.replace_tile(index, current) {
            Ok(Some(replacement)) => {
                debug!(
                    tile_type = %replacement.to,
                    coord = %replacement.coord,
                    "placed tile"
                );
                ClickOutcome::Painted(replacement)
            }
            Ok(None) => {
                trace!(coord = %coord, "no tile type selected, click ignored");
                ClickOutcome::NothingSelected { coord }
            }
            Err(error) => {
                // index_of only yields indices inside the grid.
                debug_assert!(false, "resolved index {index} rejected: {error}");
                warn!(coord = %coord, %error, "resolved tile rejected the edit");
                ClickOutcome::OutsideGrid { coord }
            }
        }
    }

    /// Processes events strictly in delivery order, applying each fully before the next.
    ///
    /// Stops at the first contract violation; events before it stay applied.
    pub fn handle(
        &mut self,
        events: &[InputEvent],
        camera: &mut Camera,
    ) -> Result<Vec<EditOutcome>, EditError> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            let outcome = match *event {
                InputEvent::DigitKey(digit) => {
                    let tile_type = self.on_digit_key_pressed(digit)?;
                    EditOutcome::Selected {
                        slot: self.toolbar.active_slot(),
                        tile_type,
                    }
                }
                InputEvent::PrimaryClick(screen) => {
                    EditOutcome::Clicked(self.on_primary_click(screen, camera.offset()))
                }
                InputEvent::Pan(direction) => EditOutcome::Panned(camera.pan(direction)),
                InputEvent::SecondaryClick(_) | InputEvent::KeyReleased => EditOutcome::Ignored,
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Selection state the controller mutates.
    #[must_use]
    pub fn toolbar(&self) -> &ToolbarSelection {
        &*self.toolbar
    }

    /// World the controller edits.
    #[must_use]
    pub fn world(&self) -> &World {
        &*self.world
    }
}

/// Maps a screen pixel to the grid coordinate under it.
///
/// The screen position is floored to whole tiles and the camera offset is
/// rounded up to whole tiles before subtracting, so partially scrolled tiles
/// count as scrolled.
#[must_use]
pub fn resolve_click(screen: PixelPoint, camera: CameraOffset, tile_size: TileSize) -> GridCoord {
    let width = i64::from(tile_size.width_i32());
    let height = i64::from(tile_size.height_i32());
    let x = i64::from(screen.x()).div_euclid(width) - ceil_div(i64::from(camera.x()), width);
    let y = i64::from(screen.y()).div_euclid(height) - ceil_div(i64::from(camera.y()), height);
    GridCoord::new(saturate(x), saturate(y))
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    -(-value).div_euclid(divisor)
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
