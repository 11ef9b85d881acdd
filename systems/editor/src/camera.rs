//! Viewport panning.

use underworld_core::{CameraOffset, TileSize};

/// Direction a pan request moves the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanDirection {
    /// Reveal rows above the current view.
    Up,
    /// Reveal rows below the current view.
    Down,
    /// Reveal columns left of the current view.
    Left,
    /// Reveal columns right of the current view.
    Right,
}

/// Viewport translation applied when mapping screen pixels to world tiles.
///
/// Moving the view right draws the world further left, so panning right
/// decreases the horizontal offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    offset: CameraOffset,
    step: i32,
}

impl Camera {
    /// Creates a camera at the world origin that pans `step` pixels per request.
    #[must_use]
    pub const fn new(step: i32) -> Self {
        Self {
            offset: CameraOffset::ZERO,
            step,
        }
    }

    /// Creates a camera at the world origin that pans one tile width per request.
    #[must_use]
    pub fn tile_stepped(tile_size: TileSize) -> Self {
        Self::new(tile_size.width_i32())
    }

    /// Returns the camera moved to an explicit offset.
    #[must_use]
    pub fn with_offset(mut self, offset: CameraOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Current viewport offset.
    #[must_use]
    pub const fn offset(&self) -> CameraOffset {
        self.offset
    }

    /// Moves the view one step and returns the new offset.
    pub fn pan(&mut self, direction: PanDirection) -> CameraOffset {
        let (dx, dy) = match direction {
            PanDirection::Up => (0, self.step),
            PanDirection::Down => (0, -self.step),
            PanDirection::Left => (self.step, 0),
            PanDirection::Right => (-self.step, 0),
        };
        self.offset = self.offset.translated(dx, dy);
        self.offset
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::tile_stepped(TileSize::default())
    }
}
