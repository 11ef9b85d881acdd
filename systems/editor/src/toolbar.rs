//! Palette selection state driven by number keys.

use tracing::debug;
use underworld_core::{Palette, PaletteSlot, TileType};

/// Presentation snapshot of a single toolbar slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotState {
    /// Position of the slot within the palette.
    pub slot: PaletteSlot,
    /// Tile type the slot paints.
    pub tile_type: TileType,
    /// Whether the slot is the active one.
    pub active: bool,
}

/// Tracks which palette slot is active and therefore which tile type clicks paint.
///
/// Exactly one slot is active at any time. The active slot is stored rather
/// than one flag per slot, so the exclusivity holds by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolbarSelection {
    palette: Palette,
    active: PaletteSlot,
}

impl Default for ToolbarSelection {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl ToolbarSelection {
    /// Creates a selection over `palette` with the first slot active.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self {
            palette,
            active: PaletteSlot::FIRST,
        }
    }

    /// Deactivates every slot, activates `slot`, and returns the type it paints.
    pub fn select_slot(&mut self, slot: PaletteSlot) -> TileType {
        self.active = slot;
        let current = self.current_type();
        debug!(slot = %slot, tile_type = %current, "selected palette slot");
        current
    }

    /// Slot that is currently active.
    #[must_use]
    pub const fn active_slot(&self) -> PaletteSlot {
        self.active
    }

    /// Reports whether `slot` is the active slot.
    #[must_use]
    pub fn is_active(&self, slot: PaletteSlot) -> bool {
        self.active == slot
    }

    /// Tile type painted by clicks, always the active slot's entry.
    #[must_use]
    pub fn current_type(&self) -> TileType {
        self.palette.tile_type(self.active)
    }

    /// Palette backing the toolbar.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Iterates over all ten slots in palette order.
    pub fn slots(&self) -> impl Iterator<Item = SlotState> + '_ {
        PaletteSlot::all().map(move |slot| SlotState {
            slot,
            tile_type: self.palette.tile_type(slot),
            active: self.is_active(slot),
        })
    }
}
