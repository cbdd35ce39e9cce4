//! Grid coordinates for the combat board.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Integer position on the combat grid.
///
/// The board is laid out as hex cells addressed by a square `(x, y)` pair.
/// Distance between cells is the Chebyshev distance, so a diagonal step costs
/// the same as an orthogonal one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(C)]
pub struct GridPos {
    /// X coordinate in grid cells
    pub x: i32,
    /// Y coordinate in grid cells
    pub y: i32,
}

impl GridPos {
    /// Origin of the grid.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance to another cell: `max(|dx|, |dy|)`.
    #[must_use]
    pub const fn distance_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// Position one cell closer to `target`.
    ///
    /// Each axis moves by `signum(target - self)`, so the result is the
    /// same cell when already there.
    #[must_use]
    pub const fn step_toward(self, target: Self) -> Self {
        Self {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    /// Checks whether `other` is within `range` cells.
    #[must_use]
    pub const fn is_within(self, other: Self, range: u32) -> bool {
        self.distance_to(other) <= range
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
