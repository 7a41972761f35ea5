//! The weave pattern: a toroidal grid that tells which thread lies on top at every cell
use crate::{
    error::{ClothError, Result},
    RgbF,
};

/// A single cell of a [`PatternTable`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    /// `true` if the warp thread lies above the weft thread in this cell
    pub warp_above: bool,

    /// The color of the visible thread, gamma encoded (sRGB)
    pub color: RgbF,
}

/// Number of cells a thread segment extends from a starting cell, not counting the cell itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentSteps {
    /// cells in decreasing direction
    pub left: usize,
    /// cells in increasing direction
    pub right: usize,
}

impl SegmentSteps {
    /// Number of cells covered by the whole segment
    #[must_use]
    pub const fn cells(self) -> usize {
        self.left + self.right + 1
    }
}

/// An immutable, row-major grid of [`PaletteEntry`]s. Indices wrap around in both directions.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternTable {
    width: usize,
    height: usize,
    entries: Vec<PaletteEntry>,
}

impl PatternTable {
    /// Creates a table from row-major entries.
    ///
    /// # Errors
    /// Fails if either dimension is zero or the entry count is not `width * height`.
    pub fn new(width: usize, height: usize, entries: Vec<PaletteEntry>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ClothError::EmptyPattern { width, height });
        }
        let expected = width * height;
        if entries.len() != expected {
            return Err(ClothError::PatternSizeMismatch {
                width,
                height,
                expected,
                found: entries.len(),
            });
        }
        Ok(Self {
            width,
            height,
            entries,
        })
    }

    /// Creates a table from a draft of which thread lies on top. Cells where the warp is on top
    /// get `warp_color`, all others `weft_color`.
    ///
    /// # Errors
    /// See [`PatternTable::new`].
    pub fn from_weave(
        width: usize,
        height: usize,
        warp_above: &[bool],
        warp_color: RgbF,
        weft_color: RgbF,
    ) -> Result<Self> {
        let entries = warp_above
            .iter()
            .map(|&warp_above| PaletteEntry {
                warp_above,
                color: if warp_above { warp_color } else { weft_color },
            })
            .collect();
        Self::new(width, height, entries)
    }

    /// The built in 3x3 twill-like pattern in light gray
    #[must_use]
    pub fn polyester() -> Self {
        let gray = RgbF::splat(0.7);
        let warp_above = [
            false, true, true, //
            true, false, true, //
            true, true, false,
        ];
        let entries = warp_above
            .iter()
            .map(|&warp_above| PaletteEntry {
                warp_above,
                color: gray,
            })
            .collect();
        Self {
            width: 3,
            height: 3,
            entries,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the entry at `(x, y)`, wrapping both coordinates
    #[must_use]
    pub fn entry(&self, x: usize, y: usize) -> PaletteEntry {
        self.entries[(x % self.width) + (y % self.height) * self.width]
    }

    /// Walks from `(x, y)` along the thread that is on top there and counts how many cells in both
    /// directions belong to the same segment. The walk follows the y axis if the warp is on top and
    /// the x axis otherwise. A segment is never longer than one full row or column, so
    /// `left + right < size` always holds.
    #[must_use]
    pub fn locate_segment(&self, warp_above: bool, x: usize, y: usize) -> SegmentSteps {
        let (size, start) = if warp_above {
            (self.height, y % self.height)
        } else {
            (self.width, x % self.width)
        };
        let matches = |coord: usize| {
            let entry = if warp_above {
                self.entry(x, coord)
            } else {
                self.entry(coord, y)
            };
            entry.warp_above == warp_above
        };

        let right = (1..size)
            .map(|step| (start + step) % size)
            .take_while(|&coord| matches(coord))
            .count();
        // a thread that never leaves the top is one segment spanning the whole dimension
        let left = (1..size - right)
            .map(|step| (start + size - step) % size)
            .take_while(|&coord| matches(coord))
            .count();

        SegmentSteps { left, right }
    }
}
