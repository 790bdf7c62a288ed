#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A double-width character at `x` is always followed by a continuation
//!    cell at `x + 1`; overwriting either half clears the other.

use crate::cell::Cell;
use cform_core::geometry::Rect;

/// A 2D grid of terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer filled with empty cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Write a cell, keeping wide characters consistent.
    ///
    /// A double-width character that would straddle the right edge is not
    /// drawn.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let width = cell.width();
        if width > 1 && x.saturating_add(1) >= self.width {
            return;
        }

        self.clear_wide_neighbors(x, y);
        if width > 1 {
            self.clear_wide_neighbors(x + 1, y);
        }

        self.cells[idx] = cell;
        if width > 1 {
            self.cells[idx + 1] = Cell::CONTINUATION;
        }
    }

    // Overwriting half of a wide character orphans the other half.
    fn clear_wide_neighbors(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if self.cells[idx].is_continuation() && x > 0 {
            self.cells[idx - 1] = Cell::default();
        }
        if self.cells[idx].width() > 1 && x + 1 < self.width {
            self.cells[idx + 1] = Cell::default();
        }
    }

    /// Fill a rectangle (clipped to the buffer) with a cell.
    pub fn fill(&mut self, area: Rect, cell: Cell) {
        let area = area.intersection(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Plain text of one row. Empty cells become spaces; continuation cells
    /// are skipped so wide characters keep their natural width.
    pub fn row_text(&self, y: u16) -> String {
        let mut out = String::with_capacity(self.width as usize);
        for x in 0..self.width {
            let Some(cell) = self.get(x, y) else {
                break;
            };
            if cell.is_continuation() {
                continue;
            }
            out.push(cell.content.as_char().unwrap_or(' '));
        }
        out
    }

    /// Iterate the rows as plain text.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|y| self.row_text(y))
    }
}
