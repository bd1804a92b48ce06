use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset cell by delta
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighbouring cell one step in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// The bounded coordinate space the snake lives in
///
/// Dimensions are counted in cells, not pixels, and never change for the
/// lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDimensions")]
pub struct Grid {
    width: u32,
    height: u32,
}

/// Unchecked wire form of [`Grid`]
#[derive(Deserialize)]
struct GridDimensions {
    width: u32,
    height: u32,
}

impl TryFrom<GridDimensions> for Grid {
    type Error = String;

    fn try_from(dims: GridDimensions) -> Result<Self, Self::Error> {
        if dims.width == 0 || dims.height == 0 {
            return Err(format!(
                "grid dimensions must be positive, got {}x{}",
                dims.width, dims.height
            ));
        }
        Ok(Self::new(dims.width, dims.height))
    }
}

impl Grid {
    /// Create a grid of `width` x `height` cells
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if a cell lies within the grid bounds
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.x < self.width as i32
            && cell.y >= 0
            && cell.y < self.height as i32
    }

    /// Every cell of the grid, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Cell::new(x, y)))
    }
}
