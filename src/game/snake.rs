use std::collections::VecDeque;

use anyhow::{Result, ensure};

use super::action::Direction;
use super::grid::{Cell, Grid};

/// The snake in the game
///
/// Segments are stored head first. Moving relocates the tail segment to the
/// new head position, so a non-growing move never changes the length or
/// allocates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeBody {
    body: VecDeque<Cell>,
    /// Moves that will keep the tail in place instead of relocating it
    pending_growth: usize,
}

impl SnakeBody {
    /// Create a snake of `length` segments laid out horizontally, with the
    /// body extending to the left of `head`
    pub fn new(head: Cell, length: usize) -> Self {
        let length = length.max(1);
        let body = (0..length as i32).map(|i| head.offset(-i, 0)).collect();
        Self {
            body,
            pending_growth: 0,
        }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Result<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        ensure!(!body.is_empty(), "snake must have at least one segment");

        for (i, cell) in body.iter().enumerate() {
            ensure!(
                !body.iter().skip(i + 1).any(|other| other == cell),
                "snake segment {:?} appears more than once",
                cell
            );
        }

        Ok(Self {
            body,
            pending_growth: 0,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least one segment
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Segments from head to tail
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Advance one cell in `direction`, returning the cell the tail vacated
    ///
    /// Returns `None` when deferred growth keeps the tail where it is.
    /// There is no reversal guard: moving back onto the neck is a normal move
    /// that leaves the snake in self-collision.
    pub fn move_towards(&mut self, direction: Direction) -> Option<Cell> {
        let new_head = self.head().step(direction);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            self.body.push_front(new_head);
            return None;
        }

        let vacated = self.tail();
        if let Some(segment) = self.body.back_mut() {
            *segment = new_head;
        }
        self.body.rotate_right(1);
        Some(vacated)
    }

    /// Append a copy of the tail; the next move pulls it into place
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push_back(tail);
    }

    /// Append `cell` as the new tail segment
    pub fn grow_into(&mut self, cell: Cell) {
        self.body.push_back(cell);
    }

    /// Grow by one segment on the next move, which leaves the tail in place
    pub fn grow_on_next_move(&mut self) {
        self.pending_growth += 1;
    }

    /// Segments still owed by [`grow_on_next_move`](Self::grow_on_next_move)
    pub fn pending_growth(&self) -> usize {
        self.pending_growth
    }

    /// True if the head shares a cell with any other segment
    pub fn self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&segment| segment == head)
    }

    /// True if the head has left the grid
    pub fn wall_collision(&self, grid: &Grid) -> bool {
        !grid.contains(self.head())
    }

    /// Check if a cell is occupied by any segment
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }
}
