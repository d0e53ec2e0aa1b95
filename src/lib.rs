//! Game of Life board engine with incrementally cached neighbor counts.
//!
//! A [`Board`] is a fixed-size rectangular grid of cells stored in a single
//! flat row-major buffer. Each cell carries both its liveness and a cached
//! count of its live Moore neighbors; [`Board::set_state`] keeps the counts
//! of the surrounding cells current on every liveness change, so
//! [`Board::advance`] is a single row-major pass over cached values with no
//! per-cell neighbor scan.
//!
//! The engine is synchronous and single-threaded. It owns no window, reads
//! no input and logs nothing; a hosting application drives it through
//! [`Board::set_state`] and [`Board::advance`] and renders from
//! [`Board::iter`], [`Board::alive`] or [`Board::as_raw`].

use bytemuck::{Pod, Zeroable};
pub use glam::{IVec2, UVec2};
use rand::{Rng, RngCore};
use thiserror::Error;

/// Dimensions of a [`Board::default`] board.
pub const DEFAULT_BOARD_SIZE: UVec2 = UVec2::new(100, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Board dimensions must both be non-zero.
    #[error("board dimensions must be non-zero, got {0}x{1}")]
    InvalidDimension(u32, u32),
    /// Coordinate outside `[0, width) x [0, height)`.
    #[error("position {pos} outside board of size {size}")]
    OutOfBounds { pos: IVec2, size: UVec2 },
    /// A cell buffer could not be allocated, either at creation or for the
    /// next generation. Any existing board is left untouched.
    #[error("failed to allocate cell buffer")]
    AllocationFailure,
}

/// Liveness of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CellState {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl CellState {
    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, CellState::Alive)
    }
}

/// One grid slot: liveness plus the cached count of live Moore neighbors.
///
/// `Pod` so the whole buffer can be handed to a renderer as raw bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct Cell {
    state: u8,
    neighbors: u8,
}

/// A Game of Life board.
///
/// Invariant: outside of a method call, every cell's cached neighbor count
/// equals the number of alive cells among its in-bounds Moore neighbors.
pub struct Board {
    size: UVec2,
    cells: Vec<Cell>,
    alive: Vec<IVec2>,
}

impl Default for Board {
    fn default() -> Self {
        let capacity = DEFAULT_BOARD_SIZE.x as usize * DEFAULT_BOARD_SIZE.y as usize;
        Self {
            size: DEFAULT_BOARD_SIZE,
            cells: vec![Cell::default(); capacity],
            alive: Vec::new(),
        }
    }
}

impl Board {
    /// Creates an all-dead board of `size.x` columns by `size.y` rows.
    ///
    /// The cell count is computed in 64-bit, so dimensions whose product
    /// exceeds `u32::MAX` are valid; a buffer too large for the target or
    /// for available memory reports [`BoardError::AllocationFailure`].
    pub fn new(size: UVec2) -> Result<Self, BoardError> {
        if size.x == 0 || size.y == 0 {
            return Err(BoardError::InvalidDimension(size.x, size.y));
        }
        let capacity = usize::try_from(size.x as u64 * size.y as u64)
            .map_err(|_| BoardError::AllocationFailure)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(capacity)
            .map_err(|_| BoardError::AllocationFailure)?;
        cells.resize(capacity, Cell::default());
        Ok(Self {
            size,
            cells,
            alive: Vec::new(),
        })
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.y
    }

    #[inline]
    fn index(&self, pos: IVec2) -> Result<usize, BoardError> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.size.x || pos.y as u32 >= self.size.y {
            Err(BoardError::OutOfBounds {
                pos,
                size: self.size,
            })
        } else {
            Ok(pos.y as usize * self.size.x as usize + pos.x as usize)
        }
    }

    /// Liveness of the cell at `pos`.
    #[inline]
    pub fn state(&self, pos: IVec2) -> Result<CellState, BoardError> {
        let cell = self.cells[self.index(pos)?];
        Ok(if cell.state != 0 {
            CellState::Alive
        } else {
            CellState::Dead
        })
    }

    /// Cached count of live Moore neighbors of the cell at `pos`, in `0..=8`.
    ///
    /// Reads the stored field directly; no neighbor scan happens here.
    #[inline]
    pub fn neighbor_count(&self, pos: IVec2) -> Result<u8, BoardError> {
        Ok(self.cells[self.index(pos)?].neighbors)
    }

    /// Sets the liveness of the cell at `pos`.
    ///
    /// On a liveness change, the cached neighbor count of every in-bounds
    /// Moore neighbor is adjusted by one; writing the state a cell already
    /// has leaves all counts untouched. Does not update [`Board::alive`],
    /// which reflects the last completed generation only.
    pub fn set_state(&mut self, pos: IVec2, state: CellState) -> Result<(), BoardError> {
        self.index(pos)?;
        self.write(pos, state);
        Ok(())
    }

    // In-bounds write path shared with the generation step. The center cell
    // only has its liveness rewritten; its own count is maintained by writes
    // to its neighbors, never here.
    fn write(&mut self, pos: IVec2, state: CellState) {
        let idx = pos.y as usize * self.size.x as usize + pos.x as usize;
        let old = self.cells[idx].state;
        let new = state as u8;
        self.cells[idx].state = new;
        if new == old {
            return;
        }
        for j in (pos.y - 1)..=(pos.y + 1) {
            for i in (pos.x - 1)..=(pos.x + 1) {
                if (i == pos.x && j == pos.y)
                    || i < 0
                    || j < 0
                    || i as u32 >= self.size.x
                    || j as u32 >= self.size.y
                {
                    continue;
                }
                let n = j as usize * self.size.x as usize + i as usize;
                if new > old {
                    self.cells[n].neighbors += 1;
                } else {
                    self.cells[n].neighbors -= 1;
                }
            }
        }
    }

    /// Advances the whole board one generation (B3/S23).
    ///
    /// Computes the next generation into a fresh buffer from the current
    /// board's cached states and counts, then swaps it in; on
    /// [`BoardError::AllocationFailure`] the current board is untouched.
    /// Also rebuilds the [`Board::alive`] list in row-major scan order.
    pub fn advance(&mut self) -> Result<(), BoardError> {
        #[cfg(feature = "trace")]
        let _span =
            tracing::info_span!("advance", width = self.size.x, height = self.size.y).entered();

        let capacity = self.cells.len();
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(capacity)
            .map_err(|_| BoardError::AllocationFailure)?;
        cells.resize(capacity, Cell::default());
        let mut next = Board {
            size: self.size,
            cells,
            alive: Vec::new(),
        };

        let mut idx = 0;
        for y in 0..self.size.y as i32 {
            for x in 0..self.size.x as i32 {
                let cell = self.cells[idx];
                idx += 1;
                let survives = if cell.state != 0 {
                    cell.neighbors == 2 || cell.neighbors == 3
                } else {
                    cell.neighbors == 3
                };
                if survives {
                    // The next buffer starts all-dead, so each write bumps
                    // the surrounding counts up from zero. The rule above
                    // only ever reads the old board, so scan order does not
                    // matter.
                    next.write(IVec2::new(x, y), CellState::Alive);
                    next.alive.push(IVec2::new(x, y));
                }
            }
        }

        self.cells = next.cells;
        self.alive = next.alive;
        Ok(())
    }

    /// Coordinates of every cell alive as of the last completed generation,
    /// in row-major scan order.
    ///
    /// Rebuilt by [`Board::advance`]; single-cell writes do not maintain it.
    #[inline]
    pub fn alive(&self) -> &[IVec2] {
        &self.alive
    }

    /// Row-major iterator over every cell and its liveness.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, CellState)> + '_ {
        let width = self.size.x as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let pos = IVec2::new((i % width) as i32, (i / width) as i32);
            let state = if cell.state != 0 {
                CellState::Alive
            } else {
                CellState::Dead
            };
            (pos, state)
        })
    }

    /// Raw byte view of the cell buffer: two bytes per cell (liveness, then
    /// cached neighbor count), row-major.
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Resets every cell to dead and empties the alive list.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.alive.clear();
    }

    /// Clears the board, then sets each cell alive with probability
    /// `fill_ratio` through the count-maintaining write path.
    pub fn fill_rand(&mut self, fill_ratio: f32, mut prng: impl RngCore) {
        self.clear();
        for y in 0..self.size.y as i32 {
            for x in 0..self.size.x as i32 {
                let p: f32 = prng.gen_range(0.0..1.0);
                if p < fill_ratio {
                    self.write(IVec2::new(x, y), CellState::Alive);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors2() {
        // 3x3 grid with alive cell in center
        let mut board = Board::new(UVec2::new(3, 3)).unwrap();
        board.set_state(IVec2::ONE, CellState::Alive).unwrap();

        for j in 0..3 {
            for i in 0..3 {
                let pos = IVec2::new(i, j);
                if pos == IVec2::ONE {
                    // center: counts its neighbors, not itself
                    assert_eq!(board.neighbor_count(pos).unwrap(), 0);
                } else {
                    assert_eq!(board.neighbor_count(pos).unwrap(), 1);
                }
            }
        }

        // killing the center removes the contribution again
        board.set_state(IVec2::ONE, CellState::Dead).unwrap();
        for j in 0..3 {
            for i in 0..3 {
                assert_eq!(board.neighbor_count(IVec2::new(i, j)).unwrap(), 0);
            }
        }
    }

    #[test]
    fn corner_writes_clip_at_bounds() {
        let mut board = Board::new(UVec2::new(2, 2)).unwrap();
        board.set_state(IVec2::ZERO, CellState::Alive).unwrap();

        assert_eq!(board.neighbor_count(IVec2::ZERO).unwrap(), 0);
        assert_eq!(board.neighbor_count(IVec2::new(1, 0)).unwrap(), 1);
        assert_eq!(board.neighbor_count(IVec2::new(0, 1)).unwrap(), 1);
        assert_eq!(board.neighbor_count(IVec2::new(1, 1)).unwrap(), 1);
    }

    #[test]
    fn raw_view_is_two_bytes_per_cell() {
        let mut board = Board::new(UVec2::new(4, 2)).unwrap();
        board.set_state(IVec2::ZERO, CellState::Alive).unwrap();

        let raw = board.as_raw();
        assert_eq!(raw.len(), 4 * 2 * 2);
        assert_eq!(raw[0], 1); // (0,0) liveness
        assert_eq!(raw[3], 1); // (1,0) cached count
    }
}
