use std::fmt::{self, Write as _};

use serde::{Serialize, Serializer, ser::SerializeSeq as _};

use crate::{ConfigError, SpawnError};

use super::{
    cell::{BlockColor, Cell},
    shape::{Piece, RotationClass, ShapeKind},
};

/// Board position as `(row, col)`. Row 0 is the top row.
pub type Position = (usize, usize);

/// Signed `(row, col)` displacement relative to a pivot.
type Delta = (isize, isize);

/// 90° clockwise permutation of the 8 cells around the pivot of a 3x3 shape.
///
/// Rows grow downward, so `(dr, dc)` maps to `(dc, -dr)`.
const QUARTER_ROTATION: [(Delta, Delta); 8] = [
    ((-1, -1), (-1, 1)),
    ((-1, 0), (0, 1)),
    ((-1, 1), (1, 1)),
    ((0, -1), (-1, 0)),
    ((0, 1), (1, 0)),
    ((1, -1), (-1, -1)),
    ((1, 0), (0, -1)),
    ((1, 1), (1, -1)),
];

/// Toggle between the horizontal and vertical line around the pivot.
///
/// The horizontal line covers columns -1..=2 of the pivot row and the vertical
/// line covers rows -1..=2 of the pivot column.
const LINE_ROTATION: [(Delta, Delta); 6] = [
    ((0, -1), (-1, 0)),
    ((0, 1), (1, 0)),
    ((0, 2), (2, 0)),
    ((-1, 0), (0, -1)),
    ((1, 0), (0, 1)),
    ((2, 0), (0, 2)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    const fn delta(self) -> Delta {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

/// Result of [`Board::move_down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved one row down.
    Moved,
    /// The piece could not move and its cells are now locked.
    Locked,
    /// There was no falling piece.
    NoPiece,
}

/// The piece currently falling through the board.
///
/// Holds the board positions of its 4 blocks. The pivot is stored as an index
/// into that set, so it always names one of the piece's own blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    kind: ShapeKind,
    blocks: [Position; 4],
    pivot: usize,
}

impl ActivePiece {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn blocks(&self) -> &[Position; 4] {
        &self.blocks
    }

    /// Position of the rotation pivot ("central cell").
    #[must_use]
    pub fn pivot(&self) -> Position {
        self.blocks[self.pivot]
    }
}

/// The playing grid.
///
/// Every non-empty cell is either [`Cell::Locked`] or one of the 4 blocks of
/// the single [`ActivePiece`]. Movement and rotation check legality first and
/// only then touch the grid, so a rejected call leaves the board unchanged.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Board, DropOutcome, Piece, ShapeKind};
///
/// let mut board = Board::default();
/// board.spawn(&Piece::new(ShapeKind::O)).unwrap();
///
/// assert!(board.move_left());
/// while board.move_down() == DropOutcome::Moved {}
///
/// assert!(board.all_locked());
/// assert_eq!(board.clear_completed_lines(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    active: Option<ActivePiece>,
    rotations: u8,
    rotation_cap: u8,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(Self::DEFAULT_ROWS, Self::DEFAULT_COLS)
    }
}

impl Board {
    pub const DEFAULT_ROWS: usize = 25;
    pub const DEFAULT_COLS: usize = 12;
    pub const DEFAULT_ROTATION_CAP: u8 = 4;
    /// Smallest board that can hold and rotate every shape.
    pub const MIN_ROWS: usize = 4;
    pub const MIN_COLS: usize = 4;
    /// Upper bound on `rows * cols`.
    pub const MAX_CELLS: usize = 1 << 16;

    /// Creates an empty board with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self::empty(rows, cols))
    }

    /// Checks board dimensions against the size limits without allocating.
    pub fn check_dimensions(rows: usize, cols: usize) -> Result<(), ConfigError> {
        if rows < Self::MIN_ROWS {
            return Err(ConfigError::TooFewRows {
                rows,
                min: Self::MIN_ROWS,
            });
        }
        if cols < Self::MIN_COLS {
            return Err(ConfigError::TooFewCols {
                cols,
                min: Self::MIN_COLS,
            });
        }
        if rows.checked_mul(cols).is_none_or(|cells| cells > Self::MAX_CELLS) {
            return Err(ConfigError::TooLarge {
                rows,
                cols,
                max_cells: Self::MAX_CELLS,
            });
        }
        Ok(())
    }

    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
            active: None,
            rotations: 0,
            rotation_cap: Self::DEFAULT_ROTATION_CAP,
        }
    }

    /// Sets how many rotations are allowed between two
    /// [`reset_rotations`](Self::reset_rotations) calls.
    #[must_use]
    pub fn with_rotation_cap(self, rotation_cap: u8) -> Self {
        Self {
            rotation_cap,
            ..self
        }
    }

    /// Builds a board from ASCII art, for tests and fixtures.
    ///
    /// Each line is one row, top to bottom. `.` is empty and an upper-case
    /// shape letter is a locked block of that shape's colour. Blank lines and
    /// surrounding whitespace are ignored.
    ///
    /// # Panics
    ///
    /// Panics on ragged rows, unknown characters, falling (lower-case) blocks
    /// or dimensions below the minimum.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());
        let mut board = match Self::new(rows, cols) {
            Ok(board) => board,
            Err(e) => panic!("invalid board art: {e}"),
        };

        for (row, line) in lines.iter().enumerate() {
            assert_eq!(
                line.chars().count(),
                cols,
                "Each row must have exactly {cols} cells, got {} at row {row}",
                line.chars().count(),
            );
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch)
                    .unwrap_or_else(|| panic!("unknown cell {ch:?} at ({row}, {col})"));
                assert!(
                    !cell.is_falling(),
                    "falling cells cannot be restored from art, got {ch:?} at ({row}, {col})"
                );
                board.set(row, col, cell);
            }
        }
        board
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rotation_count(&self) -> u8 {
        self.rotations
    }

    #[must_use]
    pub fn rotation_cap(&self) -> u8 {
        self.rotation_cap
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    /// Returns the cell at the given position.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the board.
    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) is outside a {}x{} board",
            self.rows,
            self.cols
        );
        self.cells[self.index((row, col))]
    }

    /// Returns the colour of the block at the given position, if any.
    #[must_use]
    pub fn color_at(&self, row: usize, col: usize) -> Option<BlockColor> {
        self.cell_at(row, col).color()
    }

    /// Iterates over the rows, top to bottom.
    pub fn row_cells(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols)
    }

    /// Whether any locked block sits in the top row, the game-over condition.
    #[must_use]
    pub fn has_locked_in_top_row(&self) -> bool {
        self.cells[..self.cols].iter().any(|cell| cell.is_locked())
    }

    /// Whether every occupied cell is locked, i.e. no piece is falling.
    #[must_use]
    pub fn all_locked(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_falling())
    }

    /// Empties every cell and forgets the falling piece.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
        self.active = None;
        self.rotations = 0;
    }

    /// Column where sub-grid column 0 of a spawned piece lands.
    #[must_use]
    pub fn spawn_column(&self) -> usize {
        (self.cols - 4) / 2
    }

    /// Places a new piece at the top of the board.
    ///
    /// Sub-grid cell `(r, c)` lands on `(r, spawn_column() + c)` and sub-grid
    /// cell `(1, 1)` becomes the pivot. The rotation counter is reset.
    ///
    /// Locked blocks under the new piece are overwritten. The piece is still
    /// placed and [`SpawnError::Overflow`] reports how many blocks were lost,
    /// which means the stack has reached the top.
    pub fn spawn(&mut self, piece: &Piece) -> Result<(), SpawnError> {
        if self.active.is_some() {
            return Err(SpawnError::PieceInFlight);
        }

        let col0 = self.spawn_column();
        let color = piece.color();
        let mut blocks = [(0, 0); 4];
        let mut pivot = 0;
        let mut overwritten = 0;
        for (i, (block, (row, col))) in blocks.iter_mut().zip(piece.occupied_offsets()).enumerate()
        {
            *block = (row, col0 + col);
            if (row, col) == Piece::PIVOT {
                pivot = i;
            }
            if self.cell(*block).is_locked() {
                overwritten += 1;
            }
            self.set(block.0, block.1, Cell::Falling(color));
        }

        self.active = Some(ActivePiece {
            kind: piece.kind(),
            blocks,
            pivot,
        });
        self.rotations = 0;

        if overwritten > 0 {
            return Err(SpawnError::Overflow { overwritten });
        }
        Ok(())
    }

    /// Moves the falling piece one column to the right, if every block can.
    pub fn move_right(&mut self) -> bool {
        self.try_shift(Direction::Right)
    }

    /// Moves the falling piece one column to the left, if every block can.
    pub fn move_left(&mut self) -> bool {
        self.try_shift(Direction::Left)
    }

    /// Moves the falling piece one row down, locking it when it cannot move.
    pub fn move_down(&mut self) -> DropOutcome {
        if self.active.is_none() {
            return DropOutcome::NoPiece;
        }
        if self.try_shift(Direction::Down) {
            return DropOutcome::Moved;
        }
        self.lock_piece();
        DropOutcome::Locked
    }

    /// Rotates the falling piece 90° clockwise around its pivot.
    ///
    /// Rejected when the shape has a single orientation, when the rotation
    /// counter has reached the cap, or when the neighbourhood of the pivot
    /// (3x3, or 4x4 for the line) leaves the board or holds a locked block.
    pub fn rotate(&mut self) -> bool {
        let Some(piece) = &self.active else {
            return false;
        };
        if self.rotations >= self.rotation_cap {
            return false;
        }
        let (table, reach): (&[(Delta, Delta)], isize) = match piece.kind.rotation() {
            RotationClass::Fixed => return false,
            RotationClass::Line => (&LINE_ROTATION, 2),
            RotationClass::Quarter => (&QUARTER_ROTATION, 1),
        };

        let pivot = piece.pivot();
        if !self.is_neighbourhood_free(pivot, reach) {
            return false;
        }

        let mut targets = piece.blocks;
        for target in &mut targets {
            let delta = delta_between(pivot, *target);
            if delta == (0, 0) {
                continue;
            }
            let Some(&(_, to)) = table.iter().find(|(from, _)| *from == delta) else {
                return false;
            };
            let Some(moved) = self.offset(pivot, to) else {
                return false;
            };
            *target = moved;
        }

        self.relocate_piece(targets);
        self.rotations += 1;
        true
    }

    /// Allows another round of rotations. Called by the driver once per tick.
    pub fn reset_rotations(&mut self) {
        self.rotations = 0;
    }

    /// Removes every complete row and compacts the rows above it.
    ///
    /// Rows are scanned bottom to top. A complete row (every column locked)
    /// is erased and everything above it drops by one row; the same row is
    /// then checked again, so stacked complete rows all go in one call.
    ///
    /// Returns the number of rows removed.
    pub fn clear_completed_lines(&mut self) -> usize {
        let mut cleared = 0;
        for row in (0..self.rows).rev() {
            while self.is_row_complete(row) {
                self.collapse_row(row);
                cleared += 1;
            }
        }
        cleared
    }

    fn is_row_complete(&self, row: usize) -> bool {
        self.cells[row * self.cols..][..self.cols]
            .iter()
            .all(|cell| cell.is_locked())
    }

    /// Erases `row` and drops every row above it by one.
    fn collapse_row(&mut self, row: usize) {
        let cols = self.cols;
        self.cells[row * cols..][..cols].fill(Cell::Empty);
        // Rows 0..row move to 1..=row; overlapping regions are read before written.
        self.cells.copy_within(..row * cols, cols);
        self.cells[..cols].fill(Cell::Empty);

        if let Some(piece) = &mut self.active {
            for block in &mut piece.blocks {
                if block.0 < row {
                    block.0 += 1;
                }
            }
        }
    }

    fn try_shift(&mut self, direction: Direction) -> bool {
        let Some(piece) = &self.active else {
            return false;
        };
        let mut targets = piece.blocks;
        for target in &mut targets {
            match self.offset(*target, direction.delta()) {
                Some(pos) if !self.cell(pos).is_locked() => *target = pos,
                _ => return false,
            }
        }
        self.relocate_piece(targets);
        true
    }

    /// Moves the falling blocks to `targets`, keeping block order (and so the pivot).
    fn relocate_piece(&mut self, targets: [Position; 4]) {
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let cell = Cell::Falling(piece.kind.color());
        let old = std::mem::replace(&mut piece.blocks, targets);
        // Lift every block before placing any, so blocks of the same piece never clobber each other.
        for pos in old {
            let index = self.index(pos);
            self.cells[index] = Cell::Empty;
        }
        for pos in targets {
            let index = self.index(pos);
            self.cells[index] = cell;
        }
    }

    fn lock_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        for pos in piece.blocks {
            let index = self.index(pos);
            self.cells[index] = self.cells[index].locked();
        }
    }

    fn is_neighbourhood_free(&self, pivot: Position, reach: isize) -> bool {
        (-1..=reach).all(|dr| {
            (-1..=reach).all(|dc| {
                self.offset(pivot, (dr, dc))
                    .is_some_and(|pos| !self.cell(pos).is_locked())
            })
        })
    }

    fn offset(&self, (row, col): Position, (dr, dc): Delta) -> Option<Position> {
        let row = row.checked_add_signed(dr).filter(|&r| r < self.rows)?;
        let col = col.checked_add_signed(dc).filter(|&c| c < self.cols)?;
        Some((row, col))
    }

    fn index(&self, (row, col): Position) -> usize {
        row * self.cols + col
    }

    fn cell(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let index = self.index((row, col));
        self.cells[index] = cell;
    }
}

#[expect(clippy::cast_possible_wrap)]
fn delta_between(from: Position, to: Position) -> Delta {
    (
        to.0 as isize - from.0 as isize,
        to.1 as isize - from.1 as isize,
    )
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.row_cells().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            for cell in row {
                f.write_char(cell.as_char())?;
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: ["............", "....tt......", "IIIIJJJ.OO.."] (one string per row)
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self.row_cells() {
            let line: String = row.iter().map(|cell| cell.as_char()).collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(board: &Board) -> Vec<Position> {
        let mut positions = Vec::new();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if !board.cell_at(row, col).is_empty() {
                    positions.push((row, col));
                }
            }
        }
        positions
    }

    fn falling(board: &Board) -> Vec<Position> {
        let mut positions = Vec::new();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if board.cell_at(row, col).is_falling() {
                    positions.push((row, col));
                }
            }
        }
        positions
    }

    fn spawned(kind: ShapeKind) -> Board {
        let mut board = Board::default();
        board.spawn(&Piece::new(kind)).unwrap();
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert_eq!(board.rows(), 25);
        assert_eq!(board.cols(), 12);
        assert!(occupied(&board).is_empty());
        assert!(board.all_locked());
        assert!(board.active_piece().is_none());
    }

    #[test]
    fn test_new_rejects_tiny_boards() {
        assert_eq!(
            Board::new(3, 12),
            Err(ConfigError::TooFewRows { rows: 3, min: 4 })
        );
        assert_eq!(
            Board::new(25, 2),
            Err(ConfigError::TooFewCols { cols: 2, min: 4 })
        );
        assert_eq!(
            Board::new(usize::MAX / 2, 4),
            Err(ConfigError::TooLarge {
                rows: usize::MAX / 2,
                cols: 4,
                max_cells: Board::MAX_CELLS,
            })
        );
        assert_eq!(
            Board::new(100_000, 100_000).map(|_| ()),
            Err(ConfigError::TooLarge {
                rows: 100_000,
                cols: 100_000,
                max_cells: Board::MAX_CELLS,
            })
        );
        assert!(Board::new(4, 4).is_ok());
    }

    #[test]
    fn test_spawn_places_piece_at_offset_four() {
        let board = spawned(ShapeKind::T);
        assert_eq!(board.spawn_column(), 4);
        assert_eq!(falling(&board), vec![(0, 5), (1, 4), (1, 5), (1, 6)]);
        assert_eq!(board.active_piece().unwrap().pivot(), (1, 5));
        assert_eq!(board.color_at(0, 5), Some(BlockColor::Yellow));
        assert!(!board.all_locked());
    }

    #[test]
    fn test_spawn_line_pivot() {
        let board = spawned(ShapeKind::I);
        assert_eq!(falling(&board), vec![(1, 4), (1, 5), (1, 6), (1, 7)]);
        assert_eq!(board.active_piece().unwrap().pivot(), (1, 5));
    }

    #[test]
    fn test_spawn_rejects_second_piece() {
        let mut board = spawned(ShapeKind::O);
        let before = board.clone();
        assert_eq!(
            board.spawn(&Piece::new(ShapeKind::T)),
            Err(SpawnError::PieceInFlight)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_spawn_overflow_overwrites_and_reports() {
        let mut board = Board::from_ascii(
            "
            .....Z.Z....
            ......Z.....
            ............
            ............
            ",
        );
        let result = board.spawn(&Piece::new(ShapeKind::T));
        assert_eq!(result, Err(SpawnError::Overflow { overwritten: 2 }));
        assert_eq!(board.cell_at(0, 5), Cell::Falling(BlockColor::Yellow));
        assert_eq!(board.cell_at(1, 6), Cell::Falling(BlockColor::Yellow));
        assert_eq!(board.cell_at(0, 7), Cell::Locked(BlockColor::Orange));
        assert!(board.active_piece().is_some());
    }

    #[test]
    fn test_move_right_until_wall() {
        let mut board = spawned(ShapeKind::T);
        let mut moves = 0;
        while board.move_right() {
            moves += 1;
        }
        assert_eq!(moves, 5);
        assert_eq!(falling(&board), vec![(0, 10), (1, 9), (1, 10), (1, 11)]);
        assert_eq!(board.active_piece().unwrap().pivot(), (1, 10));
    }

    #[test]
    fn test_move_left_until_wall() {
        let mut board = spawned(ShapeKind::I);
        let mut moves = 0;
        while board.move_left() {
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert_eq!(falling(&board), vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_move_blocked_by_locked_cell() {
        let mut board = Board::from_ascii(
            "
            ............
            ...J........
            ............
            ............
            ",
        );
        board.spawn(&Piece::new(ShapeKind::T)).unwrap();
        let before = board.clone();
        assert!(!board.move_left());
        assert_eq!(board, before);
        assert!(board.move_right());
    }

    #[test]
    fn test_move_down_locks_on_floor() {
        let mut board = spawned(ShapeKind::O);
        let mut moves = 0;
        while board.move_down().is_moved() {
            moves += 1;
        }
        assert_eq!(moves, 23);
        assert!(board.all_locked());
        assert!(board.active_piece().is_none());
        assert_eq!(
            occupied(&board),
            vec![(23, 5), (23, 6), (24, 5), (24, 6)]
        );
        assert_eq!(board.cell_at(24, 5), Cell::Locked(BlockColor::Blue));
        assert_eq!(board.move_down(), DropOutcome::NoPiece);

        board.spawn(&Piece::new(ShapeKind::T)).unwrap();
        let falling: Vec<Position> = (0..board.rows())
            .flat_map(|row| (0..board.cols()).map(move |col| (row, col)))
            .filter(|&(row, col)| board.cell_at(row, col).is_falling())
            .collect();
        assert_eq!(falling, vec![(0, 5), (1, 4), (1, 5), (1, 6)]);
        assert!(!board.all_locked());
        assert_eq!(board.cell_at(24, 5), Cell::Locked(BlockColor::Blue));
    }

    #[test]
    fn test_move_down_locks_on_stack() {
        let mut board = Board::from_ascii(
            "
            ............
            ............
            ............
            .....L......
            ",
        );
        board.spawn(&Piece::new(ShapeKind::O)).unwrap();
        assert_eq!(board.move_down(), DropOutcome::Moved);
        assert_eq!(board.move_down(), DropOutcome::Locked);
        assert_eq!(
            board.to_string(),
            "............\n.....OO.....\n.....OO.....\n.....L......"
        );
    }

    #[test]
    fn test_locked_cells_ignore_moves() {
        let mut board = spawned(ShapeKind::S);
        while !board.move_down().is_locked() {}
        let before = board.clone();
        assert!(!board.move_left());
        assert!(!board.move_right());
        assert!(!board.rotate());
        assert_eq!(board.move_down(), DropOutcome::NoPiece);
        assert_eq!(board, before);
    }

    #[test]
    fn test_rotate_t_piece() {
        let mut board = spawned(ShapeKind::T);
        board.move_down();
        assert_eq!(falling(&board), vec![(1, 5), (2, 4), (2, 5), (2, 6)]);
        assert!(board.rotate());
        assert_eq!(falling(&board), vec![(1, 5), (2, 5), (2, 6), (3, 5)]);
        assert_eq!(board.active_piece().unwrap().pivot(), (2, 5));
        assert_eq!(board.rotation_count(), 1);
    }

    #[test]
    fn test_rotate_t_piece_at_spawn() {
        let mut board = spawned(ShapeKind::T);
        assert!(board.rotate());
        assert_eq!(falling(&board), vec![(0, 5), (1, 5), (1, 6), (2, 5)]);
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in [ShapeKind::T, ShapeKind::J, ShapeKind::L, ShapeKind::S, ShapeKind::Z] {
            let mut board = spawned(kind);
            board.move_down();
            let before = board.clone();
            for _ in 0..4 {
                assert!(board.rotate(), "{kind:?}");
            }
            board.reset_rotations();
            assert_eq!(board, before, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_line_toggles() {
        let mut board = spawned(ShapeKind::I);
        board.move_down();
        assert_eq!(falling(&board), vec![(2, 4), (2, 5), (2, 6), (2, 7)]);
        assert!(board.rotate());
        assert_eq!(falling(&board), vec![(1, 5), (2, 5), (3, 5), (4, 5)]);
        assert!(board.rotate());
        assert_eq!(falling(&board), vec![(2, 4), (2, 5), (2, 6), (2, 7)]);
    }

    #[test]
    fn test_rotate_square_is_noop() {
        let mut board = spawned(ShapeKind::O);
        board.move_down();
        let before = board.clone();
        assert!(!board.rotate());
        assert_eq!(board, before);
    }

    #[test]
    fn test_rotate_respects_cap() {
        let mut board = spawned(ShapeKind::J);
        board.move_down();
        for _ in 0..4 {
            assert!(board.rotate());
        }
        let before = board.clone();
        assert!(!board.rotate());
        assert_eq!(board, before);
        assert_eq!(board.rotation_count(), 4);

        board.reset_rotations();
        assert!(board.rotate());
    }

    #[test]
    fn test_rotate_custom_cap() {
        let mut board = Board::default().with_rotation_cap(1);
        board.spawn(&Piece::new(ShapeKind::T)).unwrap();
        assert!(board.rotate());
        assert!(!board.rotate());
    }

    #[test]
    fn test_rotate_blocked_by_wall() {
        let mut board = spawned(ShapeKind::T);
        board.move_down();
        while board.move_left() {}
        // pivot at column 1 still has room on the left
        assert!(board.rotate());
        while board.move_left() {}
        // pivot now at column 0, neighbourhood leaves the board
        assert_eq!(board.active_piece().unwrap().pivot().1, 0);
        let before = board.clone();
        assert!(!board.rotate());
        assert_eq!(board, before);
    }

    #[test]
    fn test_rotate_blocked_by_locked_corner() {
        let mut board = Board::from_ascii(
            "
            ............
            ............
            ......S.....
            ............
            ",
        );
        board.spawn(&Piece::new(ShapeKind::T)).unwrap();
        // the locked corner is not in the T's path but is inside its 3x3 neighbourhood
        let before = board.clone();
        assert!(!board.rotate());
        assert_eq!(board, before);
    }

    #[test]
    fn test_rotate_line_needs_four_by_four() {
        let mut board = spawned(ShapeKind::I);
        // at spawn the pivot is on row 1, so rows 0..=3 are in range
        assert!(board.rotate());
        while board.move_down().is_moved() {}
        assert!(board.all_locked());

        let mut board = Board::from_ascii(
            "
            ............
            ............
            ............
            .......T....
            ",
        );
        board.spawn(&Piece::new(ShapeKind::I)).unwrap();
        assert!(!board.rotate());
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::from_ascii(
            "
            ............
            ..T.........
            .TTT......OO
            IIIIJJJLLLOO
            ",
        );
        assert_eq!(board.clear_completed_lines(), 1);
        assert_eq!(
            board.to_string(),
            "............\n............\n..T.........\n.TTT......OO"
        );
    }

    #[test]
    fn test_clear_incomplete_line_is_untouched() {
        let art = "
            ............
            ............
            ............
            IIIIJJJLLLO.
            ";
        let mut board = Board::from_ascii(art);
        assert_eq!(board.clear_completed_lines(), 0);
        assert_eq!(board, Board::from_ascii(art));
    }

    #[test]
    fn test_clear_double_line() {
        let mut board = Board::from_ascii(
            "
            ............
            .S..........
            IIIIJJJLLLOO
            IIIIJJJLLLOO
            ",
        );
        assert_eq!(board.clear_completed_lines(), 2);
        assert_eq!(
            board.to_string(),
            "............\n............\n............\n.S.........."
        );
    }

    #[test]
    fn test_clear_separated_lines() {
        let mut board = Board::from_ascii(
            "
            Z...........
            IIIIJJJLLLOO
            ..T.........
            IIIIJJJLLLOO
            ",
        );
        assert_eq!(board.clear_completed_lines(), 2);
        assert_eq!(
            board.to_string(),
            "............\n............\nZ...........\n..T........."
        );
    }

    #[test]
    fn test_clear_every_row() {
        let mut board = Board::from_ascii(
            "
            TTTT
            JJJJ
            LLLL
            SSSS
            ",
        );
        assert_eq!(board.clear_completed_lines(), 4);
        assert!(occupied(&board).is_empty());
    }

    #[test]
    fn test_clear_ignores_rows_with_falling_blocks() {
        let mut board = Board::from_ascii(
            "
            ............
            ............
            IIIII..LLLOO
            IIIIJJJLLLOO
            ",
        );
        board.spawn(&Piece::new(ShapeKind::O)).unwrap();
        // O piece fills columns 5 and 6 of row 1 and 2 while still falling
        board.move_down();
        assert_eq!(board.cell_at(2, 5), Cell::Falling(BlockColor::Blue));
        assert_eq!(board.clear_completed_lines(), 1);
        // the falling piece dropped with the rows above the cleared one
        let piece = board.active_piece().unwrap();
        assert_eq!(piece.blocks(), &[(2, 5), (2, 6), (3, 5), (3, 6)]);
        assert_eq!(falling(&board), vec![(2, 5), (2, 6), (3, 5), (3, 6)]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut board = spawned(ShapeKind::Z);
        board.rotate();
        board.clear();
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_top_row_detection() {
        let mut board = Board::default();
        assert!(!board.has_locked_in_top_row());
        board.spawn(&Piece::new(ShapeKind::I)).unwrap();
        assert!(!board.has_locked_in_top_row());
        let board = Board::from_ascii(
            "
            ...L
            ...L
            ..LL
            ....
            ",
        );
        assert!(board.has_locked_in_top_row());
    }

    #[test]
    fn test_board_serialization() {
        let mut board = Board::from_ascii(
            "
            ....
            ....
            ....
            J...
            ",
        );
        board.spawn(&Piece::new(ShapeKind::O)).unwrap();
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(serialized, r#"[".oo.",".oo.","....","J..."]"#);
    }
}
