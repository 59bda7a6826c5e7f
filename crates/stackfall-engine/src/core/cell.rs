use serde::{Deserialize, Serialize};

use super::shape::ShapeKind;

/// Colour tag carried by every block.
///
/// Each shape has exactly one colour, so a colour also identifies the shape a
/// block came from (see [`BlockColor::shape`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColor {
    Red,
    Blue,
    Yellow,
    Green,
    Magenta,
    Cyan,
    Orange,
}

impl BlockColor {
    /// Returns the shape painted with this colour.
    #[must_use]
    pub const fn shape(self) -> ShapeKind {
        match self {
            BlockColor::Red => ShapeKind::I,
            BlockColor::Blue => ShapeKind::O,
            BlockColor::Yellow => ShapeKind::T,
            BlockColor::Green => ShapeKind::J,
            BlockColor::Magenta => ShapeKind::L,
            BlockColor::Cyan => ShapeKind::S,
            BlockColor::Orange => ShapeKind::Z,
        }
    }
}

/// A single grid position.
///
/// A cell is either empty, part of the piece that is still falling, or part of
/// the settled stack. The position of a cell is the index used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Falling(BlockColor),
    Locked(BlockColor),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_falling(self) -> bool {
        matches!(self, Cell::Falling(_))
    }

    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, Cell::Locked(_))
    }

    #[must_use]
    pub fn color(self) -> Option<BlockColor> {
        match self {
            Cell::Empty => None,
            Cell::Falling(color) | Cell::Locked(color) => Some(color),
        }
    }

    /// Returns the locked version of this cell. Empty cells stay empty.
    #[must_use]
    pub fn locked(self) -> Self {
        match self {
            Cell::Falling(color) => Cell::Locked(color),
            other => other,
        }
    }

    /// ASCII form used by board fixtures and serialisation.
    ///
    /// `.` is empty, an upper-case shape letter is locked and a lower-case
    /// shape letter is falling.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Locked(color) => color.shape().as_char(),
            Cell::Falling(color) => color.shape().as_char().to_ascii_lowercase(),
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::Empty);
        }
        let kind = ShapeKind::from_char(c.to_ascii_uppercase())?;
        if c.is_ascii_uppercase() {
            Some(Cell::Locked(kind.color()))
        } else {
            Some(Cell::Falling(kind.color()))
        }
    }
}
