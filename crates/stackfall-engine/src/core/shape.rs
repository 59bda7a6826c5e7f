use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::InvalidShapeIndex;

use super::cell::BlockColor;

/// Offset of a block inside a piece's bounding sub-grid, as `(row, col)`.
pub type Offset = (usize, usize);

/// Enum representing the shape of a piece.
///
/// The discriminant is the shape index drawn by the driver (0..=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ShapeKind {
    /// Straight line, 4x4 sub-grid.
    I = 0,
    /// Square.
    O = 1,
    T = 2,
    J = 3,
    L = 4,
    S = 5,
    Z = 6,
}

impl Serialize for ShapeKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_char(self.as_char())
    }
}

impl<'de> Deserialize<'de> for ShapeKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(serde::de::Error::custom(format!(
                "shape kind must be a single character, got '{s}'"
            )));
        };
        ShapeKind::from_char(c)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid shape kind: {c}")))
    }
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::S,
        ShapeKind::Z,
    ];

    /// Looks up a shape by its index in the shape table.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_index(0), Ok(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_index(2), Ok(ShapeKind::T));
    /// assert!(ShapeKind::from_index(7).is_err());
    /// ```
    pub fn from_index(index: usize) -> Result<Self, InvalidShapeIndex> {
        Self::ALL.get(index).copied().ok_or(InvalidShapeIndex(index))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn color(self) -> BlockColor {
        match self {
            ShapeKind::I => BlockColor::Red,
            ShapeKind::O => BlockColor::Blue,
            ShapeKind::T => BlockColor::Yellow,
            ShapeKind::J => BlockColor::Green,
            ShapeKind::L => BlockColor::Magenta,
            ShapeKind::S => BlockColor::Cyan,
            ShapeKind::Z => BlockColor::Orange,
        }
    }

    #[must_use]
    pub const fn rotation(self) -> RotationClass {
        match self {
            ShapeKind::I => RotationClass::Line,
            ShapeKind::O => RotationClass::Fixed,
            ShapeKind::T | ShapeKind::J | ShapeKind::L | ShapeKind::S | ShapeKind::Z => {
                RotationClass::Quarter
            }
        }
    }

    /// Side length of the bounding sub-grid (4 for the line, 3 otherwise).
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            ShapeKind::I => 4,
            _ => 3,
        }
    }

    #[must_use]
    pub const fn offsets(self) -> &'static [Offset; 4] {
        &SHAPE_OFFSETS[self as usize]
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'T' => Some(ShapeKind::T),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            _ => None,
        }
    }
}

/// How a shape behaves under rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RotationClass {
    /// Looks the same in every orientation; never rotated.
    Fixed,
    /// Two orientations, toggled with the 4x4 line table.
    Line,
    /// Four orientations, rotated with the 3x3 table.
    Quarter,
}

impl RotationClass {
    /// Number of visually distinct orientations (1, 2 or 4).
    #[must_use]
    pub const fn positions(self) -> u8 {
        match self {
            RotationClass::Fixed => 1,
            RotationClass::Line => 2,
            RotationClass::Quarter => 4,
        }
    }
}

/// Row/column offsets of the 4 blocks of every shape, indexed by shape index.
const SHAPE_OFFSETS: [[Offset; 4]; ShapeKind::LEN] = [
    // I
    [(1, 0), (1, 1), (1, 2), (1, 3)],
    // O
    [(0, 1), (0, 2), (1, 1), (1, 2)],
    // T
    [(0, 1), (1, 0), (1, 1), (1, 2)],
    // J
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    // L
    [(0, 2), (1, 0), (1, 1), (1, 2)],
    // S
    [(0, 0), (0, 1), (1, 1), (1, 2)],
    // Z
    [(0, 1), (0, 2), (1, 0), (1, 1)],
];

/// A freshly generated piece: a small sub-grid holding 4 coloured blocks.
///
/// The piece is a template. It is copied into a [`Board`](super::board::Board)
/// by [`Board::spawn`](super::board::Board::spawn), after which the board owns
/// the blocks.
///
/// # Example
///
/// ```
/// use stackfall_engine::{BlockColor, Piece, ShapeKind};
///
/// let piece = Piece::new(ShapeKind::T);
/// assert_eq!(piece.size(), 3);
/// assert_eq!(piece.block_at(0, 1), Some(BlockColor::Yellow));
/// assert_eq!(piece.block_at(0, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    blocks: ArrayVec<Offset, 4>,
}

impl Piece {
    /// Sub-grid cell used as the rotation pivot.
    pub const PIVOT: Offset = (1, 1);

    #[must_use]
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            blocks: kind.offsets().iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> BlockColor {
        self.kind.color()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.kind.size()
    }

    #[must_use]
    pub fn rotation_positions(&self) -> u8 {
        self.kind.rotation().positions()
    }

    /// Offsets of the occupied sub-grid cells, in row-major order.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = Offset> + '_ {
        self.blocks.iter().copied()
    }

    /// Returns the colour of the block at the given sub-grid cell, if any.
    #[must_use]
    pub fn block_at(&self, row: usize, col: usize) -> Option<BlockColor> {
        self.blocks
            .contains(&(row, col))
            .then(|| self.kind.color())
    }
}

/// Builds pieces from shape indices.
///
/// Choosing the index is the caller's job; [`PieceFactory::random`] is the
/// uniform draw used by the game driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceFactory;

impl PieceFactory {
    pub fn create(index: usize) -> Result<Piece, InvalidShapeIndex> {
        ShapeKind::from_index(index).map(Piece::new)
    }

    pub fn random<R>(rng: &mut R) -> Piece
    where
        R: Rng + ?Sized,
    {
        Piece::new(rng.random())
    }
}
