use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    ParseSeedError,
    core::shape::{Piece, PieceFactory},
};

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed for the random number generator that
/// picks shapes. The same seed yields the same shape sequence, which makes
/// simulations and tests reproducible.
///
/// # Example
///
/// ```
/// use stackfall_engine::{PieceSeed, PieceSource};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut a = PieceSource::with_seed(seed);
/// let mut b = PieceSource::with_seed(seed);
/// assert_eq!(a.next_piece(), b.next_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    /// Parses exactly 32 hex digits, the form produced by serialisation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::Digit);
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::Digit)?;
        Ok(Self::from_u128(num))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid seed {hex_str:?}: {e}")))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Endless supply of pieces, each shape drawn uniformly over the 7 shapes.
#[derive(Debug, Clone)]
pub struct PieceSource {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource {
    /// Creates a source with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    pub fn next_piece(&mut self) -> Piece {
        PieceFactory::random(&mut self.rng)
    }
}
