pub use self::{board::*, cell::*, shape::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod shape;
