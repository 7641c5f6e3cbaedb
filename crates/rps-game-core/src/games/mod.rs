//! Move set and judging rule.

mod rps;

pub use rps::{judge, InvalidMove, Move};
