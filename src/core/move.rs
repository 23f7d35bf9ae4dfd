use super::types::Tile;
use std::fmt;

/// A proposed move, not validated. The rules engine decides legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Tile,
    pub to: Tile,
}

impl Move {
    pub fn new(from: Tile, to: Tile) -> Self {
        Move { from, to }
    }

    /// Wire order: fromCol fromRow toCol toRow.
    pub fn coords(&self) -> [usize; 4] {
        [self.from.col, self.from.row, self.to.col, self.to.row]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [fc, fr, tc, tr] = self.coords();
        write!(f, "{} {} {} {}", fc, fr, tc, tr)
    }
}
