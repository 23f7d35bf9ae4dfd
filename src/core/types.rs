use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 盤の一辺のマス数
pub const BOARD_SIZE: usize = 8;

/// Piece owner. Black moves first and is encoded with positive cell codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    Black, // 先手, positive codes
    White, // 後手, negative codes
}

impl Default for Owner {
    fn default() -> Self {
        Owner::Black
    }
}

impl Owner {
    pub fn as_str(self) -> &'static str {
        match self {
            Owner::Black => "black",
            Owner::White => "white",
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            Owner::Black => 1,
            Owner::White => -1,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Owner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => Ok(Owner::Black),
            "white" => Ok(Owner::White),
            other => Err(other.to_string()),
        }
    }
}

/// 駒の階級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Pawn,
    King,
}

/// Board square, 0-indexed from the visual top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    pub col: usize,
    pub row: usize,
}

impl Tile {
    pub fn new(col: usize, row: usize) -> Self {
        debug_assert!(col < BOARD_SIZE && row < BOARD_SIZE);
        Tile { col, row }
    }

    /// Rejects coordinates that fall outside the 8x8 grid.
    pub fn from_coords(col: i32, row: i32) -> Option<Self> {
        let range = 0..BOARD_SIZE as i32;
        if range.contains(&col) && range.contains(&row) {
            Some(Tile {
                col: col as usize,
                row: row as usize,
            })
        } else {
            None
        }
    }

    pub fn is_dark(self) -> bool {
        (self.col + self.row) % 2 == 0
    }

    pub fn all() -> impl Iterator<Item = Tile> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Tile { col, row }))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_from_coords_rejects_out_of_range() {
        assert_eq!(Tile::from_coords(0, 7), Some(Tile::new(0, 7)));
        assert_eq!(Tile::from_coords(-1, 0), None);
        assert_eq!(Tile::from_coords(3, 8), None);
    }

    #[test]
    fn test_tile_iteration_is_row_major() {
        let tiles: Vec<Tile> = Tile::all().take(9).collect();
        assert_eq!(tiles[0], Tile::new(0, 0));
        assert_eq!(tiles[7], Tile::new(7, 0));
        assert_eq!(tiles[8], Tile::new(0, 1));
        assert_eq!(Tile::all().count(), 64);
    }

    #[test]
    fn test_owner_tokens() {
        assert_eq!("black".parse::<Owner>(), Ok(Owner::Black));
        assert_eq!("white".parse::<Owner>(), Ok(Owner::White));
        assert!("red".parse::<Owner>().is_err());
        assert_eq!(Owner::White.to_string(), "white");
    }
}
