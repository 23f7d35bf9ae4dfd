use super::piece::{cell_code, CellCodeError, Piece};
use super::types::{Owner, Tile, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 盤面
///
/// Always fully populated: every tile is either empty or holds one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::opening()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Standard opening: black pawns on the dark tiles of rows 0-2, white on rows 5-7.
    pub fn opening() -> Self {
        let mut board = Self::empty();
        for tile in Tile::all().filter(|t| t.is_dark()) {
            if tile.row <= 2 {
                board.place_piece(tile, Piece::pawn(Owner::Black));
            } else if tile.row >= 5 {
                board.place_piece(tile, Piece::pawn(Owner::White));
            }
        }
        board
    }

    /// Builds a board from wire codes, row-major (row outer, column inner).
    pub fn from_codes<I>(codes: I) -> Result<Self, CellCodeError>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut board = Self::empty();
        for (tile, code) in Tile::all().zip(codes) {
            board.cells[tile.row][tile.col] = Piece::from_code(code)?;
        }
        Ok(board)
    }

    pub fn codes(&self) -> Vec<i32> {
        Tile::all().map(|t| cell_code(self.get_piece(t))).collect()
    }

    pub fn get_piece(&self, tile: Tile) -> Option<Piece> {
        self.cells[tile.row][tile.col]
    }

    pub fn place_piece(&mut self, tile: Tile, piece: Piece) {
        self.cells[tile.row][tile.col] = Some(piece);
    }

    pub fn remove_piece(&mut self, tile: Tile) -> Option<Piece> {
        self.cells[tile.row][tile.col].take()
    }

    /// True when the tile holds a piece of `owner`.
    pub fn is_owned_by(&self, tile: Tile, owner: Owner) -> bool {
        self.get_piece(tile).is_some_and(|p| p.owner == owner)
    }

    pub fn set_selected(&mut self, tile: Tile, selected: bool) {
        if let Some(piece) = self.cells[tile.row][tile.col].as_mut() {
            piece.selected = selected;
        }
    }

    pub fn selected_tile(&self) -> Option<Tile> {
        Tile::all().find(|&t| self.get_piece(t).is_some_and(|p| p.selected))
    }

    pub fn clear_selection(&mut self) {
        for row in self.cells.iter_mut() {
            for piece in row.iter_mut().flatten() {
                piece.selected = false;
            }
        }
    }
}

/// Space-separated wire codes, the payload of a `display` record.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, code) in self.codes().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}
