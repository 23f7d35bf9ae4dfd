use super::types::{Owner, Rank};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire codes outside {0, ±1, ±3, ±10, ±30}.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid cell code: {0}")]
pub struct CellCodeError(pub i32);

/// 駒の定義
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Owner,
    pub rank: Rank,
    /// 選択中 (wire code x10)
    pub selected: bool,
}

impl Piece {
    pub fn new(owner: Owner, rank: Rank) -> Self {
        Piece {
            owner,
            rank,
            selected: false,
        }
    }

    pub fn pawn(owner: Owner) -> Self {
        Self::new(owner, Rank::Pawn)
    }

    pub fn king(owner: Owner) -> Self {
        Self::new(owner, Rank::King)
    }

    pub fn with_selected(self, selected: bool) -> Self {
        Piece { selected, ..self }
    }

    /// Decodes one wire cell code. `0` is an empty tile.
    pub fn from_code(code: i32) -> Result<Option<Piece>, CellCodeError> {
        if code == 0 {
            return Ok(None);
        }
        let owner = if code > 0 { Owner::Black } else { Owner::White };
        let (rank, selected) = match code.abs() {
            1 => (Rank::Pawn, false),
            3 => (Rank::King, false),
            10 => (Rank::Pawn, true),
            30 => (Rank::King, true),
            _ => return Err(CellCodeError(code)),
        };
        Ok(Some(Piece {
            owner,
            rank,
            selected,
        }))
    }

    pub fn code(&self) -> i32 {
        let base = match self.rank {
            Rank::Pawn => 1,
            Rank::King => 3,
        };
        let scale = if self.selected { 10 } else { 1 };
        self.owner.sign() * base * scale
    }

    pub fn display_char(&self) -> char {
        match (self.owner, self.rank) {
            (Owner::Black, Rank::Pawn) => 'b',
            (Owner::Black, Rank::King) => 'B',
            (Owner::White, Rank::Pawn) => 'w',
            (Owner::White, Rank::King) => 'W',
        }
    }
}

/// Wire code of an optional piece.
pub fn cell_code(cell: Option<Piece>) -> i32 {
    cell.map(|p| p.code()).unwrap_or(0)
}
