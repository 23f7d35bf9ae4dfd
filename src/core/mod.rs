pub mod board;
pub mod geometry;
pub mod r#move;
pub mod piece;
pub mod types;

pub use board::Board;
pub use geometry::{pixel_to_tile, tile_at, tile_to_pixel, Point};
pub use piece::{CellCodeError, Piece};
pub use r#move::Move;
pub use types::{Owner, Rank, Tile, BOARD_SIZE};
