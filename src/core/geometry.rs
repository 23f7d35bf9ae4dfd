//! Pixel <-> tile mapping for the rendering surface.

use super::types::{Tile, BOARD_SIZE};

/// Edge length of one tile in pixels.
pub const TILE_SIZE: i32 = 80;
/// Frame offset left of the first column.
pub const BORDER_X: i32 = 10;
/// Frame offset above the first row.
pub const BORDER_Y: i32 = 0;

const BOARD_EXTENT: i32 = TILE_SIZE * BOARD_SIZE as i32;

/// A position on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Raw affine mapping. Callers must keep `(x, y)` inside the board extent;
/// nothing is clamped here.
pub fn pixel_to_tile(x: i32, y: i32) -> (i32, i32) {
    ((x - 1 - BORDER_X) / TILE_SIZE, (y - 1 - BORDER_Y) / TILE_SIZE)
}

/// Top-left pixel of a tile.
pub fn tile_to_pixel(col: i32, row: i32) -> (i32, i32) {
    (col * TILE_SIZE + BORDER_X + 1, row * TILE_SIZE + BORDER_Y + 1)
}

pub fn in_board_extent(p: Point) -> bool {
    let left = BORDER_X + 1;
    let top = BORDER_Y + 1;
    (left..left + BOARD_EXTENT).contains(&p.x) && (top..top + BOARD_EXTENT).contains(&p.y)
}

/// Tile under a pointer, or `None` when the pointer is outside the board.
pub fn tile_at(p: Point) -> Option<Tile> {
    if !in_board_extent(p) {
        return None;
    }
    let (col, row) = pixel_to_tile(p.x, p.y);
    Tile::from_coords(col, row)
}
