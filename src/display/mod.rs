//! Terminal rendering of the board.
//!
//! Each tile is drawn as `TILE_COLS` x `TILE_ROWS` terminal cells. Terminal cells map
//! onto the pixel surface the interaction layer works in, so mouse positions can be
//! fed to it unchanged.

use crate::core::geometry::TILE_SIZE;
use crate::core::{tile_to_pixel, Board, Owner, Piece, Point, Rank, Tile, BOARD_SIZE};
use crate::interaction::{DraggedPiece, InteractionStyle, Mode};
use crossterm::{
    cursor, queue,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal,
};
use std::io::{self, Write};

pub const TILE_COLS: u16 = 5;
pub const TILE_ROWS: u16 = 2;
pub const BOARD_LEFT: u16 = 4;
pub const BOARD_TOP: u16 = 3;

const PX_PER_COL: i32 = TILE_SIZE / TILE_COLS as i32;
const PX_PER_ROW: i32 = TILE_SIZE / TILE_ROWS as i32;

/// Centre pixel of a terminal cell.
pub fn cell_to_pixel(column: u16, row: u16) -> Point {
    let dx = column as i32 - BOARD_LEFT as i32;
    let dy = row as i32 - BOARD_TOP as i32;
    let (ox, oy) = tile_to_pixel(0, 0);
    Point::new(
        ox + dx * PX_PER_COL + PX_PER_COL / 2,
        oy + dy * PX_PER_ROW + PX_PER_ROW / 2,
    )
}

/// Terminal cell containing a pixel, if it is on screen.
pub fn pixel_to_cell(p: Point) -> Option<(u16, u16)> {
    let (ox, oy) = tile_to_pixel(0, 0);
    let column = (p.x - ox).div_euclid(PX_PER_COL) + BOARD_LEFT as i32;
    let row = (p.y - oy).div_euclid(PX_PER_ROW) + BOARD_TOP as i32;
    Some((u16::try_from(column).ok()?, u16::try_from(row).ok()?))
}

/// A modal box drawn over the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogView {
    pub title: String,
    pub lines: Vec<String>,
    /// (label, highlighted)
    pub options: Vec<(String, bool)>,
    pub help: String,
}

#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub status_msg: String,
    pub style: InteractionStyle,
    pub mode: Mode,
    pub dragged: Option<DraggedPiece>,
    pub dialog: Option<DialogView>,
}

pub fn render_board<W: Write>(out: &mut W, board: &Board, state: &DisplayState) -> io::Result<()> {
    // 画面クリア（スクロール防止）
    queue!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0),
        PrintStyledContent("=== Checkers ===".bold())
    )?;
    queue!(
        out,
        cursor::MoveTo(0, 1),
        PrintStyledContent(state.status_msg.clone().bold().yellow())
    )?;

    // 列ラベル
    for col in 0..BOARD_SIZE as u16 {
        queue!(
            out,
            cursor::MoveTo(BOARD_LEFT + col * TILE_COLS + TILE_COLS / 2, BOARD_TOP - 1),
            Print(col)
        )?;
    }

    for row in 0..BOARD_SIZE {
        for line in 0..TILE_ROWS {
            let y = BOARD_TOP + row as u16 * TILE_ROWS + line;
            queue!(out, cursor::MoveTo(BOARD_LEFT - 2, y))?;
            if line == 0 {
                queue!(out, Print(row))?;
            }
            queue!(out, cursor::MoveTo(BOARD_LEFT, y))?;
            for col in 0..BOARD_SIZE {
                let tile = Tile::new(col, row);
                let text = match board.get_piece(tile) {
                    Some(piece) if line == 0 => piece_label(&piece),
                    _ => " ".repeat(TILE_COLS as usize),
                };
                let bg = if tile.is_dark() {
                    Color::DarkGreen
                } else {
                    Color::Grey
                };
                let styled = match board.get_piece(tile) {
                    Some(piece) if piece.selected => text.with(owner_color(piece.owner)).on(Color::Yellow),
                    Some(piece) => text.with(owner_color(piece.owner)).on(bg),
                    None => text.on(bg),
                };
                queue!(out, PrintStyledContent(styled.bold()))?;
            }
        }
    }

    if let Some(dragged) = &state.dragged {
        if let Some((column, row)) = pixel_to_cell(dragged.pos) {
            let label = piece_label(&dragged.piece);
            // 5 cells wide, centred on the pointer
            queue!(
                out,
                cursor::MoveTo(column.saturating_sub(TILE_COLS / 2), row),
                PrintStyledContent(label.with(owner_color(dragged.piece.owner)).on(Color::Yellow).bold())
            )?;
        }
    }

    let footer = BOARD_TOP + BOARD_SIZE as u16 * TILE_ROWS + 1;
    queue!(out, cursor::MoveTo(0, footer), Print(help_line(state)))?;

    if let Some(dialog) = &state.dialog {
        render_dialog(out, dialog)?;
    }

    out.flush()
}

fn help_line(state: &DisplayState) -> String {
    match state.mode {
        Mode::AwaitingMove(owner) => {
            let how = match state.style {
                InteractionStyle::Drag => "drag a piece to its target",
                InteractionStyle::Click => "click a piece, then its target",
            };
            format!("{} to move: {} | [q]: Quit", side_name(owner), how)
        }
        Mode::Idle => "Waiting for the engine... | [q]: Quit".to_string(),
    }
}

fn render_dialog<W: Write>(out: &mut W, dialog: &DialogView) -> io::Result<()> {
    const WIDTH: usize = 34;
    let left = BOARD_LEFT + 3;
    let mut y = BOARD_TOP + 4;

    let border = format!("+{}+", "-".repeat(WIDTH));
    let boxed = |text: &str| format!("| {:<width$} |", text, width = WIDTH - 2);

    queue!(out, cursor::MoveTo(left, y), Print(&border))?;
    y += 1;
    queue!(
        out,
        cursor::MoveTo(left, y),
        PrintStyledContent(boxed(&dialog.title).bold())
    )?;
    y += 1;
    queue!(out, cursor::MoveTo(left, y), Print(boxed("")))?;
    for line in &dialog.lines {
        y += 1;
        queue!(out, cursor::MoveTo(left, y), Print(boxed(line)))?;
    }
    if !dialog.options.is_empty() {
        y += 1;
        queue!(out, cursor::MoveTo(left, y), Print(boxed("")))?;
        y += 1;
        queue!(out, cursor::MoveTo(left, y), Print("| "))?;
        let mut used = 0;
        for (label, highlighted) in &dialog.options {
            let text = format!("[{}]", label);
            used += text.chars().count() + 1;
            if *highlighted {
                queue!(out, PrintStyledContent(text.black().on_yellow()), Print(" "))?;
            } else {
                queue!(out, Print(text), Print(" "))?;
            }
        }
        queue!(out, Print(format!("{:<w$} |", "", w = (WIDTH - 2).saturating_sub(used))))?;
    }
    y += 1;
    queue!(out, cursor::MoveTo(left, y), Print(boxed(&dialog.help)))?;
    y += 1;
    queue!(out, cursor::MoveTo(left, y), Print(&border))?;
    Ok(())
}

fn piece_label(piece: &Piece) -> String {
    match piece.rank {
        Rank::Pawn => format!(" ({}) ", piece.display_char()),
        Rank::King => format!(" [{}] ", piece.display_char()),
    }
}

fn owner_color(owner: Owner) -> Color {
    match owner {
        Owner::Black => Color::DarkRed,
        Owner::White => Color::White,
    }
}

pub fn side_name(owner: Owner) -> &'static str {
    match owner {
        Owner::Black => "Black",
        Owner::White => "White",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tile_at;

    #[test]
    fn test_every_board_cell_maps_to_its_tile() {
        for row in 0..BOARD_SIZE as u16 * TILE_ROWS {
            for column in 0..BOARD_SIZE as u16 * TILE_COLS {
                let p = cell_to_pixel(BOARD_LEFT + column, BOARD_TOP + row);
                let tile = tile_at(p).expect("cell inside the board");
                assert_eq!(tile.col as u16, column / TILE_COLS);
                assert_eq!(tile.row as u16, row / TILE_ROWS);
                assert_eq!(pixel_to_cell(p), Some((BOARD_LEFT + column, BOARD_TOP + row)));
            }
        }
    }

    #[test]
    fn test_cells_around_the_board_are_off_board() {
        let right = BOARD_LEFT + BOARD_SIZE as u16 * TILE_COLS;
        let bottom = BOARD_TOP + BOARD_SIZE as u16 * TILE_ROWS;
        assert_eq!(tile_at(cell_to_pixel(BOARD_LEFT - 1, BOARD_TOP)), None);
        assert_eq!(tile_at(cell_to_pixel(right, BOARD_TOP)), None);
        assert_eq!(tile_at(cell_to_pixel(BOARD_LEFT, BOARD_TOP - 1)), None);
        assert_eq!(tile_at(cell_to_pixel(BOARD_LEFT, bottom)), None);
        assert_eq!(tile_at(cell_to_pixel(0, 0)), None);
    }

    #[test]
    fn test_render_writes_status_and_dialog() {
        let state = DisplayState {
            status_msg: "Black Player's Turn".to_string(),
            mode: Mode::AwaitingMove(Owner::Black),
            dialog: Some(DialogView {
                title: "Illegal Move".to_string(),
                lines: vec!["You must capture".to_string()],
                options: Vec::new(),
                help: "[Enter]: OK".to_string(),
            }),
            ..DisplayState::default()
        };
        let mut out = Vec::new();
        render_board(&mut out, &Board::opening(), &state).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Black Player's Turn"));
        assert!(text.contains("You must capture"));
        assert!(text.contains("drag a piece"));
    }
}
