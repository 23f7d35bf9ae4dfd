//! Pointer-driven move selection.
//!
//! [`Interaction`] turns raw pointer events into one committed [`Move`] per arming.
//! The two styles share the same state and board types and differ only in their
//! transition function.

mod click;
mod drag;

use crate::core::{Board, Move, Owner, Piece, Point, Tile};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// How the user picks a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InteractionStyle {
    /// Press on a piece, drag it, release on the target.
    #[default]
    Drag,
    /// Click a piece, then click the target.
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    AwaitingMove(Owner),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Motion,
    Release,
    /// Press and release on the same spot.
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: i32, y: i32) -> Self {
        PointerEvent {
            kind,
            pos: Point::new(x, y),
        }
    }

    pub fn press(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Press, x, y)
    }

    pub fn motion(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Motion, x, y)
    }

    pub fn release(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Release, x, y)
    }

    pub fn click(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Click, x, y)
    }
}

/// A piece lifted off the board, following the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraggedPiece {
    pub pos: Point,
    pub piece: Piece,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Gesture {
    #[default]
    None,
    Dragging {
        source: Tile,
        dragged: DraggedPiece,
    },
    Selected {
        source: Tile,
    },
}

pub(crate) enum Transition {
    Ignore,
    Update(Gesture),
    Commit(Move),
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    style: InteractionStyle,
    mode: Mode,
    gesture: Gesture,
    pending: Option<Move>,
}

impl Interaction {
    pub fn new(style: InteractionStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn style(&self) -> InteractionStyle {
        self.style
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Arms move acquisition for `owner`.
    ///
    /// Any gesture in progress is cancelled first, a stale selection flag is cleared,
    /// and the previous pending move is dropped.
    pub fn set_mode(&mut self, board: &mut Board, owner: Owner) {
        self.cancel_gesture(board);
        board.clear_selection();
        self.pending = None;
        self.mode = Mode::AwaitingMove(owner);
        debug!(%owner, style = ?self.style, "awaiting move");
    }

    /// Cancels the gesture and disarms.
    pub fn reset(&mut self, board: &mut Board) {
        self.cancel_gesture(board);
        board.clear_selection();
        self.pending = None;
        self.mode = Mode::Idle;
    }

    /// Feeds one pointer event. Returns true when the board or the dragged piece changed.
    pub fn pointer_event(&mut self, board: &mut Board, event: PointerEvent) -> bool {
        let Mode::AwaitingMove(owner) = self.mode else {
            trace!(?event, "pointer event while idle");
            return false;
        };
        if self.pending.is_some() {
            return false;
        }

        let transition = match self.style {
            InteractionStyle::Drag => drag::transition(owner, &self.gesture, board, event),
            InteractionStyle::Click => click::transition(owner, &self.gesture, board, event),
        };

        match transition {
            Transition::Ignore => {
                trace!(?event, "pointer event ignored");
                false
            }
            Transition::Update(gesture) => {
                self.gesture = gesture;
                true
            }
            Transition::Commit(mv) => {
                debug!(%mv, "move committed");
                self.gesture = Gesture::None;
                self.pending = Some(mv);
                self.mode = Mode::Idle;
                true
            }
        }
    }

    pub fn take_pending_move(&mut self) -> Option<Move> {
        self.pending.take()
    }

    pub fn has_pending_move(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dragged_piece(&self) -> Option<DraggedPiece> {
        match self.gesture {
            Gesture::Dragging { dragged, .. } => Some(dragged),
            _ => None,
        }
    }

    pub fn picked_source(&self) -> Option<Tile> {
        match self.gesture {
            Gesture::Dragging { source, .. } | Gesture::Selected { source } => Some(source),
            Gesture::None => None,
        }
    }

    fn cancel_gesture(&mut self, board: &mut Board) {
        if let Gesture::Dragging { source, dragged } = std::mem::take(&mut self.gesture) {
            if board.get_piece(source).is_none() {
                board.place_piece(source, dragged.piece);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{tile_to_pixel, Rank};

    /// Centre pixel of a tile.
    fn centre(col: i32, row: i32) -> (i32, i32) {
        let (x, y) = tile_to_pixel(col, row);
        (x + 40, y + 40)
    }

    fn armed(style: InteractionStyle, owner: Owner) -> (Interaction, Board) {
        let mut board = Board::opening();
        let mut interaction = Interaction::new(style);
        interaction.set_mode(&mut board, owner);
        (interaction, board)
    }

    fn drag(interaction: &mut Interaction, board: &mut Board, from: (i32, i32), to: (i32, i32)) {
        interaction.pointer_event(board, PointerEvent::press(from.0, from.1));
        interaction.pointer_event(board, PointerEvent::motion((from.0 + to.0) / 2, (from.1 + to.1) / 2));
        interaction.pointer_event(board, PointerEvent::release(to.0, to.1));
    }

    #[test]
    fn test_drag_press_release_yields_one_move() {
        let (mut it, mut board) = armed(InteractionStyle::Drag, Owner::Black);
        drag(&mut it, &mut board, (50, 10), (130, 90));

        assert_eq!(
            it.take_pending_move(),
            Some(Move::new(Tile::new(0, 0), Tile::new(1, 1)))
        );
        assert_eq!(it.take_pending_move(), None);
        assert_eq!(it.dragged_piece(), None);
        // 持ち上げた駒は次の display まで盤上に戻らない
        assert_eq!(board.get_piece(Tile::new(0, 0)), None);
        assert_eq!(it.mode(), Mode::Idle);
    }

    #[test]
    fn test_drag_lifts_piece_and_follows_pointer() {
        let (mut it, mut board) = armed(InteractionStyle::Drag, Owner::White);
        let (x, y) = centre(1, 5);
        assert!(it.pointer_event(&mut board, PointerEvent::press(x, y)));
        assert_eq!(board.get_piece(Tile::new(1, 5)), None);

        let before = board.clone();
        assert!(it.pointer_event(&mut board, PointerEvent::motion(300, 333)));
        assert_eq!(board, before);
        let dragged = it.dragged_piece().unwrap();
        assert_eq!(dragged.pos, Point::new(300, 333));
        assert_eq!(dragged.piece, Piece::pawn(Owner::White));
        assert_eq!(it.picked_source(), Some(Tile::new(1, 5)));
    }

    #[test]
    fn test_drag_press_on_foreign_or_empty_tile_is_ignored() {
        let (mut it, mut board) = armed(InteractionStyle::Drag, Owner::Black);
        for (col, row) in [(1, 5), (1, 0), (3, 3)] {
            let (x, y) = centre(col, row);
            assert!(!it.pointer_event(&mut board, PointerEvent::press(x, y)));
            assert_eq!(it.dragged_piece(), None);
            it.pointer_event(&mut board, PointerEvent::release(x, y));
        }
        assert_eq!(it.take_pending_move(), None);
        assert_eq!(board, Board::opening());
    }

    #[test]
    fn test_drag_release_off_board_cancels() {
        let (mut it, mut board) = armed(InteractionStyle::Drag, Owner::Black);
        drag(&mut it, &mut board, centre(2, 2), (700, 700));
        assert_eq!(it.take_pending_move(), None);
        assert_eq!(board, Board::opening());
        // still armed, so a second attempt works
        drag(&mut it, &mut board, centre(2, 2), centre(3, 3));
        assert_eq!(
            it.take_pending_move(),
            Some(Move::new(Tile::new(2, 2), Tile::new(3, 3)))
        );
    }

    #[test]
    fn test_click_select_then_target() {
        let (mut it, mut board) = armed(InteractionStyle::Click, Owner::Black);
        let (sx, sy) = centre(2, 2);
        assert!(it.pointer_event(&mut board, PointerEvent::click(sx, sy)));
        assert_eq!(board.codes()[2 * 8 + 2], 10);
        assert_eq!(it.take_pending_move(), None);

        // target content does not matter
        let (tx, ty) = centre(1, 0);
        assert!(it.pointer_event(&mut board, PointerEvent::click(tx, ty)));
        assert_eq!(
            it.take_pending_move(),
            Some(Move::new(Tile::new(2, 2), Tile::new(1, 0)))
        );
        // selection stays until the next display or re-arm
        assert_eq!(board.selected_tile(), Some(Tile::new(2, 2)));
    }

    #[test]
    fn test_click_ignores_foreign_first_click_and_off_board() {
        let (mut it, mut board) = armed(InteractionStyle::Click, Owner::White);
        let (x, y) = centre(0, 0);
        assert!(!it.pointer_event(&mut board, PointerEvent::click(x, y)));
        assert!(!it.pointer_event(&mut board, PointerEvent::click(3, 3)));
        assert!(!it.pointer_event(&mut board, PointerEvent::press(x, y)));
        assert_eq!(board.selected_tile(), None);

        let (x, y) = centre(0, 6);
        assert!(it.pointer_event(&mut board, PointerEvent::click(x, y)));
        assert!(!it.pointer_event(&mut board, PointerEvent::click(1000, 50)));
        assert_eq!(it.take_pending_move(), None);
    }

    #[test]
    fn test_idle_ignores_everything() {
        let mut board = Board::opening();
        for style in [InteractionStyle::Drag, InteractionStyle::Click] {
            let mut it = Interaction::new(style);
            for event in [
                PointerEvent::press(50, 10),
                PointerEvent::release(130, 90),
                PointerEvent::click(50, 10),
            ] {
                assert!(!it.pointer_event(&mut board, event));
            }
            assert_eq!(it.take_pending_move(), None);
        }
        assert_eq!(board, Board::opening());
    }

    #[test]
    fn test_only_one_move_per_arming() {
        for style in [InteractionStyle::Drag, InteractionStyle::Click] {
            let (mut it, mut board) = armed(style, Owner::Black);
            let events = [
                PointerEvent::press(50, 10),
                PointerEvent::release(130, 90),
                PointerEvent::click(50, 10),
                PointerEvent::click(130, 90),
            ];
            for event in events {
                it.pointer_event(&mut board, event);
            }
            assert!(it.has_pending_move());
            let first = it.take_pending_move();
            assert_eq!(first, Some(Move::new(Tile::new(0, 0), Tile::new(1, 1))));
            for event in events {
                assert!(!it.pointer_event(&mut board, event));
            }
            assert_eq!(it.take_pending_move(), None);
        }
    }

    #[test]
    fn test_rearm_restores_lifted_piece_and_clears_selection() {
        let (mut it, mut board) = armed(InteractionStyle::Drag, Owner::Black);
        it.pointer_event(&mut board, PointerEvent::press(50, 10));
        assert!(it.dragged_piece().is_some());
        it.set_mode(&mut board, Owner::White);
        assert_eq!(it.dragged_piece(), None);
        assert_eq!(board, Board::opening());

        let (mut it, mut board) = armed(InteractionStyle::Click, Owner::Black);
        let (x, y) = centre(4, 2);
        it.pointer_event(&mut board, PointerEvent::click(x, y));
        it.set_mode(&mut board, Owner::Black);
        assert_eq!(board.selected_tile(), None);
        assert_eq!(it.picked_source(), None);
    }

    #[test]
    fn test_kings_can_be_picked() {
        let mut board = Board::empty();
        board.place_piece(Tile::new(3, 3), Piece::king(Owner::White));
        let mut it = Interaction::new(InteractionStyle::Drag);
        it.set_mode(&mut board, Owner::White);
        let (x, y) = centre(3, 3);
        it.pointer_event(&mut board, PointerEvent::press(x, y));
        assert_eq!(it.dragged_piece().map(|d| d.piece.rank), Some(Rank::King));

        it.reset(&mut board);
        assert_eq!(it.mode(), Mode::Idle);
        assert_eq!(board.get_piece(Tile::new(3, 3)), Some(Piece::king(Owner::White)));
    }
}
