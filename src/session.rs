//! State shared between the protocol decoder and the UI thread.
//!
//! Everything the two sides touch lives behind one mutex: the board, the interaction
//! state machine and its pending move. Committed moves are announced through a
//! [`Notify`] so the decoder does not spin while it waits.

use crate::core::{Board, Move, Owner};
use crate::interaction::{DraggedPiece, Interaction, InteractionStyle, Mode, PointerEvent};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, trace};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct SessionState {
    pub board: Board,
    pub interaction: Interaction,
}

/// A consistent copy of what the UI needs to draw.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Board,
    pub dragged: Option<DraggedPiece>,
    pub mode: Mode,
}

#[derive(Debug)]
pub struct Session {
    state: Mutex<SessionState>,
    move_ready: Notify,
    parent_pid: Mutex<Option<u32>>,
}

impl Session {
    pub fn new(style: InteractionStyle) -> Self {
        Self::with_board(Board::opening(), style)
    }

    pub fn with_board(board: Board, style: InteractionStyle) -> Self {
        Session {
            state: Mutex::new(SessionState {
                board,
                interaction: Interaction::new(style),
            }),
            move_ready: Notify::new(),
            parent_pid: Mutex::new(None),
        }
    }

    /// Wholesale board replacement (`display`).
    pub fn replace_board(&self, board: Board) {
        self.state.lock().board = board;
    }

    pub fn style(&self) -> InteractionStyle {
        self.state.lock().interaction.style()
    }

    pub fn board(&self) -> Board {
        self.state.lock().board.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        Snapshot {
            board: state.board.clone(),
            dragged: state.interaction.dragged_piece(),
            mode: state.interaction.mode(),
        }
    }

    /// Drops any pending move and arms the interaction for `owner`.
    pub fn arm(&self, owner: Owner) {
        let mut guard = self.state.lock();
        let SessionState { board, interaction } = &mut *guard;
        interaction.set_mode(board, owner);
    }

    /// Cancels any gesture and disarms. A piece still being dragged goes back.
    pub fn reset(&self) {
        let mut guard = self.state.lock();
        let SessionState { board, interaction } = &mut *guard;
        interaction.reset(board);
    }

    /// Returns true when a repaint is needed.
    pub fn pointer_event(&self, event: PointerEvent) -> bool {
        let (changed, committed) = {
            let mut guard = self.state.lock();
            let SessionState { board, interaction } = &mut *guard;
            let changed = interaction.pointer_event(board, event);
            (changed, interaction.has_pending_move())
        };
        if committed {
            self.move_ready.notify_one();
        }
        changed
    }

    pub fn take_pending_move(&self) -> Option<Move> {
        self.state.lock().interaction.take_pending_move()
    }

    /// Waits until the UI commits a move.
    ///
    /// Wakes on the commit notification, and re-checks at least every `poll_interval`.
    /// There is no timeout: if no move ever arrives this never returns.
    pub async fn wait_for_move(&self, poll_interval: Duration) -> Move {
        loop {
            if let Some(mv) = self.take_pending_move() {
                debug!(%mv, "pending move taken");
                return mv;
            }
            if tokio::time::timeout(poll_interval, self.move_ready.notified())
                .await
                .is_err()
            {
                trace!("move poll interval elapsed");
            }
        }
    }

    pub fn set_parent_pid(&self, pid: u32) {
        *self.parent_pid.lock() = Some(pid);
    }

    pub fn parent_pid(&self) -> Option<u32> {
        *self.parent_pid.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tile;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_wait_for_move_wakes_on_commit() {
        let session = Arc::new(Session::new(InteractionStyle::Drag));
        session.arm(Owner::Black);

        let ui = Arc::clone(&session);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            ui.pointer_event(PointerEvent::press(50, 10));
            ui.pointer_event(PointerEvent::release(130, 90));
        });

        let mv = tokio::time::timeout(
            Duration::from_secs(5),
            session.wait_for_move(Duration::from_secs(60)),
        )
        .await
        .expect("move should arrive through the notification");
        assert_eq!(mv, Move::new(Tile::new(0, 0), Tile::new(1, 1)));
        assert_eq!(session.take_pending_move(), None);
    }

    #[tokio::test]
    async fn test_wait_for_move_blocks_without_gesture() {
        let session = Session::new(InteractionStyle::Click);
        session.arm(Owner::White);
        // black piece under the pointer: nothing qualifies
        session.pointer_event(PointerEvent::click(50, 10));
        let waited = tokio::time::timeout(
            Duration::from_millis(200),
            session.wait_for_move(DEFAULT_POLL_INTERVAL),
        )
        .await;
        assert!(waited.is_err());
    }

    #[test]
    fn test_arm_clears_previous_move() {
        let session = Session::new(InteractionStyle::Drag);
        session.arm(Owner::Black);
        session.pointer_event(PointerEvent::press(50, 10));
        session.pointer_event(PointerEvent::release(130, 90));
        session.arm(Owner::Black);
        assert_eq!(session.take_pending_move(), None);
    }

    #[test]
    fn test_reset_puts_lifted_piece_back_and_disarms() {
        let session = Session::new(InteractionStyle::Drag);
        assert_eq!(session.style(), InteractionStyle::Drag);
        session.arm(Owner::Black);
        session.pointer_event(PointerEvent::press(50, 10));
        assert!(session.snapshot().dragged.is_some());
        assert_eq!(session.board().get_piece(Tile::new(0, 0)), None);

        session.reset();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.mode, Mode::Idle);
        assert!(snapshot.dragged.is_none());
        assert_eq!(snapshot.board, Board::opening());
        // disarmed: further input is ignored
        assert!(!session.pointer_event(PointerEvent::press(50, 10)));
    }

    #[test]
    fn test_replace_board_is_wholesale() {
        let session = Session::new(InteractionStyle::Drag);
        session.replace_board(Board::empty());
        assert_eq!(session.snapshot().board, Board::empty());
        session.set_parent_pid(4242);
        assert_eq!(session.parent_pid(), Some(4242));
    }
}
