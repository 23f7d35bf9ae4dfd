use super::{Gesture, PointerEvent, PointerKind, Transition};
use crate::core::{tile_at, Board, Move, Owner};

/// Click-click: the first click selects an owned piece, the next click picks the target.
///
/// The selection flag is left on the board after the move is committed; the next
/// `display` (or re-arming) clears it.
pub(super) fn transition(
    owner: Owner,
    gesture: &Gesture,
    board: &mut Board,
    event: PointerEvent,
) -> Transition {
    if event.kind != PointerKind::Click {
        return Transition::Ignore;
    }
    let Some(tile) = tile_at(event.pos) else {
        return Transition::Ignore;
    };

    match gesture {
        Gesture::Selected { source } => Transition::Commit(Move::new(*source, tile)),
        Gesture::None if board.is_owned_by(tile, owner) => {
            board.set_selected(tile, true);
            Transition::Update(Gesture::Selected { source: tile })
        }
        _ => Transition::Ignore,
    }
}
