use super::{DraggedPiece, Gesture, PointerEvent, PointerKind, Transition};
use crate::core::{tile_at, Board, Move, Owner};

/// Drag-and-drop: press lifts an owned piece, motion moves it, release drops it.
pub(super) fn transition(
    owner: Owner,
    gesture: &Gesture,
    board: &mut Board,
    event: PointerEvent,
) -> Transition {
    match (event.kind, gesture) {
        (PointerKind::Press, Gesture::None) => {
            let Some(tile) = tile_at(event.pos) else {
                return Transition::Ignore;
            };
            if !board.is_owned_by(tile, owner) {
                return Transition::Ignore;
            }
            match board.remove_piece(tile) {
                Some(piece) => Transition::Update(Gesture::Dragging {
                    source: tile,
                    dragged: DraggedPiece {
                        pos: event.pos,
                        piece,
                    },
                }),
                None => Transition::Ignore,
            }
        }
        (PointerKind::Motion, Gesture::Dragging { source, dragged }) => {
            Transition::Update(Gesture::Dragging {
                source: *source,
                dragged: DraggedPiece {
                    pos: event.pos,
                    piece: dragged.piece,
                },
            })
        }
        (PointerKind::Release, Gesture::Dragging { source, dragged }) => match tile_at(event.pos) {
            Some(to) => Transition::Commit(Move::new(*source, to)),
            None => {
                // 盤外で離した: 元の位置に戻す
                if board.get_piece(*source).is_none() {
                    board.place_piece(*source, dragged.piece);
                }
                Transition::Update(Gesture::None)
            }
        },
        _ => Transition::Ignore,
    }
}
