use crate::core::Board;
use crate::protocol::{Choice, GameResult};
use async_trait::async_trait;

/// The outward face of the front-end: whatever draws the board and owns the dialogs.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// A new board snapshot was stored; repaint.
    fn board_changed(&self, board: &Board);
    fn status_changed(&self, text: &str);
    /// Modal warning, typically an illegal-move notice from the engine.
    ///
    /// Returns without waiting for the user to dismiss it, so the next record is read
    /// while the warning is still up. Board input stays blocked until it is closed.
    fn warning(&self, text: &str);
    /// Shows the result and waits for the user to choose between exit and rematch.
    async fn game_over(&self, result: GameResult) -> anyhow::Result<Choice>;
}
