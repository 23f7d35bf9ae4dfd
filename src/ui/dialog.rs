use crate::display::DialogView;
use crate::protocol::{Choice, GameResult};
use crossterm::event::KeyCode;
use tokio::sync::oneshot;
use tracing::warn;

/// Modal dialogs raised by the protocol side.
#[derive(Debug)]
pub enum Dialog {
    Warning {
        text: String,
    },
    GameOver {
        result: GameResult,
        choice: Choice,
        reply: oneshot::Sender<Choice>,
    },
}

impl Dialog {
    pub fn warning(text: String) -> Self {
        Dialog::Warning { text }
    }

    pub fn game_over(result: GameResult, reply: oneshot::Sender<Choice>) -> Self {
        Dialog::GameOver {
            result,
            choice: Choice::default(),
            reply,
        }
    }

    /// Returns the dialog back while it stays open, `None` once it is closed.
    pub fn handle_key(mut self, code: KeyCode) -> Option<Self> {
        match &mut self {
            Dialog::Warning { .. } => match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => None,
                _ => Some(self),
            },
            Dialog::GameOver { choice, .. } => match code {
                KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                    *choice = match choice {
                        Choice::Exit => Choice::Rematch,
                        Choice::Rematch => Choice::Exit,
                    };
                    Some(self)
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let choice = *choice;
                    self.answer(choice);
                    None
                }
                KeyCode::Char('e') => {
                    self.answer(Choice::Exit);
                    None
                }
                KeyCode::Char('p') => {
                    self.answer(Choice::Rematch);
                    None
                }
                _ => Some(self),
            },
        }
    }

    fn answer(self, choice: Choice) {
        if let Dialog::GameOver { reply, .. } = self {
            if reply.send(choice).is_err() {
                warn!(?choice, "game-over answer dropped: protocol side is gone");
            }
        }
    }

    pub fn view(&self) -> DialogView {
        match self {
            Dialog::Warning { text } => DialogView {
                title: "Illegal Move".to_string(),
                lines: wrap(text, 32),
                options: Vec::new(),
                help: "[Enter]: OK".to_string(),
            },
            Dialog::GameOver { result, choice, .. } => DialogView {
                title: "Game Over".to_string(),
                lines: vec![result.message().to_string()],
                options: [Choice::Exit, Choice::Rematch]
                    .into_iter()
                    .map(|c| (c.label().to_string(), c == *choice))
                    .collect(),
                help: "[←/→]: Choose | [Enter]: Confirm".to_string(),
            },
        }
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
