//! Wire grammar shared by the front-end (decoding commands, encoding replies) and the
//! parent-side client (the reverse).
//!
//! Records are newline-terminated and split on single spaces. Free-text payloads run
//! until the `EOM` sentinel.

use super::error::ProtocolError;
use crate::core::{Board, Move, Owner, Tile, BOARD_SIZE};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const EOM: &str = "EOM";
pub const MOVE_TAG: &str = "SELECTED_MOVE:";
pub const RESPONSE_TAG: &str = "RESPONSE:";

const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    BlackWins,
    WhiteWins,
    Tie,
}

impl GameResult {
    pub fn token(self) -> &'static str {
        match self {
            GameResult::BlackWins => "black",
            GameResult::WhiteWins => "white",
            GameResult::Tie => "tie",
        }
    }

    /// Dialog headline.
    pub fn message(self) -> &'static str {
        match self {
            GameResult::BlackWins => "Black Player wins!",
            GameResult::WhiteWins => "White Player wins!",
            GameResult::Tie => "It is a tie!",
        }
    }
}

impl FromStr for GameResult {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "black" => Ok(GameResult::BlackWins),
            "white" => Ok(GameResult::WhiteWins),
            "tie" => Ok(GameResult::Tie),
            other => Err(ProtocolError::InvalidResult(other.to_string())),
        }
    }
}

/// The user's answer to the game-over dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice {
    Exit,
    #[default]
    Rematch,
}

impl Choice {
    pub fn code(self) -> u8 {
        match self {
            Choice::Exit => 0,
            Choice::Rematch => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Choice::Exit),
            1 => Some(Choice::Rematch),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Choice::Exit => "Exit Game",
            Choice::Rematch => "Play Again",
        }
    }
}

/// Parent -> front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetPpid(u32),
    SetStatus(String),
    Display(Board),
    GetMove(Owner),
    Popup(String),
    GameOver(GameResult),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetPpid(_) => "set_ppid",
            Command::SetStatus(_) => "set_status",
            Command::Display(_) => "display",
            Command::GetMove(_) => "get_move",
            Command::Popup(_) => "popup",
            Command::GameOver(_) => "game_over",
        }
    }
}

/// Positional token consumer for one record.
struct TokenQueue<'a> {
    command: &'a str,
    tokens: VecDeque<&'a str>,
}

impl<'a> TokenQueue<'a> {
    fn next(&mut self, expected: &'static str) -> Result<&'a str, ProtocolError> {
        self.tokens
            .pop_front()
            .ok_or_else(|| ProtocolError::MissingToken {
                command: self.command.to_string(),
                expected,
            })
    }

    fn int<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ProtocolError> {
        let token = self.next(expected)?;
        token.parse().map_err(|_| ProtocolError::InvalidInteger {
            command: self.command.to_string(),
            token: token.to_string(),
        })
    }

    fn until_eom(&mut self) -> Result<String, ProtocolError> {
        let mut words = Vec::new();
        while let Some(token) = self.tokens.pop_front() {
            if token == EOM {
                return Ok(words.join(" "));
            }
            words.push(token);
        }
        Err(ProtocolError::Unterminated {
            command: self.command.to_string(),
        })
    }

    fn finish(self) {
        if !self.tokens.is_empty() {
            debug!(command = self.command, extra = ?self.tokens, "ignoring trailing tokens");
        }
    }
}

fn tokenize<'a>(line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    line.trim_end_matches(['\r', '\n'])
        .split(' ')
        .filter(|t| !t.is_empty())
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens: VecDeque<&str> = tokenize(line).collect();
        let name = tokens.pop_front().ok_or(ProtocolError::Empty)?;
        let mut queue = TokenQueue {
            command: name,
            tokens,
        };

        let command = match name {
            "set_ppid" => Command::SetPpid(queue.int("process id")?),
            "set_status" => Command::SetStatus(queue.until_eom()?),
            "display" => {
                let mut codes = Vec::with_capacity(CELL_COUNT);
                for _ in 0..CELL_COUNT {
                    codes.push(queue.int::<i32>("cell code")?);
                }
                Command::Display(Board::from_codes(codes)?)
            }
            "get_move" => {
                let side = queue.next("side")?;
                Command::GetMove(side.parse().map_err(ProtocolError::InvalidSide)?)
            }
            "popup" => Command::Popup(queue.until_eom()?),
            "game_over" => Command::GameOver(queue.next("result")?.parse()?),
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };
        queue.finish();
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = self.name();
        match self {
            Command::SetPpid(pid) => write!(f, "{} {}", name, pid),
            Command::SetStatus(text) | Command::Popup(text) if text.is_empty() => {
                write!(f, "{} {}", name, EOM)
            }
            Command::SetStatus(text) | Command::Popup(text) => {
                write!(f, "{} {} {}", name, text, EOM)
            }
            Command::Display(board) => write!(f, "{} {}", name, board),
            Command::GetMove(owner) => write!(f, "{} {}", name, owner),
            Command::GameOver(result) => write!(f, "{} {}", name, result.token()),
        }
    }
}

/// Front-end -> parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    SelectedMove(Move),
    Response(Choice),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reply::SelectedMove(mv) => write!(f, "{} {}", MOVE_TAG, mv),
            Reply::Response(choice) => write!(f, "{} {}", RESPONSE_TAG, choice.code()),
        }
    }
}

impl FromStr for Reply {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || ProtocolError::MalformedReply(line.to_string());
        let tokens: Vec<&str> = tokenize(line).collect();

        match tokens.as_slice() {
            [MOVE_TAG, coords @ ..] if coords.len() == 4 => {
                let mut values = [0i32; 4];
                for (slot, token) in values.iter_mut().zip(coords) {
                    *slot = token.parse().map_err(|_| malformed())?;
                }
                let [fc, fr, tc, tr] = values;
                let from = Tile::from_coords(fc, fr).ok_or_else(malformed)?;
                let to = Tile::from_coords(tc, tr).ok_or_else(malformed)?;
                Ok(Reply::SelectedMove(Move::new(from, to)))
            }
            [RESPONSE_TAG, code] => code
                .parse()
                .ok()
                .and_then(Choice::from_code)
                .map(Reply::Response)
                .ok_or_else(malformed),
            _ => Err(malformed()),
        }
    }
}
