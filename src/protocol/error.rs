use crate::core::CellCodeError;
use thiserror::Error;

/// A record that could not be decoded. The decoder logs these and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty record")]
    Empty,

    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("{command}: missing {expected}")]
    MissingToken {
        command: String,
        expected: &'static str,
    },

    #[error("{command}: message is not terminated by EOM")]
    Unterminated { command: String },

    #[error("{command}: invalid integer {token:?}")]
    InvalidInteger { command: String, token: String },

    #[error("display: {0}")]
    CellCode(#[from] CellCodeError),

    #[error("get_move: invalid side {0:?}")]
    InvalidSide(String),

    #[error("game_over: invalid result {0:?}")]
    InvalidResult(String),

    #[error("malformed reply: {0:?}")]
    MalformedReply(String),
}
