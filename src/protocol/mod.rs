pub mod client;
pub mod command;
pub mod decoder;
pub mod error;

pub use client::GuiClient;
pub use command::{Choice, Command, GameResult, Reply};
pub use decoder::Decoder;
pub use error::ProtocolError;
