//! Checkers board front-end driven by a line protocol on stdin/stdout.
//!
//! The engine (parent process) sends command records; the front-end draws the board
//! on the terminal, collects moves with the mouse, and writes replies back.

pub mod config;
pub mod core;
pub mod display;
pub mod interaction;
pub mod lifecycle;
pub mod logging;
pub mod presenter;
pub mod protocol;
pub mod session;
pub mod ui;
