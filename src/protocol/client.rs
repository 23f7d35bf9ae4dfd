//! Parent-side driver: spawns the front-end and talks to it over its stdio.

use super::command::{Choice, Command, GameResult, Reply, EOM};
use crate::core::{Board, Move, Owner};
use anyhow::{anyhow, bail, Context};
use std::ffi::OsStr;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tracing::{debug, trace};

pub struct GuiClient<R, W> {
    reader: R,
    writer: W,
}

impl GuiClient<BufReader<ChildStdout>, ChildStdin> {
    /// Launches the front-end with piped stdio and tells it our PID.
    pub async fn spawn<S, I>(program: S, args: I) -> anyhow::Result<(Self, Child)>
    where
        S: AsRef<OsStr>,
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .context("spawn front-end")?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin was not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout was not piped"))?;

        let mut client = GuiClient::new(BufReader::new(stdout), stdin);
        client.set_ppid(std::process::id()).await?;
        Ok((client, child))
    }
}

impl<R, W> GuiClient<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub async fn send(&mut self, command: &Command) -> anyhow::Result<()> {
        let line = format!("{}\n", command);
        trace!(record = %line.trim_end(), "sending");
        self.writer
            .write_all(line.as_bytes())
            .await
            .with_context(|| format!("send {}", command.name()))?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn set_ppid(&mut self, pid: u32) -> anyhow::Result<()> {
        self.send(&Command::SetPpid(pid)).await
    }

    pub async fn display(&mut self, board: &Board) -> anyhow::Result<()> {
        self.send(&Command::Display(board.clone())).await
    }

    pub async fn set_status(&mut self, text: &str) -> anyhow::Result<()> {
        check_payload(text)?;
        self.send(&Command::SetStatus(text.to_string())).await
    }

    /// Pops up a modal warning on the front-end.
    pub async fn show_message(&mut self, text: &str) -> anyhow::Result<()> {
        check_payload(text)?;
        self.send(&Command::Popup(text.to_string())).await
    }

    /// Asks the user for a move and waits for the answer.
    pub async fn get_move(&mut self, owner: Owner) -> anyhow::Result<Move> {
        self.send(&Command::GetMove(owner)).await?;
        loop {
            if let Reply::SelectedMove(mv) = self.read_reply().await? {
                return Ok(mv);
            }
        }
    }

    pub async fn game_over(&mut self, result: GameResult) -> anyhow::Result<Choice> {
        self.send(&Command::GameOver(result)).await?;
        loop {
            if let Reply::Response(choice) = self.read_reply().await? {
                return Ok(choice);
            }
        }
    }

    /// Next line that parses as a reply; anything else on the channel is skipped.
    async fn read_reply(&mut self) -> anyhow::Result<Reply> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self
                .reader
                .read_line(&mut line)
                .await
                .context("read reply")?;
            if n == 0 {
                bail!("front-end closed its output");
            }
            match line.parse::<Reply>() {
                Ok(reply) => return Ok(reply),
                Err(e) => debug!(error = %e, "skipping non-reply line"),
            }
        }
    }
}

/// Payloads travel as space-separated tokens up to `EOM`.
fn check_payload(text: &str) -> anyhow::Result<()> {
    if text.contains(['\n', '\r']) {
        bail!("message must fit on one line: {:?}", text);
    }
    if text.split(' ').any(|t| t == EOM) {
        bail!("message must not contain the {} sentinel: {:?}", EOM, text);
    }
    Ok(())
}
