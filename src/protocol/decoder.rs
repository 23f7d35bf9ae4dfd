use super::command::{Command, Reply};
use super::error::ProtocolError;
use crate::presenter::Presenter;
use crate::session::{Session, DEFAULT_POLL_INTERVAL};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

pub const INITIAL_STATUS: &str = "New Game";

/// Reads command records from the parent and carries them out, one at a time.
pub struct Decoder<P, W> {
    session: Arc<Session>,
    presenter: P,
    out: W,
    status: String,
    poll_interval: Duration,
}

impl<P, W> Decoder<P, W>
where
    P: Presenter,
    W: AsyncWrite + Unpin,
{
    pub fn new(session: Arc<Session>, presenter: P, out: W) -> Self {
        Self {
            session,
            presenter,
            out,
            status: INITIAL_STATUS.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Status text the presenter shows before the first `set_status`.
    pub fn with_initial_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Runs until the inbound channel closes.
    ///
    /// Malformed records (including non-UTF-8 ones) are logged and skipped; I/O errors
    /// end the loop.
    pub async fn run<R>(&mut self, mut reader: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .await
                .context("read command record")?;
            if n == 0 {
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    let record = String::from_utf8_lossy(&buf);
                    warn!(error = %e, record = %record.trim_end(), "non-UTF-8 record skipped");
                    continue;
                }
            };
            match line.parse::<Command>() {
                Ok(command) => self.handle(command).await?,
                Err(ProtocolError::Empty) => debug!("empty record"),
                Err(e) => warn!(error = %e, record = %line.trim_end(), "malformed record skipped"),
            }
        }
        info!("inbound channel closed");
        Ok(())
    }

    #[instrument(skip_all, fields(command = command.name()))]
    async fn handle(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::SetPpid(pid) => {
                debug!(pid, "parent process recorded");
                self.session.set_parent_pid(pid);
            }
            Command::SetStatus(text) => {
                if text != self.status {
                    self.presenter.status_changed(&text);
                    self.status = text;
                }
            }
            Command::Display(board) => {
                self.session.replace_board(board.clone());
                self.presenter.board_changed(&board);
            }
            Command::GetMove(owner) => {
                self.session.arm(owner);
                // 盤面の選択状態が変わるので再描画
                self.presenter.board_changed(&self.session.board());
                let mv = self.session.wait_for_move(self.poll_interval).await;
                info!(%owner, %mv, "move selected");
                self.write_reply(Reply::SelectedMove(mv)).await?;
            }
            Command::Popup(text) => self.presenter.warning(&text),
            Command::GameOver(result) => {
                // 終局: 途中のジェスチャーを捨てて待機状態に戻す
                self.session.reset();
                self.presenter.board_changed(&self.session.board());
                let choice = self.presenter.game_over(result).await?;
                info!(?result, ?choice, "game over answered");
                self.write_reply(Reply::Response(choice)).await?;
            }
        }
        Ok(())
    }

    async fn write_reply(&mut self, reply: Reply) -> anyhow::Result<()> {
        let line = format!("{}\n", reply);
        self.out
            .write_all(line.as_bytes())
            .await
            .context("write reply")?;
        self.out.flush().await.context("flush reply")?;
        Ok(())
    }
}
