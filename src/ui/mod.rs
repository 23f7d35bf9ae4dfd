//! Terminal front-end: draws the session on stderr and feeds mouse input back into it.

pub mod dialog;

use crate::core::Board;
use crate::display::{cell_to_pixel, render_board, DisplayState};
use crate::interaction::{InteractionStyle, PointerEvent, PointerKind};
use crate::presenter::Presenter;
use crate::protocol::{Choice, GameResult};
use crate::session::Session;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, terminal,
};
use dialog::Dialog;
use std::collections::VecDeque;
use std::io::{self, BufWriter};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

const EVENT_POLL: Duration = Duration::from_millis(50);

/// Requests from the protocol side to the UI thread.
#[derive(Debug)]
pub enum UiRequest {
    Repaint,
    Status(String),
    Warning(String),
    GameOver(GameResult, oneshot::Sender<Choice>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    /// The user closed the window.
    Closed,
    /// The protocol side asked the UI to stop.
    Shutdown,
}

/// [`Presenter`] that forwards everything to the UI thread.
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    tx: Sender<UiRequest>,
}

impl TerminalPresenter {
    pub fn new(tx: Sender<UiRequest>) -> Self {
        Self { tx }
    }

    fn send(&self, request: UiRequest) {
        if self.tx.send(request).is_err() {
            warn!("UI thread has exited; request dropped");
        }
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    fn board_changed(&self, _board: &Board) {
        // 盤面は Session から直接読む
        self.send(UiRequest::Repaint);
    }

    fn status_changed(&self, text: &str) {
        self.send(UiRequest::Status(text.to_string()));
    }

    fn warning(&self, text: &str) {
        self.send(UiRequest::Warning(text.to_string()));
    }

    async fn game_over(&self, result: GameResult) -> anyhow::Result<Choice> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(UiRequest::GameOver(result, reply_tx))
            .map_err(|_| anyhow!("UI thread has exited"))?;
        reply_rx
            .await
            .context("game-over dialog closed without an answer")
    }
}

/// Turns raw mouse reports into pointer events.
///
/// A left press and release on the same terminal cell also yields a `Click`.
#[derive(Debug, Default)]
pub struct MouseTranslator {
    pressed_at: Option<(u16, u16)>,
}

impl MouseTranslator {
    pub fn translate(&mut self, mouse: MouseEvent) -> Vec<PointerEvent> {
        let cell = (mouse.column, mouse.row);
        let p = cell_to_pixel(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed_at = Some(cell);
                vec![PointerEvent::new(PointerKind::Press, p.x, p.y)]
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                vec![PointerEvent::new(PointerKind::Motion, p.x, p.y)]
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let mut events = vec![PointerEvent::new(PointerKind::Release, p.x, p.y)];
                if self.pressed_at.take() == Some(cell) {
                    events.push(PointerEvent::new(PointerKind::Click, p.x, p.y));
                }
                events
            }
            _ => Vec::new(),
        }
    }
}

struct TerminalUi<'a> {
    session: &'a Session,
    style: InteractionStyle,
    status: String,
    dialogs: VecDeque<Dialog>,
    mouse: MouseTranslator,
    dirty: bool,
}

impl<'a> TerminalUi<'a> {
    /// Returns false when the UI should stop.
    fn apply(&mut self, request: UiRequest) -> bool {
        match request {
            UiRequest::Repaint => {}
            UiRequest::Status(text) => self.status = text,
            UiRequest::Warning(text) => self.dialogs.push_back(Dialog::warning(text)),
            UiRequest::GameOver(result, reply) => {
                self.dialogs.push_back(Dialog::game_over(result, reply))
            }
            UiRequest::Shutdown => return false,
        }
        self.dirty = true;
        true
    }

    fn render(&mut self) -> io::Result<()> {
        let snapshot = self.session.snapshot();
        let state = DisplayState {
            status_msg: self.status.clone(),
            style: self.style,
            mode: snapshot.mode,
            dragged: snapshot.dragged,
            dialog: self.dialogs.front().map(Dialog::view),
        };
        let mut out = BufWriter::new(io::stderr().lock());
        render_board(&mut out, &snapshot.board, &state)
    }

    /// Returns `Some(UiExit::Closed)` when the key closes the window.
    fn on_key(&mut self, key: KeyEvent) -> Option<UiExit> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(UiExit::Closed);
        }
        if let Some(dialog) = self.dialogs.pop_front() {
            if let Some(dialog) = dialog.handle_key(key.code) {
                self.dialogs.push_front(dialog);
            }
            self.dirty = true;
            return None;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(UiExit::Closed),
            _ => None,
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        // モーダル表示中は盤面を触らせない
        if !self.dialogs.is_empty() {
            return;
        }
        for event in self.mouse.translate(mouse) {
            if self.session.pointer_event(event) {
                self.dirty = true;
            }
        }
    }

    fn event_loop(&mut self, requests: &Receiver<UiRequest>) -> anyhow::Result<UiExit> {
        loop {
            loop {
                match requests.try_recv() {
                    Ok(request) => {
                        if !self.apply(request) {
                            return Ok(UiExit::Shutdown);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return Ok(UiExit::Shutdown),
                }
            }

            if self.dirty {
                self.render().context("render board")?;
                self.dirty = false;
            }

            if event::poll(EVENT_POLL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if let Some(exit) = self.on_key(key) {
                            return Ok(exit);
                        }
                    }
                    Event::Mouse(mouse) => self.on_mouse(mouse),
                    Event::Resize(..) => self.dirty = true,
                    _ => {}
                }
            }
        }
    }
}

/// Runs the terminal UI on the current thread until the window is closed or the
/// protocol side shuts it down. The terminal is restored either way.
pub fn run(
    session: &Session,
    requests: Receiver<UiRequest>,
    initial_status: String,
) -> anyhow::Result<UiExit> {
    let style = session.style();
    terminal::enable_raw_mode().context("enable raw mode")?;
    execute!(
        io::stderr(),
        terminal::EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )?;
    info!(?style, "terminal UI started");

    let mut ui = TerminalUi {
        session,
        style,
        status: initial_status,
        dialogs: VecDeque::new(),
        mouse: MouseTranslator::default(),
        dirty: true,
    };
    let res = ui.event_loop(&requests);

    // ターミナル復帰
    execute!(
        io::stderr(),
        DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;
    debug!(?res, "terminal UI stopped");

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Move, Owner, Tile};
    use crate::display::{BOARD_LEFT, BOARD_TOP, TILE_COLS, TILE_ROWS};
    use std::sync::mpsc;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn tile_cell(col: u16, row: u16) -> (u16, u16) {
        (BOARD_LEFT + col * TILE_COLS + 2, BOARD_TOP + row * TILE_ROWS)
    }

    #[test]
    fn test_translator_emits_click_only_for_stationary_press() {
        let mut translator = MouseTranslator::default();
        let down = translator.translate(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        assert_eq!(down.len(), 1);
        assert_eq!(down[0].kind, PointerKind::Press);

        let up = translator.translate(mouse(MouseEventKind::Up(MouseButton::Left), 10, 5));
        let kinds: Vec<_> = up.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![PointerKind::Release, PointerKind::Click]);

        translator.translate(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        translator.translate(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 7));
        let up = translator.translate(mouse(MouseEventKind::Up(MouseButton::Left), 20, 7));
        assert_eq!(up.len(), 1);

        assert!(translator
            .translate(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1))
            .is_empty());
    }

    #[test]
    fn test_terminal_drag_reaches_session() {
        let session = Session::new(InteractionStyle::Drag);
        session.arm(Owner::Black);
        let mut ui = TerminalUi {
            session: &session,
            style: session.style(),
            status: String::new(),
            dialogs: VecDeque::new(),
            mouse: MouseTranslator::default(),
            dirty: false,
        };

        let (c, r) = tile_cell(2, 2);
        ui.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), c, r));
        assert!(ui.dirty);
        let (c, r) = tile_cell(3, 3);
        ui.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), c, r));
        ui.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), c, r));
        assert_eq!(
            session.take_pending_move(),
            Some(Move::new(Tile::new(2, 2), Tile::new(3, 3)))
        );
    }

    #[test]
    fn test_dialog_blocks_board_input_and_keys() {
        let session = Session::new(InteractionStyle::Click);
        session.arm(Owner::Black);
        let mut ui = TerminalUi {
            session: &session,
            style: session.style(),
            status: String::new(),
            dialogs: VecDeque::new(),
            mouse: MouseTranslator::default(),
            dirty: false,
        };
        assert!(ui.apply(UiRequest::Warning("Illegal move".to_string())));

        let (c, r) = tile_cell(0, 0);
        ui.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), c, r));
        ui.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), c, r));
        assert_eq!(session.board().selected_tile(), None);

        // Esc dismisses the dialog, not the window
        assert_eq!(ui.on_key(KeyEvent::from(KeyCode::Esc)), None);
        assert!(ui.dialogs.is_empty());
        assert_eq!(
            ui.on_key(KeyEvent::from(KeyCode::Char('q'))),
            Some(UiExit::Closed)
        );
        assert!(!ui.apply(UiRequest::Shutdown));
    }

    #[tokio::test]
    async fn test_presenter_game_over_round_trip() {
        let (tx, rx) = mpsc::channel();
        let presenter = TerminalPresenter::new(tx);
        let ui_side = std::thread::spawn(move || match rx.recv() {
            Ok(UiRequest::GameOver(GameResult::WhiteWins, reply)) => {
                let _ = reply.send(Choice::Exit);
            }
            other => panic!("unexpected request: {:?}", other),
        });
        let choice = presenter.game_over(GameResult::WhiteWins).await.unwrap();
        assert_eq!(choice, Choice::Exit);
        ui_side.join().unwrap();
    }
}
