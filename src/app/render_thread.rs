//! Background render thread for non-blocking UI rendering.
//!
//! The render thread owns the Terminal and draws snapshots of AppState sent
//! from the event loop, so AI and auth events keep flowing while a frame is
//! drawn. The event loop keeps its dirty flag set until a snapshot has been
//! accepted, so the last change before going idle is always drawn.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use anyhow::{Result, bail};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::state::AppState;

type Term = Terminal<CrosstermBackend<Stdout>>;

pub enum RenderCommand {
    Render(Box<AppState>),
    Shutdown,
}

/// Handle to the background render thread.
pub struct RenderThread {
    cmd_tx: SyncSender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Spawn the render thread and wait until it has taken over the terminal.
    ///
    /// Fails if raw mode or the alternate screen cannot be set up, instead of
    /// leaving the app running with nothing on screen.
    pub fn spawn() -> Result<Self> {
        // Capacity 1: at most one snapshot waits while a frame is drawn
        let (cmd_tx, cmd_rx) = mpsc::sync_channel::<RenderCommand>(1);
        let (ready_tx, ready_rx) = mpsc::channel::<io::Result<()>>();

        let handle = thread::spawn(move || {
            let terminal = match setup_terminal() {
                Ok(terminal) => {
                    ready_tx.send(Ok(())).ok();
                    terminal
                }
                Err(e) => {
                    restore_terminal(None);
                    ready_tx.send(Err(e)).ok();
                    return;
                }
            };
            draw_loop(terminal, cmd_rx);
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                cmd_tx,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                handle.join().ok();
                Err(anyhow::Error::new(e).context("Failed to set up the terminal"))
            }
            Err(_) => {
                handle.join().ok();
                bail!("Render thread exited during terminal setup")
            }
        }
    }

    /// Offer a snapshot to the render thread without blocking.
    ///
    /// Returns `Ok(false)` when a frame is still queued; the caller keeps the
    /// state dirty and offers a fresher snapshot on its next iteration.
    pub fn render(&self, state: AppState) -> Result<bool> {
        match self.cmd_tx.try_send(RenderCommand::Render(Box::new(state))) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Render thread busy, frame deferred");
                Ok(false)
            }
            Err(TrySendError::Disconnected(_)) => bail!("Render thread stopped"),
        }
    }

    /// Shutdown the render thread and wait for it to restore the terminal.
    pub fn shutdown(mut self) {
        self.cmd_tx.send(RenderCommand::Shutdown).ok();

        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }

    /// A handle with no thread behind it; the test drains the receiver itself
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, Receiver<RenderCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::sync_channel(1);
        (
            Self {
                cmd_tx,
                handle: None,
            },
            cmd_rx,
        )
    }
}

fn setup_terminal() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: Option<&mut Term>) {
    disable_raw_mode().ok();
    match terminal {
        Some(terminal) => execute!(terminal.backend_mut(), LeaveAlternateScreen).ok(),
        None => execute!(io::stdout(), LeaveAlternateScreen).ok(),
    };
}

fn draw_loop(mut terminal: Term, cmd_rx: Receiver<RenderCommand>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            RenderCommand::Render(state) => {
                if let Err(e) = terminal.draw(|f| crate::ui::render(f, &state)) {
                    tracing::error!("Render error: {}", e);
                }
            }
            RenderCommand::Shutdown => break,
        }
    }
    restore_terminal(Some(&mut terminal));
}
