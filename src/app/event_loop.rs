//! Main event loop and actor event processing

use anyhow::Result;
use crossterm::event;
use std::time::Duration;

use crate::ai::AiEvent;
use crate::auth::{AccessToken, AuthCommand, AuthEvent};
use crate::constants::{POLL_BUSY_MS, POLL_IDLE_MS};
use crate::input::{InputResult, handle_input};

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Process actor events first (non-blocking)
            if self.process_ai_events() {
                self.dirty = true;
            }
            if self.process_auth_events() {
                self.dirty = true;
            }

            // Clear expired errors
            if self.state.clear_error_if_expired() {
                self.dirty = true;
            }

            // Keep the spinner moving
            if self.state.is_busy() {
                self.dirty = true;
            }

            self.flush_frame(render_thread)?;

            // A deferred frame is retried on the short interval
            let poll_timeout = if self.state.is_busy() || self.dirty {
                POLL_BUSY_MS
            } else {
                POLL_IDLE_MS
            };
            if event::poll(Duration::from_millis(poll_timeout))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.state, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => {
                        self.state.acknowledge_error();
                        self.handle_action(action).await;
                    }
                    InputResult::Char(c) => {
                        self.state.acknowledge_error();
                        self.handle_char(c);
                    }
                    InputResult::Backspace => {
                        self.state.acknowledge_error();
                        self.handle_backspace();
                    }
                    InputResult::Continue => {}
                }
            }

            if self.quit_requested {
                break;
            }
        }

        Ok(())
    }

    /// Hand a snapshot to the render thread when dirty. The flag stays set
    /// while the thread is still busy with an earlier frame.
    pub(crate) fn flush_frame(&mut self, render_thread: &RenderThread) -> Result<()> {
        if self.dirty {
            self.dirty = !render_thread.render(self.state.clone())?;
        }
        Ok(())
    }

    /// Drain AI actor events. Returns true if any events were processed.
    pub(crate) fn process_ai_events(&mut self) -> bool {
        let mut events = Vec::new();
        if let Some(ai) = self.ai_actor.as_mut() {
            while let Ok(event) = ai.event_rx.try_recv() {
                events.push(event);
            }
        }

        let had_events = !events.is_empty();
        for event in events {
            match event {
                AiEvent::ProfileAnalyzed { seq, result } => self.on_profile_analyzed(seq, result),
                AiEvent::ReplyGenerated { seq, result } => self.on_reply_generated(seq, result),
            }
        }
        had_events
    }

    /// Drain auth actor events. Returns true if any events were processed.
    pub(crate) fn process_auth_events(&mut self) -> bool {
        let mut events = Vec::new();
        if let Some(auth) = self.auth_actor.as_mut() {
            while let Ok(event) = auth.event_rx.try_recv() {
                events.push(event);
            }
        }

        let had_events = !events.is_empty();
        for event in events {
            match event {
                AuthEvent::TokenGranted { attempt } if self.state.auth.accepts(attempt) => {
                    self.state.auth.token_granted();
                    self.state.set_status("Loading your Google profile...");
                }
                AuthEvent::LoggedIn {
                    attempt,
                    user,
                    token,
                } => {
                    if self.state.auth.accepts(attempt) {
                        self.state.set_status(format!("Signed in as {}", user.name));
                        self.state.auth.logged_in(user, token);
                    } else {
                        tracing::info!("Discarding sign-in #{} abandoned by sign-out", attempt);
                        self.revoke_abandoned(token);
                    }
                }
                AuthEvent::LoginFailed { attempt, error } if self.state.auth.accepts(attempt) => {
                    self.state.auth.login_failed();
                    self.state.set_status("");
                    self.state.set_error(error);
                }
                AuthEvent::TokenGranted { attempt } | AuthEvent::LoginFailed { attempt, .. } => {
                    tracing::debug!("Ignoring event from abandoned sign-in #{}", attempt);
                }
                AuthEvent::Revoked => {
                    tracing::debug!("Google grant revoked");
                }
                AuthEvent::RevokeFailed(reason) => {
                    // Already signed out locally
                    tracing::warn!("Revoke failed after sign-out: {}", reason);
                }
            }
        }
        had_events
    }

    /// Revoke a token granted to a login the user already walked away from
    fn revoke_abandoned(&self, token: AccessToken) {
        if let Some(auth) = &self.auth_actor
            && auth.cmd_tx.try_send(AuthCommand::Logout { token }).is_err()
        {
            tracing::warn!("Could not queue revoke for abandoned sign-in");
        }
    }
}
