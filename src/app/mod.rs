//! Application core - owns state and coordinates the AI and auth actors

mod actions;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;
use std::sync::Arc;

use render_thread::RenderThread;

use crate::ai::{AiActorHandle, AiCommand, GeminiClient, Temperatures, spawn_ai_actor};
use crate::auth::{AuthActorHandle, AuthCommand, AuthState, GoogleIdentity, spawn_auth_actor};
use crate::clipboard::ClipboardWriter;
use crate::config::{ClientIdStatus, Config};
use crate::input::KeyBindings;
use state::{AppState, View};

pub struct App {
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    /// AI actor handle (None when no API key is configured)
    pub(crate) ai_actor: Option<AiActorHandle>,
    /// Auth actor handle (None when no OAuth client id is configured)
    pub(crate) auth_actor: Option<AuthActorHandle>,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
    /// Set by `:quit`
    pub(crate) quit_requested: bool,
    /// Opened on first copy
    pub(crate) clipboard: Option<Box<dyn ClipboardWriter>>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let ai_actor = config.gemini.get_api_key().map(|api_key| {
            let client = GeminiClient::new(
                api_key,
                config.gemini.model.clone(),
                config.gemini.base_url.clone(),
            );
            spawn_ai_actor(
                Arc::new(client),
                Temperatures {
                    analysis: config.gemini.analysis_temperature,
                    reply: config.gemini.reply_temperature,
                },
            )
        });

        let view = if ai_actor.is_some() {
            View::Main
        } else {
            tracing::warn!("No Gemini API key configured");
            View::MissingApiKey
        };

        let auth_actor = Self::init_auth(config);
        let auth = AuthState::new(auth_actor.is_some());

        Ok(Self {
            state: AppState::new(view, auth),
            bindings: KeyBindings::new(),
            ai_actor,
            auth_actor,
            dirty: true, // Start dirty for initial render
            quit_requested: false,
            clipboard: None,
        })
    }

    fn init_auth(config: &Config) -> Option<AuthActorHandle> {
        match config.auth.client_id_status() {
            ClientIdStatus::Configured(client_id) => {
                let secret = config.auth.get_client_secret();
                match GoogleIdentity::new(&client_id, secret.as_deref()) {
                    Ok(identity) => Some(spawn_auth_actor(Arc::new(identity))),
                    Err(e) => {
                        tracing::error!("Failed to initialize Google sign-in: {:#}", e);
                        None
                    }
                }
            }
            ClientIdStatus::Placeholder => {
                tracing::warn!("OAuth client id is still the placeholder; sign-in disabled");
                None
            }
            ClientIdStatus::Missing => {
                tracing::info!("No OAuth client id configured; sign-in disabled");
                None
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        if self.state.view == View::Main {
            self.state
                .set_status("Describe your channel, then paste a comment to reply to");
        }

        let result = self.event_loop(&render_thread).await;

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        self.shutdown_actors().await;

        result
    }

    async fn shutdown_actors(&mut self) {
        if let Some(ai) = &self.ai_actor {
            ai.cmd_tx.send(AiCommand::Shutdown).await.ok();
        }
        if let Some(auth) = &self.auth_actor {
            auth.cmd_tx.send(AuthCommand::Shutdown).await.ok();
        }
    }
}
