//! AI actor for async processing of analysis and reply requests

use std::sync::Arc;

use tokio::sync::mpsc;

use super::client::TextGenerator;
use super::service::{Temperatures, analyze_channel_profile, generate_reply};
use crate::error::ReplyError;
use crate::types::{ChannelProfile, CommentData};

/// Commands that can be sent to the AI actor
#[derive(Debug)]
pub enum AiCommand {
    /// Research a channel and derive a persona
    AnalyzeChannel { seq: u64, identifier: String },
    /// Draft a reply to a comment in the persona's voice
    GenerateReply {
        seq: u64,
        profile: ChannelProfile,
        comment: CommentData,
    },
    /// Shutdown the actor
    Shutdown,
}

/// Events emitted by the AI actor.
///
/// `seq` echoes the command so the app can drop superseded answers.
#[derive(Debug, Clone)]
pub enum AiEvent {
    ProfileAnalyzed {
        seq: u64,
        result: Result<ChannelProfile, ReplyError>,
    },
    ReplyGenerated {
        seq: u64,
        result: Result<String, ReplyError>,
    },
}

/// Handle for communicating with the AI actor
pub struct AiActorHandle {
    pub cmd_tx: mpsc::Sender<AiCommand>,
    pub event_rx: mpsc::Receiver<AiEvent>,
}

/// Spawn the AI actor task
pub fn spawn_ai_actor(
    generator: Arc<dyn TextGenerator>,
    temperatures: Temperatures,
) -> AiActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(32);

    tokio::spawn(ai_actor_loop(generator, temperatures, cmd_rx, event_tx));

    AiActorHandle { cmd_tx, event_rx }
}

async fn ai_actor_loop(
    generator: Arc<dyn TextGenerator>,
    temperatures: Temperatures,
    mut cmd_rx: mpsc::Receiver<AiCommand>,
    event_tx: mpsc::Sender<AiEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        // Each request runs on its own task so a slow generation does not
        // hold up an analysis (or the other way round).
        match cmd {
            AiCommand::AnalyzeChannel { seq, identifier } => {
                let generator = Arc::clone(&generator);
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let result = analyze_channel_profile(
                        generator.as_ref(),
                        &identifier,
                        temperatures.analysis,
                    )
                    .await;
                    if event_tx
                        .send(AiEvent::ProfileAnalyzed { seq, result })
                        .await
                        .is_err()
                    {
                        tracing::warn!("AI actor: event receiver dropped");
                    }
                });
            }

            AiCommand::GenerateReply {
                seq,
                profile,
                comment,
            } => {
                let generator = Arc::clone(&generator);
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let result =
                        generate_reply(generator.as_ref(), &profile, &comment, temperatures.reply)
                            .await;
                    if event_tx
                        .send(AiEvent::ReplyGenerated { seq, result })
                        .await
                        .is_err()
                    {
                        tracing::warn!("AI actor: event receiver dropped");
                    }
                });
            }

            AiCommand::Shutdown => {
                break;
            }
        }
    }
}
