//! Auth actor: runs the identity provider calls off the event loop

use std::sync::Arc;

use tokio::sync::mpsc;

use super::provider::{AccessToken, IdentityProvider};
use crate::error::ReplyError;
use crate::types::UserProfile;

#[derive(Debug)]
pub enum AuthCommand {
    /// Consent flow, then profile fetch
    Login { attempt: u64 },
    /// Revoke a token that has already been cleared locally
    Logout { token: AccessToken },
    Shutdown,
}

/// Login events carry the attempt they belong to so an abandoned sign-in
/// cannot land after a sign-out
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// Consent finished; the profile is being fetched
    TokenGranted {
        attempt: u64,
    },
    LoggedIn {
        attempt: u64,
        user: UserProfile,
        token: AccessToken,
    },
    LoginFailed {
        attempt: u64,
        error: ReplyError,
    },
    Revoked,
    RevokeFailed(String),
}

/// Handle for communicating with the auth actor
pub struct AuthActorHandle {
    pub cmd_tx: mpsc::Sender<AuthCommand>,
    pub event_rx: mpsc::Receiver<AuthEvent>,
}

/// Spawn the auth actor task
pub fn spawn_auth_actor(provider: Arc<dyn IdentityProvider>) -> AuthActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (event_tx, event_rx) = mpsc::channel(16);

    tokio::spawn(auth_actor_loop(provider, cmd_rx, event_tx));

    AuthActorHandle { cmd_tx, event_rx }
}

async fn auth_actor_loop(
    provider: Arc<dyn IdentityProvider>,
    mut cmd_rx: mpsc::Receiver<AuthCommand>,
    event_tx: mpsc::Sender<AuthEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            // Each attempt runs on its own task; an abandoned consent flow
            // waiting on the browser must not hold up the next one
            AuthCommand::Login { attempt } => {
                let provider = Arc::clone(&provider);
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    if let Some(event) = login(attempt, provider.as_ref(), &event_tx).await {
                        event_tx.send(event).await.ok();
                    }
                });
            }

            AuthCommand::Logout { token } => {
                let provider = Arc::clone(&provider);
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let event = match provider.revoke(&token).await {
                        Ok(()) => AuthEvent::Revoked,
                        Err(e) => {
                            tracing::warn!("Token revoke failed: {:#}", e);
                            AuthEvent::RevokeFailed(e.to_string())
                        }
                    };
                    event_tx.send(event).await.ok();
                });
            }

            AuthCommand::Shutdown => break,
        }
    }
}

/// Returns the final event; `TokenGranted` is sent as soon as it happens
async fn login(
    attempt: u64,
    provider: &dyn IdentityProvider,
    event_tx: &mpsc::Sender<AuthEvent>,
) -> Option<AuthEvent> {
    let token = match provider.request_token().await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Sign-in failed: {:#}", e);
            return Some(AuthEvent::LoginFailed {
                attempt,
                error: ReplyError::Auth(format!("Sign-in failed: {}", e)),
            });
        }
    };

    if event_tx
        .send(AuthEvent::TokenGranted { attempt })
        .await
        .is_err()
    {
        tracing::warn!("Auth actor: event receiver dropped");
        return None;
    }

    match provider.fetch_profile(&token).await {
        Ok(user) => {
            tracing::info!("Signed in as {}", user.email);
            tracing::debug!(avatar = %user.avatar_url, "Fetched Google profile");
            Some(AuthEvent::LoggedIn {
                attempt,
                user,
                token,
            })
        }
        Err(e) => {
            tracing::error!("Failed to fetch Google profile: {:#}", e);
            Some(AuthEvent::LoginFailed {
                attempt,
                error: ReplyError::Auth(
                    "Signed in, but failed to load your Google profile.".to_string(),
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubProvider {
        token_ok: bool,
        profile_ok: bool,
        revoke_ok: bool,
    }

    impl StubProvider {
        fn happy() -> Self {
            Self {
                token_ok: true,
                profile_ok: true,
                revoke_ok: true,
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for StubProvider {
        async fn request_token(&self) -> anyhow::Result<AccessToken> {
            if self.token_ok {
                Ok(AccessToken::new("ya29.stub"))
            } else {
                anyhow::bail!("access_denied")
            }
        }

        async fn fetch_profile(&self, _token: &AccessToken) -> anyhow::Result<UserProfile> {
            if self.profile_ok {
                Ok(UserProfile {
                    name: "Sam".to_string(),
                    email: "sam@example.com".to_string(),
                    avatar_url: String::new(),
                })
            } else {
                anyhow::bail!("userinfo 500")
            }
        }

        async fn revoke(&self, _token: &AccessToken) -> anyhow::Result<()> {
            if self.revoke_ok {
                Ok(())
            } else {
                anyhow::bail!("revoke 400")
            }
        }
    }

    #[tokio::test]
    async fn test_login_emits_token_then_user() {
        let mut handle = spawn_auth_actor(Arc::new(StubProvider::happy()));
        handle
            .cmd_tx
            .send(AuthCommand::Login { attempt: 3 })
            .await
            .unwrap();

        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            AuthEvent::TokenGranted { attempt: 3 }
        ));
        match handle.event_rx.recv().await.unwrap() {
            AuthEvent::LoggedIn {
                attempt,
                user,
                token,
            } => {
                assert_eq!(attempt, 3);
                assert_eq!(user.email, "sam@example.com");
                assert_eq!(token.secret(), "ya29.stub");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_consent_failure_is_single_error() {
        let provider = StubProvider {
            token_ok: false,
            ..StubProvider::happy()
        };
        let mut handle = spawn_auth_actor(Arc::new(provider));
        handle
            .cmd_tx
            .send(AuthCommand::Login { attempt: 1 })
            .await
            .unwrap();

        match handle.event_rx.recv().await.unwrap() {
            AuthEvent::LoginFailed {
                error: ReplyError::Auth(msg),
                ..
            } => {
                assert!(msg.contains("access_denied"))
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_profile_failure_after_token() {
        let provider = StubProvider {
            profile_ok: false,
            ..StubProvider::happy()
        };
        let mut handle = spawn_auth_actor(Arc::new(provider));
        handle
            .cmd_tx
            .send(AuthCommand::Login { attempt: 1 })
            .await
            .unwrap();

        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            AuthEvent::TokenGranted { attempt: 1 }
        ));
        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            AuthEvent::LoginFailed {
                attempt: 1,
                error: ReplyError::Auth(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_revoke_failure_is_reported() {
        let provider = StubProvider {
            revoke_ok: false,
            ..StubProvider::happy()
        };
        let mut handle = spawn_auth_actor(Arc::new(provider));
        handle
            .cmd_tx
            .send(AuthCommand::Logout {
                token: AccessToken::new("ya29"),
            })
            .await
            .unwrap();

        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            AuthEvent::RevokeFailed(_)
        ));
        handle.cmd_tx.send(AuthCommand::Shutdown).await.unwrap();
    }

    /// First consent never completes, like a browser tab left open
    struct AbandonedFirstConsent {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for AbandonedFirstConsent {
        async fn request_token(&self) -> anyhow::Result<AccessToken> {
            use std::sync::atomic::Ordering;
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(AccessToken::new("ya29.second"))
        }

        async fn fetch_profile(&self, token: &AccessToken) -> anyhow::Result<UserProfile> {
            StubProvider::happy().fetch_profile(token).await
        }

        async fn revoke(&self, _token: &AccessToken) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stuck_consent_does_not_block_next_attempt() {
        let provider = AbandonedFirstConsent {
            calls: std::sync::atomic::AtomicUsize::new(0),
        };
        let mut handle = spawn_auth_actor(Arc::new(provider));
        for attempt in [1, 2] {
            handle
                .cmd_tx
                .send(AuthCommand::Login { attempt })
                .await
                .unwrap();
        }

        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            AuthEvent::TokenGranted { attempt: 2 }
        ));
        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            AuthEvent::LoggedIn { attempt: 2, .. }
        ));
    }
}
