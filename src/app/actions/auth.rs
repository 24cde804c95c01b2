//! Google sign-in and sign-out

use crate::auth::{AuthCommand, LoginStart};

use super::super::App;

impl App {
    pub(super) async fn login(&mut self) {
        match self.state.auth.begin_login() {
            LoginStart::Started { attempt } => {
                let Some(cmd_tx) = self.auth_actor.as_ref().map(|a| a.cmd_tx.clone()) else {
                    self.state.auth.login_failed();
                    return;
                };
                self.state.set_status("Complete sign-in in your browser...");
                if cmd_tx.send(AuthCommand::Login { attempt }).await.is_err() {
                    tracing::error!("Auth actor is gone; cannot sign in");
                    self.state.auth.login_failed();
                    self.state.set_error("Sign-in is unavailable");
                }
            }
            LoginStart::InFlight => self.state.set_status("Sign-in already in progress..."),
            LoginStart::AlreadySignedIn => {
                let name = self
                    .state
                    .auth
                    .user
                    .as_ref()
                    .map(|u| u.name.clone())
                    .unwrap_or_default();
                self.state.set_status(format!("Already signed in as {}", name));
            }
            LoginStart::SetupRequired(e) => self.state.set_error(e),
        }
    }

    /// Sign out, or abandon a sign-in that has not finished yet
    pub(super) async fn logout(&mut self) {
        let auth = &self.state.auth;
        let status = if auth.is_signed_in() {
            "Signed out"
        } else if auth.login_in_flight {
            "Sign-in cancelled"
        } else {
            self.state.set_status("Not signed in");
            return;
        };

        let token = self.state.auth.logout();
        self.state.set_status(status);

        if let (Some(token), Some(auth)) = (token, &self.auth_actor)
            && auth.cmd_tx.send(AuthCommand::Logout { token }).await.is_err()
        {
            tracing::warn!("Auth actor is gone; token not revoked");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::actions::tests::harness;
    use crate::auth::{AccessToken, AuthCommand, AuthEvent};
    use crate::error::ReplyError;
    use crate::input::Action;
    use crate::types::UserProfile;

    fn sam() -> UserProfile {
        UserProfile {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            avatar_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_login_flow_via_actor_events() {
        let mut h = harness(true);
        h.app.handle_action(Action::Login).await;
        assert!(matches!(
            h.auth_cmds.try_recv().unwrap(),
            AuthCommand::Login { attempt: 1 }
        ));
        assert!(h.app.state.is_busy());

        // A second request while waiting is ignored
        h.app.handle_action(Action::Login).await;
        assert!(h.auth_cmds.try_recv().is_err());

        h.auth_events
            .send(AuthEvent::TokenGranted { attempt: 1 })
            .await
            .unwrap();
        assert!(h.app.process_auth_events());
        assert!(h.app.state.auth.loading);

        h.auth_events
            .send(AuthEvent::LoggedIn {
                attempt: 1,
                user: sam(),
                token: AccessToken::new("tok"),
            })
            .await
            .unwrap();
        h.app.process_auth_events();
        assert!(h.app.state.auth.is_signed_in());
        assert!(!h.app.state.is_busy());
        assert_eq!(h.app.state.status.message, "Signed in as Sam");
    }

    #[tokio::test]
    async fn test_login_failure_stays_signed_out() {
        let mut h = harness(true);
        h.app.handle_action(Action::Login).await;
        h.auth_events
            .send(AuthEvent::LoginFailed {
                attempt: 1,
                error: ReplyError::Auth("Sign-in failed: denied".to_string()),
            })
            .await
            .unwrap();
        h.app.process_auth_events();

        assert!(!h.app.state.auth.is_signed_in());
        assert!(!h.app.state.auth.login_in_flight);
        assert_eq!(
            h.app.state.status.error.as_deref(),
            Some("Sign-in failed: denied")
        );
    }

    #[tokio::test]
    async fn test_login_without_client_id_reports_setup() {
        let mut h = harness(false);
        h.app.handle_action(Action::Login).await;
        assert!(!h.app.state.auth.login_in_flight);
        assert!(
            h.app
                .state
                .status
                .error
                .as_deref()
                .unwrap()
                .starts_with("Authentication setup required")
        );
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let mut h = harness(true);
        h.app.state.auth.logged_in(sam(), AccessToken::new("tok"));

        h.app.handle_action(Action::Logout).await;
        assert!(!h.app.state.auth.is_signed_in());
        match h.auth_cmds.try_recv().unwrap() {
            AuthCommand::Logout { token } => assert_eq!(token.secret(), "tok"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_out_during_profile_fetch_wins() {
        let mut h = harness(true);
        h.app.handle_action(Action::Login).await;
        h.auth_cmds.try_recv().unwrap();
        h.auth_events
            .send(AuthEvent::TokenGranted { attempt: 1 })
            .await
            .unwrap();
        h.app.process_auth_events();

        h.app.handle_action(Action::Logout).await;
        assert_eq!(h.app.state.status.message, "Sign-in cancelled");
        assert!(!h.app.state.is_busy());

        h.auth_events
            .send(AuthEvent::LoggedIn {
                attempt: 1,
                user: sam(),
                token: AccessToken::new("late"),
            })
            .await
            .unwrap();
        h.app.process_auth_events();

        assert!(!h.app.state.auth.is_signed_in());
        // The late grant is handed back for revocation
        match h.auth_cmds.try_recv().unwrap() {
            AuthCommand::Logout { token } => assert_eq!(token.secret(), "late"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
