//! Google sign-in
//!
//! The identity provider sits behind the `IdentityProvider` trait; the app
//! only sees [`AuthState`] and the auth actor's events.

mod actor;
mod google;
mod provider;
mod state;

pub use actor::{AuthActorHandle, AuthCommand, AuthEvent, spawn_auth_actor};
pub use google::GoogleIdentity;
pub use provider::AccessToken;
pub use state::{AuthState, LoginStart};
