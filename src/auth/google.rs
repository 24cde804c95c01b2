//! Google sign-in using the OAuth2 installed app flow
//!
//! Opens the system browser for consent and receives the authorization code on
//! a loopback listener, then exchanges it (with PKCE) for an access token.
//! The token is only used to read the basic profile.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::time::{Duration, Instant};

use super::provider::{AccessToken, IdentityProvider};
use crate::constants::{
    OAUTH_CALLBACK_READ_TIMEOUT_SECS, OAUTH_CALLBACK_TIMEOUT_SECS, OAUTH_HTTP_TIMEOUT_SECS,
};
use crate::types::UserProfile;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const PROFILE_SCOPES: &str =
    "https://www.googleapis.com/auth/userinfo.profile https://www.googleapis.com/auth/userinfo.email";

/// Endpoints used by the flow; overridable for tests
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub revoke_url: String,
    pub userinfo_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            revoke_url: GOOGLE_REVOKE_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error response from Google
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Body of the userinfo endpoint; absent fields become empty strings
#[derive(Debug, Default, Deserialize)]
struct UserInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    picture: String,
}

impl From<UserInfo> for UserProfile {
    fn from(info: UserInfo) -> Self {
        Self {
            name: info.name,
            email: info.email,
            avatar_url: info.picture,
        }
    }
}

/// PKCE code verifier and challenge
struct PkceChallenge {
    verifier: String,
    challenge: String,
}

impl PkceChallenge {
    fn new() -> Result<Self> {
        let verifier = random_urlsafe::<32>()?;
        let challenge = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(Sha256::digest(verifier.as_bytes()));
        Ok(Self {
            verifier,
            challenge,
        })
    }
}

fn random_urlsafe<const N: usize>() -> Result<String> {
    let mut bytes = [0u8; N];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("Failed to generate random bytes: {}", e))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// State for an in-progress consent flow
struct ConsentFlow {
    auth_url: String,
    redirect_uri: String,
    pkce_verifier: String,
    state: String,
    listener: TcpListener,
}

/// Google identity provider
pub struct GoogleIdentity {
    client_id: String,
    client_secret: Option<String>,
    endpoints: GoogleEndpoints,
    http_client: reqwest::Client,
}

impl GoogleIdentity {
    pub fn new(client_id: &str, client_secret: Option<&str>) -> Result<Self> {
        Self::with_endpoints(client_id, client_secret, GoogleEndpoints::default())
    }

    pub fn with_endpoints(
        client_id: &str,
        client_secret: Option<&str>,
        endpoints: GoogleEndpoints,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(OAUTH_HTTP_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.map(str::to_string),
            endpoints,
            http_client,
        })
    }

    /// Bind the loopback listener and build the consent URL
    fn start_consent(&self) -> Result<ConsentFlow> {
        let listener = TcpListener::bind("127.0.0.1:0").context("Failed to bind to local port")?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://127.0.0.1:{}", port);

        let pkce = PkceChallenge::new()?;
        let state = random_urlsafe::<16>()?;

        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&code_challenge={}&code_challenge_method=S256&state={}",
            self.endpoints.auth_url,
            urlencode(&self.client_id),
            urlencode(&redirect_uri),
            urlencode(PROFILE_SCOPES),
            urlencode(&pkce.challenge),
            urlencode(&state),
        );

        tracing::debug!("OAuth2 redirect URI: {}", redirect_uri);

        Ok(ConsentFlow {
            auth_url,
            redirect_uri,
            pkce_verifier: pkce.verifier,
            state,
            listener,
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        pkce_verifier: &str,
    ) -> Result<AccessToken> {
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
            ("code_verifier", pkce_verifier),
        ];
        if let Some(ref secret) = self.client_secret {
            params.push(("client_secret", secret.as_str()));
        }

        let response = self
            .http_client
            .post(&self.endpoints.token_url)
            .form(&params)
            .send()
            .await
            .context("Failed to exchange authorization code")?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await.unwrap_or(ErrorResponse {
                error: "unknown_error".to_string(),
                error_description: None,
            });
            bail!(
                "Token exchange failed: {} {}",
                error.error,
                error.error_description.unwrap_or_default()
            );
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;
        Ok(AccessToken::new(tokens.access_token))
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentity {
    async fn request_token(&self) -> Result<AccessToken> {
        let flow = self.start_consent()?;

        tracing::info!("Opening browser for Google sign-in: {}", flow.auth_url);
        if let Err(e) = open::that(&flow.auth_url) {
            tracing::warn!(
                "Failed to open browser: {}. Open this URL manually: {}",
                e,
                flow.auth_url
            );
        }

        let redirect_uri = flow.redirect_uri.clone();
        let pkce_verifier = flow.pkce_verifier.clone();

        // The loopback listener is blocking
        let code = tokio::task::spawn_blocking(move || wait_for_callback(&flow))
            .await
            .context("OAuth callback task failed")??;

        tracing::info!("Received authorization code");
        self.exchange_code(&code, &redirect_uri, &pkce_verifier)
            .await
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<UserProfile> {
        let response = self
            .http_client
            .get(&self.endpoints.userinfo_url)
            .bearer_auth(token.secret())
            .send()
            .await
            .context("Failed to fetch user profile")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Userinfo request failed ({})", status);
        }

        let info: UserInfo = response
            .json()
            .await
            .context("Failed to parse user profile")?;
        Ok(info.into())
    }

    async fn revoke(&self, token: &AccessToken) -> Result<()> {
        let response = self
            .http_client
            .post(&self.endpoints.revoke_url)
            .form(&[("token", token.secret())])
            .send()
            .await
            .context("Failed to revoke token")?;

        if !response.status().is_success() {
            bail!("Token revoke failed ({})", response.status());
        }
        Ok(())
    }
}

/// Wait for the browser redirect and extract the authorization code
fn wait_for_callback(flow: &ConsentFlow) -> Result<String> {
    accept_callback(
        &flow.listener,
        &flow.state,
        Duration::from_secs(OAUTH_CALLBACK_TIMEOUT_SECS),
        Duration::from_secs(OAUTH_CALLBACK_READ_TIMEOUT_SECS),
    )
}

/// Accept loopback connections until one carries the redirect.
///
/// Browsers open speculative connections and ask for favicons; a connection
/// that stays silent for `read_timeout` or has no `code`/`error` parameter is
/// dropped and the next one accepted.
fn accept_callback(
    listener: &TcpListener,
    expected_state: &str,
    timeout: Duration,
    read_timeout: Duration,
) -> Result<String> {
    use std::io::ErrorKind;

    listener.set_nonblocking(true)?;
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            bail!("Sign-in timed out. Please try again.");
        }

        let mut stream = match listener.accept() {
            Ok((stream, _)) => stream,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                std::thread::sleep(remaining.min(Duration::from_millis(100)));
                continue;
            }
            Err(e) => {
                return Err(e).context("Failed to accept OAuth callback connection");
            }
        };
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(remaining.min(read_timeout)))?;

        let mut request_line = String::new();
        if let Err(e) = BufReader::new(&stream).read_line(&mut request_line) {
            tracing::debug!("Dropping silent callback connection: {}", e);
            continue;
        }

        let query = request_line
            .split_whitespace()
            .nth(1)
            .and_then(|path| path.split_once('?'))
            .map(|(_, query)| query)
            .unwrap_or("");
        if query_param(query, "code").is_none() && query_param(query, "error").is_none() {
            tracing::debug!("Ignoring callback request: {:?}", request_line.trim_end());
            stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
                .ok();
            continue;
        }

        return match parse_callback(query, expected_state) {
            Ok(code) => {
                let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n\
                    <html><body><h1>Signed in</h1>\
                    <p>You can close this window and return to tubereply.</p>\
                    <script>window.close();</script></body></html>";
                stream.write_all(response.as_bytes())?;
                Ok(code)
            }
            Err(e) => {
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n\
                    <html><body><h1>Sign-in failed</h1><p>{}</p>\
                    <p>Please close this window and try again.</p></body></html>",
                    escape_html(&e.to_string())
                );
                stream.write_all(response.as_bytes()).ok();
                Err(e)
            }
        };
    }
}

/// Validate the callback query and return the authorization code
fn parse_callback(query: &str, expected_state: &str) -> Result<String> {
    if let Some(error) = query_param(query, "error") {
        let description = query_param(query, "error_description").unwrap_or_default();
        bail!("Authorization failed: {} {}", error, description);
    }

    let state = query_param(query, "state")
        .context("No state parameter in callback - possible CSRF attack")?;
    if state != expected_state {
        bail!("State parameter mismatch - possible CSRF attack");
    }

    query_param(query, "code").context("No authorization code in callback")
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| urldecode(value))
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn urlencode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char)
            }
            _ => result.push_str(&format!("%{:02X}", b)),
        }
    }
    result
}

fn urldecode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
