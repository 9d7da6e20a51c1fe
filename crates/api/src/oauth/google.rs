//! Google OAuth 2.0 client: consent URL, code exchange, profile fetch.

use std::time::Duration;

use dosewise_core::error::CoreError;
use serde::Deserialize;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

const SCOPES: &str = "openid email profile";

/// Upstream request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google OAuth application credentials.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Callback URL registered with Google.
    pub redirect_uri: String,
}

impl GoogleConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `GOOGLE_CLIENT_ID` or `GOOGLE_CLIENT_SECRET` is
    /// not set, signalling that the OAuth bridge is disabled.
    ///
    /// | Variable               | Required | Default                                        |
    /// |------------------------|----------|------------------------------------------------|
    /// | `GOOGLE_CLIENT_ID`     | yes      | --                                             |
    /// | `GOOGLE_CLIENT_SECRET` | yes      | --                                             |
    /// | `GOOGLE_REDIRECT_URI`  | no       | `http://localhost:8000/api/v1/auth/google/callback` |
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok()?;
        Some(Self {
            client_id,
            client_secret,
            redirect_uri: std::env::var("GOOGLE_REDIRECT_URI").unwrap_or_else(|_| {
                "http://localhost:8000/api/v1/auth/google/callback".to_string()
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Profile fields returned by Google's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default = "default_true")]
    pub verified_email: bool,
}

fn default_true() -> bool {
    true
}

impl GoogleProfile {
    /// Display name, falling back to the given name, then the email
    /// local part.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.given_name.clone())
            .unwrap_or_else(|| {
                self.email
                    .split('@')
                    .next()
                    .unwrap_or("user")
                    .to_string()
            })
    }
}

/// HTTP client for Google's OAuth endpoints.
pub struct GoogleClient {
    config: GoogleConfig,
    client: reqwest::Client,
}

impl GoogleClient {
    pub fn new(config: GoogleConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Build the consent screen URL for the given state nonce.
    pub fn consent_url(&self, state: &str) -> String {
        format!(
            "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=offline&prompt=consent",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token, then fetch the
    /// user's profile.
    pub async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, CoreError> {
        let token: TokenResponse = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| exchange_error("token exchange", e))?
            .error_for_status()
            .map_err(|e| exchange_error("token exchange", e))?
            .json()
            .await
            .map_err(|e| exchange_error("token exchange", e))?;

        let profile: GoogleProfile = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| exchange_error("profile fetch", e))?
            .error_for_status()
            .map_err(|e| exchange_error("profile fetch", e))?
            .json()
            .await
            .map_err(|e| exchange_error("profile fetch", e))?;

        Ok(profile)
    }
}

fn exchange_error(stage: &str, e: reqwest::Error) -> CoreError {
    tracing::error!(stage, error = %e, "Google OAuth request failed");
    CoreError::Internal(format!("Google {stage} failed"))
}
