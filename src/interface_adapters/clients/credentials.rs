use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::entities::BearerCredential;
use crate::domain::errors::SheetsError;
use crate::domain::ports::{Clock, CredentialProvider};
use crate::interface_adapters::clients::config::SheetsConfig;

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const ASSERTION_TTL_SECONDS: u64 = 60 * 60;

// Claims of the signed service-account assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Builds the RS256 assertion exchanged for an access token.
///
/// Keys pasted into a single-line environment variable carry literal `\n`
/// sequences; those are turned back into newlines before parsing.
pub fn sign_assertion(
    issuer: &str,
    audience: &str,
    private_key_pem: &str,
    now: u64,
) -> Result<String, SheetsError> {
    let pem = private_key_pem.replace("\\n", "\n");
    let key = EncodingKey::from_rsa_pem(pem.as_bytes())
        .map_err(|err| SheetsError::Config(format!("GOOGLE_PRIVATE_KEY is not a valid RSA key: {err}")))?;
    let claims = AssertionClaims {
        iss: issuer.to_string(),
        scope: SPREADSHEETS_SCOPE.to_string(),
        aud: audience.to_string(),
        iat: now,
        exp: now + ASSERTION_TTL_SECONDS,
    };

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|err| SheetsError::Config(format!("failed to sign assertion: {err}")))
}

// Service-account credential provider. Every call signs a new assertion and
// performs a new token exchange; nothing is cached between calls.
pub struct ServiceAccountCredentials<C> {
    http: Client,
    config: Arc<SheetsConfig>,
    clock: C,
}

impl<C> ServiceAccountCredentials<C> {
    pub fn new(config: Arc<SheetsConfig>, clock: C, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config, clock })
    }
}

#[async_trait]
impl<C> CredentialProvider for ServiceAccountCredentials<C>
where
    C: Clock,
{
    async fn acquire_write_credential(&self) -> Result<BearerCredential, SheetsError> {
        // Config is checked before anything touches the network.
        let required = self.config.require()?;
        let now = self.clock.now_epoch_seconds();
        let assertion = sign_assertion(
            required.service_account_email,
            &self.config.token_url,
            required.private_key,
            now,
        )?;

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|err| SheetsError::Transport(err.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "token exchange rejected");
            return Err(SheetsError::UpstreamAuth {
                status: status.as_u16(),
                body,
            });
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|err| SheetsError::UpstreamAuth {
                status: status.as_u16(),
                body: format!("unreadable token response: {err}"),
            })?;

        tracing::debug!("access token obtained");
        Ok(BearerCredential {
            access_token: token.access_token,
            expires_at: now + ASSERTION_TTL_SECONDS,
        })
    }
}
