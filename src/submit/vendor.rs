//! Google Indexing API submission using service-account credentials
//!
//! # Request Flow
//!
//! 1. Parse the service-account JSON (`client_email`, `private_key`, ...)
//! 2. Sign an RS256 JWT assertion for the indexing scope
//! 3. Exchange the assertion for an access token at `token_uri`
//! 4. Publish a `URL_UPDATED` notification with the bearer token
//!
//! Every failure is turned into a failed outcome naming the step that broke.

use crate::submit::client::SubmissionSettings;
use crate::submit::outcome::{SubmissionMethod, SubmissionOutcome};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Opaque vendor credentials as supplied by the caller or a config file
#[derive(Clone, PartialEq)]
pub struct VendorCredentials(serde_json::Value);

impl VendorCredentials {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

// Credentials carry a private key; keep it out of logs.
impl std::fmt::Debug for VendorCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let email = self.0.get("client_email").and_then(|v| v.as_str());
        f.debug_struct("VendorCredentials")
            .field("client_email", &email)
            .finish_non_exhaustive()
    }
}

/// The fields of a service-account key the indexing flow needs
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct UrlNotification<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

/// Failure modes of the vendor flow, rendered into the outcome's error text
#[derive(Debug, Error)]
enum VendorError {
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token request failed: {0}")]
    Token(String),

    #[error("Publish request failed: {0}")]
    Publish(String),

    #[error("Request timeout ({0}s)")]
    Timeout(u64),

    #[error("{0}")]
    Network(String),
}

/// Publishes a `URL_UPDATED` notification for the URL
pub async fn submit_vendor_api(
    client: &Client,
    url: &str,
    credentials: &VendorCredentials,
    settings: &SubmissionSettings,
) -> SubmissionOutcome {
    match publish(client, url, credentials, settings).await {
        Ok(()) => SubmissionOutcome::success(
            url,
            SubmissionMethod::VendorApi,
            "Submitted to Google successfully",
        ),
        Err(e) => SubmissionOutcome::failure(url, SubmissionMethod::VendorApi, e.to_string()),
    }
}

async fn publish(
    client: &Client,
    url: &str,
    credentials: &VendorCredentials,
    settings: &SubmissionSettings,
) -> Result<(), VendorError> {
    let key: ServiceAccountKey = serde_json::from_value(credentials.as_value().clone())
        .map_err(|e| VendorError::Credentials(e.to_string()))?;

    let token = fetch_access_token(client, &key, settings).await?;

    let response = client
        .post(&settings.vendor_publish_endpoint)
        .bearer_auth(token)
        .json(&UrlNotification {
            url,
            kind: "URL_UPDATED",
        })
        .timeout(settings.vendor_timeout)
        .send()
        .await
        .map_err(|e| transport_error(e, settings))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(VendorError::Publish(describe_error_body(status, &body)));
    }

    Ok(())
}

async fn fetch_access_token(
    client: &Client,
    key: &ServiceAccountKey,
    settings: &SubmissionSettings,
) -> Result<String, VendorError> {
    let token_uri = key.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
    let assertion = sign_assertion(key, token_uri, &settings.vendor_scope)?;

    let response = client
        .post(token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .timeout(settings.vendor_timeout)
        .send()
        .await
        .map_err(|e| transport_error(e, settings))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(VendorError::Token(describe_error_body(status, &body)));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| VendorError::Token(format!("malformed token response: {}", e)))?;

    Ok(token.access_token)
}

fn sign_assertion(
    key: &ServiceAccountKey,
    token_uri: &str,
    scope: &str,
) -> Result<String, VendorError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let iat = chrono::Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope,
        aud: token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    Ok(encode(&header, &claims, &encoding_key)?)
}

fn transport_error(error: reqwest::Error, settings: &SubmissionSettings) -> VendorError {
    if error.is_timeout() {
        VendorError::Timeout(settings.vendor_timeout.as_secs())
    } else {
        VendorError::Network(error.to_string())
    }
}

/// Renders an error response, preferring the API's own `error.message`
fn describe_error_body(status: reqwest::StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            error
                .get("message")
                .or_else(|| v.get("error_description"))
                .or(Some(error))
                .and_then(|m| m.as_str().map(str::to_string))
        });

    match message {
        Some(message) => format!("HTTP {}: {}", status.as_u16(), message),
        None => format!("HTTP {}", status.as_u16()),
    }
}
