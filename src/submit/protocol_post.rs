//! IndexNow POST submission to the centralized endpoint
//!
//! Unlike the GET method this one requires the key file to be hosted on the
//! submitted site, at `https://<host>/<key>.txt` unless overridden.

use crate::submit::client::{is_accepted_status, SubmissionSettings};
use crate::submit::outcome::{SubmissionMethod, SubmissionOutcome};
use crate::url::extract_host;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;

/// JSON document accepted by the IndexNow POST endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexNowPayload {
    pub host: String,
    pub key: String,
    pub key_location: String,
    pub url_list: Vec<String>,
}

impl IndexNowPayload {
    /// Builds the payload for a single URL
    ///
    /// Returns `None` when the URL has no host to derive the key location from.
    pub fn for_url(url: &str, key: &str, key_location: Option<&str>) -> Option<Self> {
        let host = extract_host(url)?;
        let key_location = key_location
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://{}/{}.txt", host, key));

        Some(Self {
            host,
            key: key.to_string(),
            key_location,
            url_list: vec![url.to_string()],
        })
    }
}

/// Submits a URL to the centralized IndexNow endpoint via POST
pub async fn submit_protocol_post(
    client: &Client,
    url: &str,
    key: &str,
    settings: &SubmissionSettings,
) -> SubmissionOutcome {
    let payload = match IndexNowPayload::for_url(url, key, settings.key_location.as_deref()) {
        Some(payload) => payload,
        None => {
            return SubmissionOutcome::failure(
                url,
                SubmissionMethod::ProtocolPost,
                format!("Invalid URL: cannot determine host of {}", url),
            )
        }
    };

    let response = client
        .post(&settings.post_endpoint)
        .header(CONTENT_TYPE, "application/json; charset=utf-8")
        .json(&payload)
        .timeout(settings.post_timeout)
        .send()
        .await;

    match response {
        Ok(resp) => outcome_for_status(url, resp.status()),
        Err(e) if e.is_timeout() => SubmissionOutcome::failure(
            url,
            SubmissionMethod::ProtocolPost,
            format!("Request timeout ({}s)", settings.post_timeout.as_secs()),
        ),
        Err(e) => SubmissionOutcome::failure(url, SubmissionMethod::ProtocolPost, e.to_string()),
    }
}

/// Maps the endpoint's HTTP status to an outcome
pub fn outcome_for_status(url: &str, status: StatusCode) -> SubmissionOutcome {
    if is_accepted_status(status) {
        SubmissionOutcome::success(url, SubmissionMethod::ProtocolPost, "Submitted via IndexNow API")
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        SubmissionOutcome::failure(
            url,
            SubmissionMethod::ProtocolPost,
            "Rate limit exceeded. Try again later.",
        )
    } else {
        SubmissionOutcome::failure(
            url,
            SubmissionMethod::ProtocolPost,
            format!("HTTP {}", status.as_u16()),
        )
    }
}
