//! IndexNow GET submission against each configured engine
//!
//! Engines are contacted one after another. A failing engine never stops the
//! attempt against the next one; the method succeeds if any engine accepted.

use crate::submit::client::{is_accepted_status, Engine, SubmissionSettings};
use crate::submit::outcome::{SubmissionMethod, SubmissionOutcome};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

/// What one engine answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineResponse {
    /// The engine returned an HTTP status
    Status(u16),
    /// Timeout, connection failure, or another transport error
    Unreachable(String),
}

/// Typed per-engine result gathered before the aggregate outcome is derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResult {
    pub engine: String,
    pub response: EngineResponse,
}

impl EngineResult {
    pub fn accepted(&self) -> bool {
        match self.response {
            EngineResponse::Status(code) => reqwest::StatusCode::from_u16(code)
                .map(is_accepted_status)
                .unwrap_or(false),
            EngineResponse::Unreachable(_) => false,
        }
    }

    /// Status code, or `timeout/error` when no response arrived
    pub fn detail(&self) -> String {
        match &self.response {
            EngineResponse::Status(code) => code.to_string(),
            EngineResponse::Unreachable(_) => "timeout/error".to_string(),
        }
    }
}

/// Submits a URL to every configured engine via GET
pub async fn submit_protocol_get(
    client: &Client,
    url: &str,
    key: &str,
    settings: &SubmissionSettings,
) -> SubmissionOutcome {
    let mut results = Vec::with_capacity(settings.engines.len());
    for engine in &settings.engines {
        results.push(query_engine(client, engine, url, key, settings.get_timeout).await);
    }

    summarize_engine_results(url, &results)
}

async fn query_engine(
    client: &Client,
    engine: &Engine,
    url: &str,
    key: &str,
    timeout: Duration,
) -> EngineResult {
    let response = client
        .get(&engine.endpoint)
        .query(&[("url", url), ("key", key)])
        .header(ACCEPT, "application/json")
        .timeout(timeout)
        .send()
        .await;

    let response = match response {
        Ok(resp) => {
            let status = resp.status();
            tracing::debug!("{} responded {} for {}", engine.name, status, url);
            EngineResponse::Status(status.as_u16())
        }
        Err(e) => {
            tracing::debug!("{} request failed for {}: {}", engine.name, url, e);
            EngineResponse::Unreachable(e.to_string())
        }
    };

    EngineResult {
        engine: engine.name.clone(),
        response,
    }
}

/// Derives the method outcome from the per-engine results
pub fn summarize_engine_results(url: &str, results: &[EngineResult]) -> SubmissionOutcome {
    let (accepted, rejected): (Vec<&EngineResult>, Vec<&EngineResult>) =
        results.iter().partition(|r| r.accepted());

    if !accepted.is_empty() {
        let mut message = format!("Submitted to {}", join_names(&accepted));
        if !rejected.is_empty() {
            message.push_str(&format!(" (Failed: {})", join_names(&rejected)));
        }
        return SubmissionOutcome::success(url, SubmissionMethod::ProtocolGet, message);
    }

    let details = results
        .iter()
        .map(|r| format!("{}: {}", r.engine, r.detail()))
        .collect::<Vec<_>>()
        .join(", ");

    SubmissionOutcome::failure(
        url,
        SubmissionMethod::ProtocolGet,
        format!(
            "Failed to submit to all search engines. Details: {}",
            details
        ),
    )
}

fn join_names(results: &[&EngineResult]) -> String {
    results
        .iter()
        .map(|r| r.engine.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
