//! URL submission pipeline
//!
//! - [`client`] - shared HTTP client and endpoint settings
//! - [`vendor`], [`protocol_get`], [`protocol_post`], [`deprecated`] - the
//!   individual submission methods
//! - [`orchestrator`] - per-URL method ordering and aggregation
//! - [`runner`] - serial batches, pacing and the session guard

mod client;
mod deprecated;
mod guard;
mod orchestrator;
mod outcome;
mod protocol_get;
mod protocol_post;
mod runner;
mod vendor;

pub use client::{
    build_http_client, is_accepted_status, user_agent_string, Engine, SubmissionSettings,
};
pub use deprecated::{ping_bing, ping_google};
pub use guard::{SessionGuard, SessionPermit};
pub use orchestrator::{Orchestrator, SubmissionPlan, UrlSubmitter};
pub use outcome::{
    now_iso, BatchSummary, OutcomeStatus, SubmissionMethod, SubmissionOutcome, UrlResult,
};
pub use protocol_get::{
    submit_protocol_get, summarize_engine_results, EngineResponse, EngineResult,
};
pub use protocol_post::{outcome_for_status, submit_protocol_post, IndexNowPayload};
pub use runner::{BatchReport, BatchRequest, BatchRunner, BatchStatus, DEFAULT_PACING_DELAY};
pub use vendor::{submit_vendor_api, VendorCredentials};
