//! Conversational assistant core for an IoT network monitoring dashboard.
//!
//! The crate provides the one non-trivial runtime flow behind the dashboard's
//! "AI assistant" and "AI insights" features:
//! - An append-only [`Transcript`] of user/assistant turns.
//! - A prompt composer that prepends a fixed network-context preamble.
//! - A [`CompletionClient`] abstraction with OpenAI-compatible and
//!   Anthropic-shaped adapters, selected by configuration.
//! - A pending-gated [`ChatSession`] (one request in flight per view, fixed
//!   fallback reply on failure) and the [`InsightPanel`] variant that parses
//!   structured reports.

mod auth;
mod config;
mod error;
mod insight;
mod llm;
mod message;
mod prompt;
mod session;
mod snapshot;
mod telemetry;
mod transcript;

pub use auth::{AuthSession, RouteAccess, SessionState, UserSession};
pub use config::AssistantConfig;
pub use error::{NetsightError, Result};
pub use insight::{parse_report, Insight, InsightPanel, InsightReport, Priority};
pub use llm::{
    build_client, parse_anthropic_reply, parse_openai_reply, AnthropicClient, CompletionClient,
    OpenAiCompatClient, ScriptedClient,
};
pub use message::{Message, Role};
pub use prompt::{compose_chat, compose_insights, render_context};
pub use session::{ChatSession, PendingGate, PendingGuard, SubmitOutcome, FALLBACK_REPLY};
pub use snapshot::{
    ActiveIssue, NetworkSnapshot, PredictiveAlert, Severity, TrendPoint, TrendReport,
};
pub use telemetry::init_logging;
pub use transcript::Transcript;
