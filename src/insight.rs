//! The "AI insights" variant of the request flow: a single Anthropic-shaped
//! request over trend data, parsed into a structured report.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{NetsightError, Result};
use crate::llm::CompletionClient;
use crate::prompt::compose_insights;
use crate::session::PendingGate;
use crate::snapshot::TrendReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub action: String,
}

/// The structured analysis the model is instructed to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub overall_health: String,
    pub risk_score: u32,
}

impl InsightReport {
    /// The report shown when generation fails for any reason.
    pub fn unavailable() -> Self {
        Self {
            insights: vec![Insight {
                title: "Analysis Unavailable".into(),
                description: "Unable to generate AI insights at this time. Please try again."
                    .into(),
                priority: Priority::Low,
                action: "Retry analysis".into(),
            }],
            overall_health: "Unknown".into(),
            risk_score: 0,
        }
    }
}

/// Parses a reply into a report, tolerating a ```json fence around the body.
pub fn parse_report(text: &str) -> Result<InsightReport> {
    let clean = text.replace("```json", "").replace("```", "");
    let report = serde_json::from_str(clean.trim())
        .map_err(|err| NetsightError::MalformedReply(format!("insight report: {err}")))?;
    Ok(report)
}

/// Pending-gated insight generation over a fixed trend report.
pub struct InsightPanel {
    report_data: TrendReport,
    gate: PendingGate,
    client: Arc<dyn CompletionClient>,
    latest: Mutex<Option<InsightReport>>,
}

impl InsightPanel {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            report_data: TrendReport::demo(),
            gate: PendingGate::new(),
            client,
            latest: Mutex::new(None),
        }
    }

    pub fn with_trends(mut self, report_data: TrendReport) -> Self {
        self.report_data = report_data;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    /// The most recently generated report, if any.
    pub fn latest(&self) -> Option<InsightReport> {
        self.latest.lock().expect("insight state poisoned").clone()
    }

    /// Issues one generation request. Returns `None` if a request is already
    /// pending; otherwise always yields a report — any transport or parse
    /// failure is logged and replaced by [`InsightReport::unavailable`].
    pub async fn generate(&self) -> Option<InsightReport> {
        let _guard = self.gate.acquire()?;

        let payload = compose_insights(&self.report_data);
        let report = match self.client.complete(&payload).await {
            Ok(text) => match parse_report(&text) {
                Ok(report) => report,
                Err(err) => {
                    tracing::error!(error = %err, "insight reply did not parse");
                    InsightReport::unavailable()
                }
            },
            Err(err) => {
                tracing::error!(error = %err, "insight request failed");
                InsightReport::unavailable()
            }
        };

        *self.latest.lock().expect("insight state poisoned") = Some(report.clone());
        Some(report)
    }
}
