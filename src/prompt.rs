//! Builds the exact payloads sent to the completion endpoint.

use std::fmt::Write;

use crate::message::Message;
use crate::snapshot::{NetworkSnapshot, TrendReport};
use crate::transcript::Transcript;

/// Renders the fixed network-status block embedded in the chat preamble.
pub fn render_context(snapshot: &NetworkSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Current Network Status:");
    let _ = writeln!(out, "- Health Score: {}%", snapshot.health_score);
    let _ = writeln!(out, "- Active Devices: {}", snapshot.active_devices);
    let _ = writeln!(
        out,
        "- Latency: {}ms ({})",
        snapshot.latency_ms, snapshot.latency_rating
    );
    let _ = writeln!(
        out,
        "- Packet Loss: {}% ({})",
        snapshot.packet_loss_pct, snapshot.packet_loss_rating
    );
    let _ = writeln!(
        out,
        "- Uptime: {}% ({})",
        snapshot.uptime_pct, snapshot.uptime_rating
    );
    let _ = writeln!(
        out,
        "- Throughput: {} Mbps ({})",
        snapshot.throughput_mbps, snapshot.throughput_rating
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Active Issues:");
    for (idx, issue) in snapshot.issues.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} - {} ({}, detected {})",
            idx + 1,
            issue.source,
            issue.problem,
            issue.severity.as_str(),
            issue.detected
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Composes the outbound chat payload: one synthetic system entry rendering
/// the snapshot, followed by the transcript verbatim. A transcript of K
/// messages yields exactly K+1 entries.
pub fn compose_chat(snapshot: &NetworkSnapshot, transcript: &Transcript) -> Vec<Message> {
    let preamble = format!(
        "You are a helpful AI assistant integrated into a Network Health \
         Monitoring dashboard. You help users understand their IoT network \
         performance, diagnose issues, and provide recommendations. Here's \
         the current network data:\n\n{}\n\nProvide concise, helpful answers \
         about the network status, metrics, and issues.",
        render_context(snapshot)
    );

    let mut payload = Vec::with_capacity(transcript.len() + 1);
    payload.push(Message::system(preamble));
    payload.extend(transcript.iter().cloned());
    payload
}

/// Composes the single-user-message insights prompt from trend data.
pub fn compose_insights(report: &TrendReport) -> Vec<Message> {
    let mut prompt = String::from(
        "You are a network operations AI analyst. Analyze this network \
         performance data and provide 3-4 actionable insights and \
         recommendations.\n\nData Summary:\n",
    );
    let _ = writeln!(prompt, "- Total Failures: {}", report.total_failures());
    let _ = writeln!(prompt, "- Total Recoveries: {}", report.total_recoveries());
    let _ = writeln!(prompt, "- Average Uptime: {:.2}%", report.average_uptime());
    if let Some(worst) = report.worst_day() {
        let _ = writeln!(
            prompt,
            "- Worst Performing Day: {} ({}% uptime)",
            worst.day, worst.uptime
        );
    }
    if let Some(most) = report.most_failures() {
        let _ = writeln!(
            prompt,
            "- Day with Most Failures: {} ({} failures)",
            most.day, most.failures
        );
    }

    prompt.push_str("\nDaily Breakdown:\n");
    for point in &report.points {
        let _ = writeln!(
            prompt,
            "{}: {} failures, {} recoveries, {}% uptime",
            point.day, point.failures, point.recoveries, point.uptime
        );
    }

    prompt.push_str("\nCurrent Predictive Alerts:\n");
    for alert in &report.alerts {
        let _ = writeln!(
            prompt,
            "- {} ({}% confidence, {} severity)",
            alert.alert,
            alert.confidence,
            alert.severity.as_str()
        );
    }

    prompt.push_str(
        "\nProvide insights in this JSON format only, no other text:\n\
         {\n  \"insights\": [\n    {\n      \"title\": \"Brief insight title\",\n      \
         \"description\": \"Detailed explanation with specific numbers\",\n      \
         \"priority\": \"high|medium|low\",\n      \
         \"action\": \"Specific recommended action\"\n    }\n  ],\n  \
         \"overallHealth\": \"Excellent|Good|Fair|Poor\",\n  \"riskScore\": 1-100\n}",
    );

    vec![Message::user(prompt)]
}
