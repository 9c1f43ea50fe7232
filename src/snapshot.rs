//! Static telemetry fixtures displayed by the dashboard.
//!
//! These values are a fixed snapshot, not live data; they are constant for
//! the lifetime of a session and exist only to be rendered into prompts.

use serde::{Deserialize, Serialize};

/// Severity of an open issue or a predictive alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Warning,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Warning => "Warning",
            Severity::Low => "low",
        }
    }
}

/// An issue currently open against the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveIssue {
    pub source: String,
    pub problem: String,
    pub severity: Severity,
    pub detected: String,
}

/// Point-in-time network metrics rendered into the chat context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub health_score: u32,
    pub active_devices: u32,
    pub latency_ms: u32,
    pub latency_rating: String,
    pub packet_loss_pct: f64,
    pub packet_loss_rating: String,
    pub uptime_pct: f64,
    pub uptime_rating: String,
    pub throughput_mbps: u32,
    pub throughput_rating: String,
    pub issues: Vec<ActiveIssue>,
}

impl NetworkSnapshot {
    /// The fixture shown on the health page.
    pub fn demo() -> Self {
        Self {
            health_score: 97,
            active_devices: 1245,
            latency_ms: 45,
            latency_rating: "good".into(),
            packet_loss_pct: 0.2,
            packet_loss_rating: "excellent".into(),
            uptime_pct: 99.8,
            uptime_rating: "excellent".into(),
            throughput_mbps: 850,
            throughput_rating: "good".into(),
            issues: vec![
                ActiveIssue {
                    source: "Sensor Network 3".into(),
                    problem: "High Latency".into(),
                    severity: Severity::Critical,
                    detected: "15m ago".into(),
                },
                ActiveIssue {
                    source: "Device ID: 847".into(),
                    problem: "Battery Low".into(),
                    severity: Severity::Warning,
                    detected: "1h ago".into(),
                },
                ActiveIssue {
                    source: "Hub East-2".into(),
                    problem: "Connection Unstable".into(),
                    severity: Severity::Warning,
                    detected: "2h ago".into(),
                },
            ],
        }
    }
}

/// One day of failure/recovery counts on the trends page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub day: String,
    pub failures: u32,
    pub recoveries: u32,
    pub uptime: f64,
}

/// A model-predicted alert with its confidence level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveAlert {
    pub alert: String,
    pub confidence: u32,
    pub severity: Severity,
}

/// Trend history plus predictive alerts; the input to insight generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub points: Vec<TrendPoint>,
    pub alerts: Vec<PredictiveAlert>,
}

impl TrendReport {
    /// The fixture shown on the trends page.
    pub fn demo() -> Self {
        let points = [
            ("Mon", 2, 5, 99.2),
            ("Tue", 1, 3, 99.5),
            ("Wed", 3, 6, 98.8),
            ("Thu", 0, 2, 99.8),
            ("Fri", 2, 4, 99.3),
            ("Sat", 1, 3, 99.6),
            ("Sun", 1, 2, 99.7),
        ]
        .into_iter()
        .map(|(day, failures, recoveries, uptime)| TrendPoint {
            day: day.into(),
            failures,
            recoveries,
            uptime,
        })
        .collect();

        let alerts = vec![
            PredictiveAlert {
                alert: "Device 234 failure predicted in 24h".into(),
                confidence: 87,
                severity: Severity::High,
            },
            PredictiveAlert {
                alert: "Network bottleneck emerging".into(),
                confidence: 72,
                severity: Severity::Medium,
            },
            PredictiveAlert {
                alert: "Potential power surge detected".into(),
                confidence: 65,
                severity: Severity::Medium,
            },
            PredictiveAlert {
                alert: "Temperature anomaly detected in Zone 4".into(),
                confidence: 58,
                severity: Severity::Low,
            },
        ];

        Self { points, alerts }
    }

    pub fn total_failures(&self) -> u32 {
        self.points.iter().map(|p| p.failures).sum()
    }

    pub fn total_recoveries(&self) -> u32 {
        self.points.iter().map(|p| p.recoveries).sum()
    }

    pub fn average_uptime(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.uptime).sum::<f64>() / self.points.len() as f64
    }

    /// Day with the lowest uptime.
    pub fn worst_day(&self) -> Option<&TrendPoint> {
        self.points
            .iter()
            .min_by(|a, b| a.uptime.total_cmp(&b.uptime))
    }

    /// Day with the highest failure count.
    pub fn most_failures(&self) -> Option<&TrendPoint> {
        self.points.iter().max_by_key(|p| p.failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_trend_aggregates() {
        let report = TrendReport::demo();
        assert_eq!(report.total_failures(), 10);
        assert_eq!(report.total_recoveries(), 25);
        assert_eq!(report.worst_day().unwrap().day, "Wed");
        assert_eq!(report.most_failures().unwrap().day, "Wed");
        assert!((report.average_uptime() - 99.414).abs() < 0.001);
    }
}
