//! Report formatting.

use contend::{OutcomeSummary, ProbeRun};
use serde::Serialize;

/// Output mode for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Aligned key/value lines
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Result of one driver run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Contended record key
    pub key: String,
    /// Attempts launched
    pub attempts: u32,
    /// Outcome counts
    pub summary: OutcomeSummary,
    /// Record value after the join, if it could be read
    pub final_value: Option<String>,
    /// Run duration
    pub elapsed_ms: u64,
}

impl ScenarioReport {
    /// Build a report from a finished run.
    pub fn from_run(run: &ProbeRun, attempts: u32, final_value: Option<String>) -> Self {
        Self {
            key: run.key.to_string(),
            attempts,
            summary: run.summary.clone(),
            final_value,
            elapsed_ms: run.elapsed.as_millis() as u64,
        }
    }
}

/// Render a report.
pub fn format_report(report: &ScenarioReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputMode::Human => {
            let s = &report.summary;
            let mut lines = vec![
                format!("key:          {}", report.key),
                format!("attempts:     {}", report.attempts),
                format!("success:      {}", s.success_count),
                format!("conflict:     {}", s.conflict_count),
                format!("fatal:        {}", s.fatal_count),
            ];
            if !s.conflicted_indices.is_empty() {
                lines.push(format!("conflicted:   {}", preview(&s.conflicted_indices)));
            }
            lines.push(format!(
                "final value:  {}",
                report.final_value.as_deref().unwrap_or("(missing)")
            ));
            lines.push(format!("elapsed:      {} ms", report.elapsed_ms));
            lines.join("\n")
        }
    }
}

fn preview(indices: &[u32]) -> String {
    const SHOWN: usize = 10;
    let head: Vec<String> = indices.iter().take(SHOWN).map(|i| i.to_string()).collect();
    if indices.len() > SHOWN {
        format!("{} ... ({} total)", head.join(", "), indices.len())
    } else {
        head.join(", ")
    }
}

/// Render an error.
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({ "error": format!("{:#}", err) }).to_string(),
        OutputMode::Human => format!("contend: error: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ScenarioReport {
        ScenarioReport {
            key: "task1".to_string(),
            attempts: 3,
            summary: OutcomeSummary {
                success_count: 1,
                conflict_count: 2,
                fatal_count: 0,
                conflicted_indices: vec![1, 3],
            },
            final_value: Some("value:2".to_string()),
            elapsed_ms: 4,
        }
    }

    #[test]
    fn test_human_report() {
        let out = format_report(&report(), OutputMode::Human);
        assert!(out.contains("conflict:     2"));
        assert!(out.contains("conflicted:   1, 3"));
        assert!(out.contains("final value:  value:2"));
    }

    #[test]
    fn test_json_report() {
        let out = format_report(&report(), OutputMode::Json);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["summary"]["conflict_count"], 2);
        assert_eq!(json["final_value"], "value:2");
    }

    #[test]
    fn test_preview_truncates() {
        let indices: Vec<u32> = (1..=25).collect();
        assert_eq!(preview(&indices), "1, 2, 3, 4, 5, 6, 7, 8, 9, 10 ... (25 total)");
    }
}
