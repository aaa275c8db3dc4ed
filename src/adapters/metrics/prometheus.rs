//! Prometheus text exposition format.
//!
//! Renders report counters for scraping by a Prometheus server or compatible agent.

use crate::domain::models::EntityKey;

/// Render per-entity report counts as a Prometheus counter family.
///
/// The HELP and TYPE lines are always emitted, even with no samples.
pub fn render_prometheus(counts: &[(EntityKey, u64)]) -> String {
    let mut out = String::new();

    out.push_str("# HELP loghive_agent_reports_total Accepted agent reports.\n");
    out.push_str("# TYPE loghive_agent_reports_total counter\n");
    for (key, count) in counts {
        out.push_str(&format!(
            "loghive_agent_reports_total{{site=\"{}\",sub_site=\"{}\",server_type=\"{}\"}} {}\n",
            escape_label(&key.site),
            escape_label(&key.sub_site),
            escape_label(&key.server_type),
            count
        ));
    }

    out
}

fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}
