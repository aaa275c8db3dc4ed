//! Agent report payload.
//!
//! Agents post a flat JSON object. Every field is optional at the wire level so that
//! a missing field is reported by name instead of as a generic decode failure.

use serde::{Deserialize, Serialize};

use super::entity::EntityKey;
use crate::domain::errors::{DomainError, DomainResult};

/// Raw ingestion payload as received from an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub sub_site: Option<String>,
    #[serde(default)]
    pub server_type: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Accepts a JSON number or a numeric string.
    #[serde(default)]
    pub size_mb: Option<serde_json::Value>,
}

/// A report whose fields passed validation. The token has not been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReport {
    pub key: EntityKey,
    pub path: String,
    pub size_mb: f64,
}

impl ReportPayload {
    /// Check presence of every required field and parse `size_mb`.
    ///
    /// Fields are checked in the order `site, sub_site, server_type, path, size_mb`;
    /// blank strings count as missing.
    pub fn validate_fields(&self) -> DomainResult<ValidatedReport> {
        let site = required(&self.site, "site")?;
        let sub_site = required(&self.sub_site, "sub_site")?;
        let server_type = required(&self.server_type, "server_type")?;
        let path = required(&self.path, "path")?;
        let raw_size = self
            .size_mb
            .as_ref()
            .filter(|v| !v.is_null())
            .ok_or(DomainError::MissingField("size_mb"))?;
        let size_mb = parse_size_mb(raw_size)?;

        Ok(ValidatedReport {
            key: EntityKey::new(site, sub_site, server_type),
            path: path.to_string(),
            size_mb,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> DomainResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(DomainError::MissingField(field))
}

/// Parse a size from a JSON number or numeric string.
///
/// Unparseable input is an `InvalidValue`; a parsed value that is negative or not
/// finite is a `DataAnomaly`.
pub fn parse_size_mb(value: &serde_json::Value) -> DomainResult<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| DomainError::InvalidValue {
        field: "size_mb",
        reason: format!("expected a number, got {value}"),
    })?;

    if !parsed.is_finite() {
        return Err(DomainError::DataAnomaly(format!("size_mb must be finite, got {parsed}")));
    }
    if parsed < 0.0 {
        return Err(DomainError::DataAnomaly(format!("size_mb must be non-negative, got {parsed}")));
    }
    Ok(parsed)
}
