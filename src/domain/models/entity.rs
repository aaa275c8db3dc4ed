//! Entity keys and namespaces.
//!
//! An entity is one monitored disk/path, identified by the triple
//! (site, sub_site, server_type). Every sample also lives in exactly one
//! namespace; the two namespaces never see each other's data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite identifier for one monitored disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub site: String,
    pub sub_site: String,
    pub server_type: String,
}

impl EntityKey {
    pub fn new(
        site: impl Into<String>,
        sub_site: impl Into<String>,
        server_type: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            sub_site: sub_site.into(),
            server_type: server_type.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.site, self.sub_site, self.server_type)
    }
}

/// Isolated tenant partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    #[default]
    Production,
    Test,
}

impl Namespace {
    pub const ALL: [Self; 2] = [Self::Production, Self::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
