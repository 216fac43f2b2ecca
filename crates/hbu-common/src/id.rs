//! Plot and study identity types.
//!
//! Both identifiers are opaque strings on the wire. Freshly minted ids carry
//! a kind prefix (`plot-`, `study-`) followed by a v4 UUID.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a land plot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PlotId(pub String);

impl PlotId {
    /// Mint a new random plot id.
    pub fn generate() -> Self {
        PlotId(format!("plot-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlotId {
    fn from(s: &str) -> Self {
        PlotId(s.to_string())
    }
}

impl From<String> for PlotId {
    fn from(s: String) -> Self {
        PlotId(s)
    }
}

/// Identifier of a generated HBU study.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StudyId(pub String);

impl StudyId {
    /// Mint a new random study id.
    pub fn generate() -> Self {
        StudyId(format!("study-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StudyId {
    fn from(s: &str) -> Self {
        StudyId(s.to_string())
    }
}

impl From<String> for StudyId {
    fn from(s: String) -> Self {
        StudyId(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = PlotId::generate();
        let b = PlotId::generate();
        assert!(a.as_str().starts_with("plot-"));
        assert_ne!(a, b);

        let s = StudyId::generate();
        assert!(s.as_str().starts_with("study-"));
        // "study-" + 36 char UUID
        assert_eq!(s.as_str().len(), 42);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = PlotId::from("plot-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"plot-001\"");
        let back: StudyId = serde_json::from_str("\"study-x\"").unwrap();
        assert_eq!(back, StudyId::from("study-x"));
    }
}
