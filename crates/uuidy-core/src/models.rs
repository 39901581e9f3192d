//! Data types that flow through the classification pipeline.
//!
//! [`SearchResult`] values are ephemeral input to the classifier. The
//! classifier produces a [`Classification`] draft; the cache gateway turns
//! it into a [`ClassificationRecord`] once it has storage timestamps.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One organic hit returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    /// Not yet validated; unusable URLs are dropped when sources are built.
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    /// 1-indexed rank.
    pub position: u32,
}

/// A reference kept on a classification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// What kind of identifier the classifier decided this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassificationType {
    #[serde(rename = "Standard BLE Service")]
    StandardService,
    #[serde(rename = "Vendor-Specific")]
    VendorSpecific,
    #[serde(rename = "Apple iBeacon")]
    AppleIBeacon,
    #[serde(rename = "Google Eddystone")]
    GoogleEddystone,
    #[serde(rename = "Custom Service")]
    CustomService,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ClassificationType {
    pub const ALL: [ClassificationType; 6] = [
        ClassificationType::StandardService,
        ClassificationType::VendorSpecific,
        ClassificationType::AppleIBeacon,
        ClassificationType::GoogleEddystone,
        ClassificationType::CustomService,
        ClassificationType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationType::StandardService => "Standard BLE Service",
            ClassificationType::VendorSpecific => "Vendor-Specific",
            ClassificationType::AppleIBeacon => "Apple iBeacon",
            ClassificationType::GoogleEddystone => "Google Eddystone",
            ClassificationType::CustomService => "Custom Service",
            ClassificationType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ClassificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown classification type: {}", s))
    }
}

/// How much the classifier trusts its own answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(ConfidenceLevel::High),
            "medium" => Ok(ConfidenceLevel::Medium),
            "low" => Ok(ConfidenceLevel::Low),
            other => anyhow::bail!("unknown confidence level: {}", other),
        }
    }
}

/// A classification draft: everything the classifier knows about one
/// identifier, before storage assigns timestamps.
///
/// Build it with [`Classification::new`]; an `Unknown` type always carries
/// `Low` confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "uuid")]
    pub identifier: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ClassificationType,
    pub description: String,
    pub sources: Vec<SourceInfo>,
    pub confidence: ConfidenceLevel,
    pub searched_at: DateTime<Utc>,
}

impl Classification {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        kind: ClassificationType,
        description: impl Into<String>,
        sources: Vec<SourceInfo>,
        confidence: ConfidenceLevel,
        searched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind,
            description: description.into(),
            sources,
            confidence,
            searched_at,
        }
        .normalized()
    }

    /// Force `Low` confidence on `Unknown` classifications.
    pub fn normalized(mut self) -> Self {
        if self.kind == ClassificationType::Unknown {
            self.confidence = ConfidenceLevel::Low;
        }
        self
    }
}

/// A persisted classification as returned to callers.
///
/// `cached` tells whether the record was served from storage (`true`) or
/// computed for this request (`false`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    #[serde(flatten)]
    pub classification: Classification,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cached: bool,
}

impl ClassificationRecord {
    pub fn new(
        classification: Classification,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        cached: bool,
    ) -> Self {
        Self {
            classification: classification.normalized(),
            created_at,
            updated_at,
            cached,
        }
    }

    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.classification.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: ClassificationType, confidence: ConfidenceLevel) -> Classification {
        Classification::new(
            "12345678-1234-1234-1234-123456789abc",
            "Thing",
            kind,
            "desc",
            Vec::new(),
            confidence,
            Utc::now(),
        )
    }

    #[test]
    fn test_unknown_forces_low_confidence() {
        let c = draft(ClassificationType::Unknown, ConfidenceLevel::High);
        assert_eq!(c.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_known_types_keep_confidence() {
        let c = draft(ClassificationType::VendorSpecific, ConfidenceLevel::Medium);
        assert_eq!(c.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_record_reapplies_correction() {
        let mut c = draft(ClassificationType::Unknown, ConfidenceLevel::Low);
        c.confidence = ConfidenceLevel::Medium;
        let now = Utc::now();
        let record = ClassificationRecord::new(c, now, now, true);
        assert_eq!(record.classification.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_type_strings_roundtrip_through_from_str() {
        for t in ClassificationType::ALL {
            assert_eq!(t.as_str().parse::<ClassificationType>().unwrap(), t);
        }
        assert!("Standard".parse::<ClassificationType>().is_err());
    }

    #[test]
    fn test_record_json_shape() {
        let now = Utc::now();
        let record = ClassificationRecord::new(
            draft(ClassificationType::AppleIBeacon, ConfidenceLevel::Medium),
            now,
            now,
            false,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["uuid"], "12345678-1234-1234-1234-123456789abc");
        assert_eq!(json["type"], "Apple iBeacon");
        assert_eq!(json["confidence"], "medium");
        assert_eq!(json["cached"], false);
        assert!(json.get("searched_at").is_some());
        assert!(json.get("created_at").is_some());
    }
}
