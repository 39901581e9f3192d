//! Heuristic classification engine.
//!
//! Turns an identifier plus a ranked list of search results into a
//! [`Classification`] draft. The engine is pure CPU work: it never awaits,
//! never fails, and holds only a shared reference to a [`KnowledgeBase`].
//!
//! # Algorithm
//!
//! 1. A known assigned service short-circuits everything: `StandardService`,
//!    `High` confidence, sources built from whatever results were supplied.
//! 2. No results → `Unknown` / `Low` with no sources.
//! 3. Type detection: [`TYPE_RULES`] evaluated in order, first match wins.
//! 4. Name extraction: the most frequent capture across [`NAME_PATTERNS`]
//!    (ties go to the first one seen), falling back to a cleaned title.
//! 5. Description: a per-type template plus one supporting snippet.
//! 6. Confidence: name agreement across results and authoritative sources.
//! 7. Sources: the first five results with usable URLs.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use url::Url;

use crate::knowledge::{contains_any, matches_standard_form, KnowledgeBase, KnownService, BLUETOOTH};
use crate::models::{
    Classification, ClassificationType, ConfidenceLevel, SearchResult, SourceInfo,
};

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_DESCRIPTION: &str =
    "Unable to identify this UUID. No information found in search results.";
pub const MISSING_SNIPPET: &str = "No snippet available";
pub const MAX_SOURCES: usize = 5;

const MAX_URL_LEN: usize = 2083;
const SNIPPET_MIN_CHARS: usize = 20;
const SNIPPET_MAX_CHARS: usize = 200;

const GENERIC_BLE_TERMS: &[&str] = &["bluetooth", "ble", "gatt", "service", "characteristic"];
const STOP_WORDS: &[&str] = &["the", "and", "for", "ble", "uuid"];
const TITLE_SUFFIXES: &[&str] = &[
    " - Bluetooth SIG",
    " - Bluetooth",
    " | Bluetooth",
    " - Nordic",
    " - Apple",
    " Service UUID",
    " UUID",
];
const TITLE_SEPARATORS: &[&str] = &[" - ", " | ", " : "];

/// Case-insensitive extractors, each capturing a candidate name in group 1.
static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "Heart Rate Service", "Proximity Profile"
        r"(?i)([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:Service|Profile)",
        // "service name: Heart Rate"
        r"(?i)(?:service|profile|name)[:\s]+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        r"(?i)(Nordic\s+UART\s+Service|NUS)",
        // "Battery Level UUID", "Heart Rate 0x180D"
        r"(?i)([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:UUID|0x[0-9A-Fa-f]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("name pattern must compile"))
    .collect()
});

/// Text the type rules look at.
struct Evidence<'a> {
    kb: &'a KnowledgeBase,
    identifier: &'a str,
    /// Lowercased titles and non-empty snippets joined by spaces.
    text: String,
}

/// One step of the type-detection chain.
pub struct TypeRule {
    pub kind: ClassificationType,
    test: fn(&Evidence<'_>) -> bool,
}

fn has_ibeacon_indicator(e: &Evidence<'_>) -> bool {
    contains_any(&e.text, e.kb.ibeacon_indicators)
}

fn has_eddystone_indicator(e: &Evidence<'_>) -> bool {
    contains_any(&e.text, e.kb.eddystone_indicators)
}

fn has_standard_form(e: &Evidence<'_>) -> bool {
    matches_standard_form(e.identifier)
}

fn has_vendor_indicator(e: &Evidence<'_>) -> bool {
    contains_any(&e.text, e.kb.vendor_indicators)
}

fn has_generic_ble_term(e: &Evidence<'_>) -> bool {
    contains_any(&e.text, GENERIC_BLE_TERMS)
}

/// Type rules in priority order. Anything that matches none is `Unknown`.
pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        kind: ClassificationType::AppleIBeacon,
        test: has_ibeacon_indicator,
    },
    TypeRule {
        kind: ClassificationType::GoogleEddystone,
        test: has_eddystone_indicator,
    },
    TypeRule {
        kind: ClassificationType::StandardService,
        test: has_standard_form,
    },
    TypeRule {
        kind: ClassificationType::VendorSpecific,
        test: has_vendor_indicator,
    },
    TypeRule {
        kind: ClassificationType::CustomService,
        test: has_generic_ble_term,
    },
];

/// Stateless classifier over a borrowed knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'kb> {
    kb: &'kb KnowledgeBase,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(&BLUETOOTH)
    }
}

impl<'kb> Classifier<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Classify a canonical identifier from its search results.
    ///
    /// Never fails: an empty result list produces an `Unknown` draft.
    pub fn classify(&self, identifier: &str, results: &[SearchResult]) -> Classification {
        tracing::info!(
            identifier,
            results = results.len(),
            "classifying identifier"
        );

        if let Some(service) = self.kb.lookup_known_service(identifier) {
            tracing::info!(identifier, name = service.name, "matched known GATT service");
            return self.known_service(identifier, service, results);
        }

        if results.is_empty() {
            tracing::info!(identifier, "no search results, classifying as unknown");
            return Classification::new(
                identifier,
                UNKNOWN_NAME,
                ClassificationType::Unknown,
                UNKNOWN_DESCRIPTION,
                Vec::new(),
                ConfidenceLevel::Low,
                Utc::now(),
            );
        }

        let kind = self.detect_type(identifier, results);
        let name = extract_name(results);
        let description = self.describe(&name, kind, results);
        let confidence = self.confidence(results, &name);
        let sources = build_sources(results);

        tracing::info!(
            identifier,
            kind = %kind,
            name = %name,
            confidence = %confidence,
            "classification complete"
        );

        Classification::new(
            identifier,
            name,
            kind,
            description,
            sources,
            confidence,
            Utc::now(),
        )
    }

    fn known_service(
        &self,
        identifier: &str,
        service: &KnownService,
        results: &[SearchResult],
    ) -> Classification {
        Classification::new(
            identifier,
            service.name,
            ClassificationType::StandardService,
            service.description,
            build_sources(results),
            ConfidenceLevel::High,
            Utc::now(),
        )
    }

    /// Run [`TYPE_RULES`] against the combined result text.
    pub fn detect_type(&self, identifier: &str, results: &[SearchResult]) -> ClassificationType {
        let evidence = Evidence {
            kb: self.kb,
            identifier,
            text: combined_text(results).to_lowercase(),
        };

        match TYPE_RULES.iter().find(|rule| (rule.test)(&evidence)) {
            Some(rule) => {
                tracing::debug!(identifier, kind = %rule.kind, "type rule matched");
                rule.kind
            }
            None => {
                tracing::debug!(identifier, "no type indicators found");
                ClassificationType::Unknown
            }
        }
    }

    /// Per-type template, followed by the best supporting snippet.
    pub fn describe(
        &self,
        name: &str,
        kind: ClassificationType,
        results: &[SearchResult],
    ) -> String {
        let base = match kind {
            ClassificationType::StandardService => {
                format!("Bluetooth SIG standardized {} service", name)
            }
            ClassificationType::VendorSpecific => format!("Vendor-specific {} service", name),
            ClassificationType::AppleIBeacon => format!("Apple iBeacon {}", name),
            ClassificationType::GoogleEddystone => format!("Google Eddystone {}", name),
            ClassificationType::CustomService => format!("Custom BLE {} service", name),
            ClassificationType::Unknown => "Unable to identify this UUID".to_string(),
        };

        match self.best_snippet(results) {
            Some(snippet) if snippet.chars().count() > SNIPPET_MIN_CHARS => {
                format!("{}. {}", base, truncate_snippet(snippet))
            }
            _ => base,
        }
    }

    /// First non-empty snippet from an authoritative source, else the first
    /// non-empty snippet at all.
    fn best_snippet<'r>(&self, results: &'r [SearchResult]) -> Option<&'r str> {
        let mut fallback = None;
        for result in results.iter().filter(|r| !r.snippet.is_empty()) {
            if self.kb.is_authoritative_source(&result.url) {
                return Some(&result.snippet);
            }
            fallback.get_or_insert(result.snippet.as_str());
        }
        fallback
    }

    /// Score agreement on `name` and presence of trusted domains.
    pub fn confidence(&self, results: &[SearchResult], name: &str) -> ConfidenceLevel {
        if results.is_empty() || name == UNKNOWN_NAME {
            return ConfidenceLevel::Low;
        }

        let name_lower = name.to_lowercase();
        let mentions = results
            .iter()
            .filter(|r| {
                format!("{} {}", r.title, r.snippet)
                    .to_lowercase()
                    .contains(&name_lower)
            })
            .count();
        let authoritative = results
            .iter()
            .filter(|r| self.kb.is_authoritative_source(&r.url))
            .count();

        if mentions >= 3 && authoritative >= 1 {
            ConfidenceLevel::High
        } else if mentions >= 2 || authoritative >= 1 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

fn combined_text(results: &[SearchResult]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(results.len() * 2);
    for r in results {
        parts.push(&r.title);
        if !r.snippet.is_empty() {
            parts.push(&r.snippet);
        }
    }
    parts.join(" ")
}

/// Most frequent name candidate across all results, or a cleaned first title.
pub fn extract_name(results: &[SearchResult]) -> String {
    let Some(first) = results.first() else {
        return UNKNOWN_NAME.to_string();
    };

    let mut candidates: Vec<&str> = Vec::new();
    for result in results {
        for text in [result.title.as_str(), result.snippet.as_str()] {
            for pattern in NAME_PATTERNS.iter() {
                candidates.extend(
                    pattern
                        .captures_iter(text)
                        .filter_map(|c| c.get(1))
                        .map(|m| m.as_str()),
                );
            }
        }
    }

    // name -> (count, first seen)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for candidate in candidates {
        if candidate.chars().count() < 3
            || STOP_WORDS.iter().any(|w| candidate.eq_ignore_ascii_case(w))
        {
            continue;
        }
        let order = counts.len();
        counts.entry(candidate.trim()).or_insert((0, order)).0 += 1;
    }

    if let Some((name, _)) = counts
        .into_iter()
        .max_by(|(_, (ca, oa)), (_, (cb, ob))| ca.cmp(cb).then(ob.cmp(oa)))
    {
        return name.to_string();
    }

    // No candidate survived the filter.
    let cleaned = clean_title(&first.title);
    if !cleaned.is_empty() && !cleaned.eq_ignore_ascii_case(UNKNOWN_NAME) {
        cleaned
    } else {
        UNKNOWN_NAME.to_string()
    }
}

/// Strip known trailing site names (case-insensitive) and keep the text
/// before a separator.
pub fn clean_title(title: &str) -> String {
    let mut result = title;
    for suffix in TITLE_SUFFIXES {
        let Some(cut) = result.len().checked_sub(suffix.len()) else {
            continue;
        };
        if result.is_char_boundary(cut) && result[cut..].eq_ignore_ascii_case(suffix) {
            result = &result[..cut];
        }
    }
    for separator in TITLE_SEPARATORS {
        if let Some((head, _)) = result.split_once(separator) {
            result = head;
        }
    }
    result.trim().to_string()
}

fn truncate_snippet(snippet: &str) -> String {
    if snippet.chars().count() > SNIPPET_MAX_CHARS {
        let head: String = snippet.chars().take(SNIPPET_MAX_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        snippet.to_string()
    }
}

/// Convert the first [`MAX_SOURCES`] results, skipping unusable URLs.
pub fn build_sources(results: &[SearchResult]) -> Vec<SourceInfo> {
    results
        .iter()
        .take(MAX_SOURCES)
        .filter_map(|r| match parse_source_url(&r.url) {
            Ok(url) => Some(SourceInfo {
                title: r.title.clone(),
                url,
                snippet: if r.snippet.is_empty() {
                    MISSING_SNIPPET.to_string()
                } else {
                    r.snippet.clone()
                },
            }),
            Err(reason) => {
                tracing::warn!(url = %r.url, reason = %reason, "skipping invalid source URL");
                None
            }
        })
        .collect()
}

fn parse_source_url(raw: &str) -> Result<String, String> {
    if raw.len() > MAX_URL_LEN {
        return Err(format!("longer than {} characters", MAX_URL_LEN));
    }
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(url.to_string())
}
