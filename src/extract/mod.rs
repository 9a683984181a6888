use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{ResearchError, ResearchResult};
use crate::utils::validation_utils::ValidationUtils;

pub mod numeric;

/// A value extracted from source text. Serializes untagged, so JSON output
/// carries plain strings and numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Transformation applied to the captured group before storing it.
///
/// A transform may reject a syntactically matching capture (`ValidPiva`);
/// a rejected capture leaves the field absent and ends the pass for that
/// field, so extraction stays deterministic.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Trim surrounding whitespace, keep as text.
    Trim,
    /// Trim and lowercase, keep as text.
    Lowercase,
    /// Trim and append a literal suffix ("13,000" -> "13,000 milioni €").
    Suffix(&'static str),
    /// Strip thousands/decimal separators and parse as integer; the
    /// caller-supplied default is used when parsing fails.
    ParseInteger { default: i64 },
    /// Parse a compact count ("5k", "1.2M") into an integer; the default is
    /// used when parsing fails.
    ParseCompactCount { default: i64 },
    /// Accept only checksum-valid Italian VAT numbers.
    ValidPiva,
}

impl Transform {
    /// Apply the transform to a raw capture. `None` means the capture was
    /// rejected and the field stays absent.
    pub fn apply(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Trim => Some(FieldValue::Text(raw.trim().to_string())),
            Self::Lowercase => Some(FieldValue::Text(raw.trim().to_lowercase())),
            Self::Suffix(suffix) => {
                Some(FieldValue::Text(format!("{}{}", raw.trim(), suffix)))
            }
            Self::ParseInteger { default } => Some(FieldValue::Integer(
                numeric::parse_int_normalized(raw).unwrap_or(*default),
            )),
            Self::ParseCompactCount { default } => Some(FieldValue::Integer(
                numeric::parse_compact_count(raw).unwrap_or(*default),
            )),
            Self::ValidPiva => {
                let candidate = raw.trim();
                if ValidationUtils::is_valid_piva(candidate) {
                    Some(FieldValue::Text(candidate.to_string()))
                } else {
                    None
                }
            }
        }
    }
}

/// Declarative extraction rule: one field, candidate patterns in priority
/// order, one transform. Rules are data so each one can be tested without
/// running the whole pipeline.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub field: &'static str,
    pub patterns: &'static [&'static str],
    pub transform: Transform,
}

/// A rule with its patterns compiled. Compilation happens once at registry
/// construction; a malformed pattern is a fatal configuration error.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub field: String,
    patterns: Vec<Regex>,
    transform: Transform,
}

impl CompiledRule {
    pub fn compile(spec: &RuleSpec) -> ResearchResult<Self> {
        let mut patterns = Vec::with_capacity(spec.patterns.len());
        for pattern in spec.patterns {
            let compiled = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| ResearchError::InvalidRule {
                    field: spec.field.to_string(),
                    message: e.to_string(),
                })?;
            patterns.push(compiled);
        }

        Ok(Self {
            field: spec.field.to_string(),
            patterns,
            transform: spec.transform.clone(),
        })
    }

    /// First pattern that matches wins; later patterns are not consulted.
    fn extract(&self, text: &str) -> Option<FieldValue> {
        for pattern in &self.patterns {
            if let Some(captures) = pattern.captures(text) {
                let raw = captures
                    .get(1)
                    .or_else(|| captures.get(0))
                    .map(|m| m.as_str())?;
                return self.transform.apply(raw);
            }
        }
        None
    }

    /// Whether any pattern of this rule matches the text at all.
    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Applies ordered extraction rules to unstructured text.
///
/// Extraction never fabricates a value: a field is present in the output
/// only when one of its patterns literally matched the input. Absence is
/// represented by absence, never by a placeholder string.
pub struct FactExtractor;

impl FactExtractor {
    /// Run every rule against the concatenated source text.
    ///
    /// Each field is set at most once (first-match-wins); empty input
    /// yields an empty mapping rather than an error. The call has no
    /// hidden state, so identical input always yields identical output.
    pub fn extract(rules: &[CompiledRule], text: &str) -> BTreeMap<String, FieldValue> {
        let mut data = BTreeMap::new();

        if text.trim().is_empty() {
            return data;
        }

        for rule in rules {
            if data.contains_key(&rule.field) {
                continue;
            }
            if let Some(value) = rule.extract(text) {
                debug!(field = %rule.field, "field extracted");
                data.insert(rule.field.clone(), value);
            }
        }

        data
    }

    /// Count, per field, how many distinct source texts contain a match.
    ///
    /// Corroboration is reported alongside the data but never feeds the
    /// confidence score.
    pub fn corroboration_counts(
        rules: &[CompiledRule],
        texts: &[String],
    ) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();

        for rule in rules {
            let hits = texts.iter().filter(|t| rule.matches(t)).count();
            if hits > 0 {
                counts.insert(rule.field.clone(), hits);
            }
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(spec: RuleSpec) -> CompiledRule {
        CompiledRule::compile(&spec).unwrap()
    }

    fn employees_rule() -> CompiledRule {
        compile(RuleSpec {
            field: "dipendenti",
            patterns: &[r"(\d+)\s*dipendenti"],
            transform: Transform::ParseInteger { default: 0 },
        })
    }

    #[test]
    fn test_literal_match_returns_transformed_capture() {
        let rules = vec![employees_rule()];
        let data = FactExtractor::extract(&rules, "l'azienda conta 120 dipendenti in Italia");

        assert_eq!(data.get("dipendenti"), Some(&FieldValue::Integer(120)));
    }

    #[test]
    fn test_no_match_means_absence_not_placeholder() {
        let rules = vec![employees_rule()];
        let data = FactExtractor::extract(&rules, "nessuna informazione utile");

        assert!(data.get("dipendenti").is_none());
        assert!(data.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_mapping() {
        let rules = vec![employees_rule()];
        assert!(FactExtractor::extract(&rules, "").is_empty());
        assert!(FactExtractor::extract(&rules, "   \n  ").is_empty());
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let rule = compile(RuleSpec {
            field: "fatturato",
            patterns: &[
                r"fatturato[:\s]*€?\s*([\d.,]+)\s*milioni",
                r"ricavi[:\s]*€?\s*([\d.,]+)\s*milioni",
            ],
            transform: Transform::Suffix(" milioni €"),
        });

        // Both patterns match; the first declared one must win.
        let text = "ricavi: 99 milioni ... fatturato: € 13,000 milioni";
        let data = FactExtractor::extract(&[rule], text);

        assert_eq!(
            data.get("fatturato"),
            Some(&FieldValue::Text("13,000 milioni €".to_string()))
        );
    }

    #[test]
    fn test_field_set_only_once() {
        let rules = vec![employees_rule()];
        let data = FactExtractor::extract(&rules, "120 dipendenti oggi, 450 dipendenti nel 2020");

        // First occurrence in the text wins, later ones are ignored.
        assert_eq!(data.get("dipendenti"), Some(&FieldValue::Integer(120)));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let rules = vec![employees_rule()];
        let data = FactExtractor::extract(&rules, "120 DIPENDENTI");
        assert_eq!(data.get("dipendenti"), Some(&FieldValue::Integer(120)));
    }

    #[test]
    fn test_idempotence() {
        let rules = vec![employees_rule()];
        let text = "120 dipendenti, fatturato in crescita";

        let first = FactExtractor::extract(&rules, text);
        let second = FactExtractor::extract(&rules, text);

        assert_eq!(first, second);
    }

    #[test]
    fn test_rejected_capture_leaves_field_absent() {
        let rule = compile(RuleSpec {
            field: "piva",
            patterns: &[r"P\.?\s*IVA[:\s]*(\d{11})"],
            transform: Transform::ValidPiva,
        });

        // 11 digits but failing the control-digit check.
        let data = FactExtractor::extract(&[rule.clone()], "P.IVA: 12345678901");
        assert!(data.get("piva").is_none());

        // A checksum-valid number passes.
        let data = FactExtractor::extract(&[rule], "P.IVA: 00159560366");
        assert_eq!(
            data.get("piva"),
            Some(&FieldValue::Text("00159560366".to_string()))
        );
    }

    #[test]
    fn test_parse_failure_falls_back_to_default() {
        let rule = compile(RuleSpec {
            field: "backlinks",
            patterns: &[r"backlinks?[:\s]*([\d.,]+)"],
            transform: Transform::ParseInteger { default: -1 },
        });

        // The capture "..," contains separators only, so parsing falls back.
        let data = FactExtractor::extract(&[rule], "backlinks: .,");
        assert_eq!(data.get("backlinks"), Some(&FieldValue::Integer(-1)));
    }

    #[test]
    fn test_malformed_pattern_is_fatal() {
        let result = CompiledRule::compile(&RuleSpec {
            field: "broken",
            patterns: &[r"(\d+"],
            transform: Transform::Trim,
        });

        assert!(matches!(
            result,
            Err(crate::error::ResearchError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_corroboration_counts_distinct_sources() {
        let rules = vec![employees_rule()];
        let texts = vec![
            "120 dipendenti".to_string(),
            "nessun dato".to_string(),
            "circa 120 dipendenti".to_string(),
        ];

        let counts = FactExtractor::corroboration_counts(&rules, &texts);
        assert_eq!(counts.get("dipendenti"), Some(&2));
    }
}
