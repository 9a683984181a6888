use super::Aspect;
use crate::extract::{RuleSpec, Transform};

/// Extraction rule tables, one per aspect.
///
/// Field names are disjoint across aspects by construction, so the
/// aggregator can merge sections without collisions. Pattern order within
/// a rule is priority order: the first pattern that matches wins.
pub(crate) fn rule_table(aspect: Aspect) -> Vec<RuleSpec> {
    match aspect {
        Aspect::Financial => vec![
            RuleSpec {
                field: "piva",
                patterns: &[
                    r"P\.?\s*IVA[:\s]*(\d{11})",
                    r"partita\s+iva[:\s]*(\d{11})",
                ],
                transform: Transform::ValidPiva,
            },
            RuleSpec {
                field: "fatturato",
                patterns: &[
                    r"fatturato[:\s]*€?\s*([\d.,]+)\s*(?:milioni?|mln|million)",
                    r"ricavi[:\s]*€?\s*([\d.,]+)\s*(?:milioni?|mln|million)",
                ],
                transform: Transform::Suffix(" milioni €"),
            },
            RuleSpec {
                field: "dipendenti",
                patterns: &[r"(\d+)\s*dipendenti", r"(\d+)\s*employees"],
                transform: Transform::ParseInteger { default: 0 },
            },
            RuleSpec {
                field: "sede",
                patterns: &[
                    r"sede\s+legale[:\s]+([^,\n]+)",
                    r"sede[:\s]+([^,\n]+)",
                ],
                transform: Transform::Trim,
            },
            RuleSpec {
                field: "capitale_sociale",
                patterns: &[r"capitale\s+sociale[:\s]*€?\s*([\d.,]+)"],
                transform: Transform::Trim,
            },
            RuleSpec {
                field: "forma_giuridica",
                patterns: &[r"forma\s+giuridica[:\s]+([^,\n]+)"],
                transform: Transform::Trim,
            },
        ],
        Aspect::Digital => vec![
            RuleSpec {
                field: "website",
                patterns: &[r"(https?://[^\s\)\]]+)"],
                transform: Transform::Trim,
            },
            RuleSpec {
                field: "traffico_mensile",
                patterns: &[r"traffico(?:\s+organico)?[:\s]*([\d.,]+\s*[km]?)\b"],
                transform: Transform::ParseCompactCount { default: 0 },
            },
            RuleSpec {
                field: "backlinks",
                patterns: &[r"backlinks?[:\s]*([\d.,]+)"],
                transform: Transform::ParseInteger { default: 0 },
            },
            RuleSpec {
                field: "domain_authority",
                patterns: &[r"(?:domain\s+)?authority[:\s]*(\d{1,3})"],
                transform: Transform::ParseInteger { default: 0 },
            },
        ],
        Aspect::Competitor => vec![
            RuleSpec {
                field: "quota_mercato",
                patterns: &[
                    r"quota\s+(?:di\s+)?mercato[:\s]+([^,\n]+)",
                    r"market\s+share[:\s]+([^,\n]+)",
                    r"([\d.,]+%)\s*(?:del\s+)?mercato",
                ],
                transform: Transform::Trim,
            },
            RuleSpec {
                field: "dimensione_azienda",
                patterns: &[
                    r"(?:dimensioni|company\s+size)[:\s]+([^,\n]+)",
                    r"(piccola|media|grande|multinazionale)\s+(?:azienda|impresa)",
                ],
                transform: Transform::Lowercase,
            },
            RuleSpec {
                field: "principale_concorrente",
                patterns: &[
                    r"principale\s+concorrente[:\s]+([^,\n]+)",
                    r"main\s+competitor[:\s]+([^,\n]+)",
                ],
                transform: Transform::Trim,
            },
        ],
        Aspect::Social => vec![
            RuleSpec {
                field: "instagram_follower",
                patterns: &[r"instagram[^\n]*?([\d.,]+\s*[km]?)\s*follower"],
                transform: Transform::ParseCompactCount { default: 0 },
            },
            RuleSpec {
                field: "facebook_like",
                patterns: &[r"facebook[^\n]*?([\d.,]+\s*[km]?)\s*(?:like|mi\s+piace)"],
                transform: Transform::ParseCompactCount { default: 0 },
            },
            RuleSpec {
                field: "linkedin_follower",
                patterns: &[r"linkedin[^\n]*?([\d.,]+\s*[km]?)\s*follower"],
                transform: Transform::ParseCompactCount { default: 0 },
            },
            RuleSpec {
                field: "engagement_rate",
                patterns: &[r"engagement(?:\s+rate)?[:\s]*([\d.,]+)\s*%"],
                transform: Transform::Trim,
            },
        ],
        Aspect::CompanyProfile => vec![
            RuleSpec {
                field: "anno_fondazione",
                patterns: &[
                    r"(?:fondat[ao]|founded|costituita)\s+(?:nel\s+|in\s+)?(\d{4})",
                    r"\battiva\s+dal\s+(\d{4})",
                ],
                transform: Transform::ParseInteger { default: 0 },
            },
            RuleSpec {
                field: "settore",
                patterns: &[r"settore[:\s]+([^,\n]+)", r"industry[:\s]+([^,\n]+)"],
                transform: Transform::Trim,
            },
            RuleSpec {
                field: "codice_ateco",
                patterns: &[r"ATECO[:\s]*(\d{2}(?:\.\d{1,2}){0,2})"],
                transform: Transform::Trim,
            },
            RuleSpec {
                field: "pec",
                patterns: &[r"PEC[:\s]*([a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,})"],
                transform: Transform::Lowercase,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_disjoint_across_aspects() {
        let mut seen = HashSet::new();
        for aspect in Aspect::ALL {
            for rule in rule_table(aspect) {
                assert!(
                    seen.insert(rule.field),
                    "field '{}' declared in more than one aspect",
                    rule.field
                );
            }
        }
    }

    #[test]
    fn test_every_table_nonempty() {
        for aspect in Aspect::ALL {
            assert!(!rule_table(aspect).is_empty());
        }
    }
}
