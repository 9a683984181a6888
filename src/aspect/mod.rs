use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ResearchResult;
use crate::extract::CompiledRule;

pub mod queries;
pub mod rules;

/// One thematic slice of company research.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Financial,
    Digital,
    Competitor,
    Social,
    CompanyProfile,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Financial,
        Aspect::Digital,
        Aspect::Competitor,
        Aspect::Social,
        Aspect::CompanyProfile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Aspect::Financial => "financial",
            Aspect::Digital => "digital",
            Aspect::Competitor => "competitor",
            Aspect::Social => "social",
            Aspect::CompanyProfile => "company_profile",
        }
    }

    pub fn from_name(name: &str) -> Option<Aspect> {
        match name.trim().to_lowercase().as_str() {
            "financial" => Some(Aspect::Financial),
            "digital" => Some(Aspect::Digital),
            "competitor" => Some(Aspect::Competitor),
            "social" => Some(Aspect::Social),
            "company_profile" | "company-profile" | "company" => Some(Aspect::CompanyProfile),
            _ => None,
        }
    }
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Query templates and compiled extraction rules for one aspect.
pub struct AspectProfile {
    pub rules: Vec<CompiledRule>,
}

/// Enum-keyed table of aspect profiles, resolved once at configuration
/// load time. Construction compiles every rule table; a malformed pattern
/// fails here, before any per-company work begins.
pub struct AspectRegistry {
    profiles: HashMap<Aspect, AspectProfile>,
}

impl AspectRegistry {
    pub fn new() -> ResearchResult<Self> {
        let mut profiles = HashMap::new();

        for aspect in Aspect::ALL {
            let compiled = rules::rule_table(aspect)
                .iter()
                .map(CompiledRule::compile)
                .collect::<ResearchResult<Vec<_>>>()?;

            profiles.insert(aspect, AspectProfile { rules: compiled });
        }

        Ok(Self { profiles })
    }

    pub fn rules_for(&self, aspect: Aspect) -> &[CompiledRule] {
        // Every variant is inserted in new(), so the lookup cannot miss.
        &self.profiles[&aspect].rules
    }

    /// Concrete query list for a company and aspect.
    pub fn queries_for(&self, aspect: Aspect, company_name: &str) -> Vec<String> {
        queries::queries_for(aspect, company_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_compiles_all_aspects() {
        let registry = AspectRegistry::new().unwrap();
        for aspect in Aspect::ALL {
            assert!(!registry.rules_for(aspect).is_empty());
        }
    }

    #[test]
    fn test_aspect_round_trip_names() {
        for aspect in Aspect::ALL {
            assert_eq!(Aspect::from_name(aspect.name()), Some(aspect));
        }
        assert_eq!(Aspect::from_name("unknown"), None);
    }
}
