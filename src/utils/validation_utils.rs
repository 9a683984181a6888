/// Validation utility functions
pub struct ValidationUtils;

const LEGAL_FORMS: &[&str] = &["srl", "spa", "sas", "snc", "ltd", "inc", "corp", "llc"];

impl ValidationUtils {
    /// Validate an Italian VAT number (P.IVA): 11 digits where the last
    /// one is a control digit computed over the first ten.
    pub fn is_valid_piva(piva: &str) -> bool {
        let digits: Vec<u32> = piva
            .chars()
            .filter(|c| c.is_ascii_digit())
            .filter_map(|c| c.to_digit(10))
            .collect();

        if digits.len() != 11 || piva.chars().any(|c| !c.is_ascii_digit() && !c.is_whitespace()) {
            return false;
        }

        let odd_sum: u32 = (0..10).step_by(2).map(|i| digits[i]).sum();
        let even_sum: u32 = (1..10)
            .step_by(2)
            .map(|i| {
                let doubled = digits[i] * 2;
                if doubled < 10 { doubled } else { doubled - 9 }
            })
            .sum();

        let control = (10 - ((odd_sum + even_sum) % 10)) % 10;
        digits[10] == control
    }

    /// Validate URL format
    pub fn is_valid_url(url: &str) -> bool {
        url::Url::parse(url)
            .map(|u| u.has_host() && (u.scheme() == "http" || u.scheme() == "https"))
            .unwrap_or(false)
    }

    /// Normalize a company name for display and file naming: strip common
    /// legal forms, collapse whitespace, title-case the remainder.
    pub fn clean_company_name(name: &str) -> String {
        name.to_lowercase()
            .split_whitespace()
            // Compare whole tokens with dots removed, so "s.r.l." and
            // "srl" both drop while "Inca" survives.
            .filter(|token| {
                let normalized: String = token
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .chars()
                    .filter(|c| *c != '.')
                    .collect();
                !LEGAL_FORMS.contains(&normalized.as_str())
            })
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
