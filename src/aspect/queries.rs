use super::Aspect;

/// Fixed query templates per aspect. `{company}` is replaced with the
/// quoted company name; the lists are literal data, never computed.
pub(crate) fn query_templates(aspect: Aspect) -> &'static [&'static str] {
    match aspect {
        Aspect::Financial => &[
            "\"{company}\" site:registroimprese.it",
            "\"{company}\" site:infocamere.it",
            "\"{company}\" p.iva partita iva",
            "\"{company}\" bilancio fatturato ricavi",
            "\"{company}\" camera commercio",
            "\"{company}\" sede legale indirizzo",
            "\"{company}\" dipendenti employees",
        ],
        Aspect::Digital => &[
            "\"{company}\" seo traffic statistics",
            "\"{company}\" website analysis",
            "\"{company}\" digital marketing performance",
            "\"{company}\" google rankings",
            "\"{company}\" backlinks domain authority",
        ],
        Aspect::Competitor => &[
            "\"{company}\" competitor analysis",
            "\"{company}\" market share competitors",
            "\"{company}\" industry rivals",
            "\"{company}\" competitive landscape",
            "\"{company}\" market positioning",
        ],
        Aspect::Social => &[
            "\"{company}\" instagram profile",
            "\"{company}\" facebook page",
            "\"{company}\" linkedin company",
            "\"{company}\" youtube channel",
            "\"{company}\" social media presence",
        ],
        Aspect::CompanyProfile => &[
            "\"{company}\" company profile about",
            "\"{company}\" storia history founded",
            "\"{company}\" products services",
            "\"{company}\" management team",
            "\"{company}\" mission values",
        ],
    }
}

/// Build the concrete query list for a company. Pure string substitution,
/// no network access and no failure modes.
pub fn queries_for(aspect: Aspect, company_name: &str) -> Vec<String> {
    query_templates(aspect)
        .iter()
        .map(|template| template.replace("{company}", company_name.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let queries = queries_for(Aspect::Financial, "Ferrero");
        assert_eq!(queries.len(), 7);
        assert_eq!(queries[0], "\"Ferrero\" site:registroimprese.it");
        assert!(queries.iter().all(|q| q.contains("Ferrero")));
    }

    #[test]
    fn test_template_counts_within_bounds() {
        for aspect in Aspect::ALL {
            let count = query_templates(aspect).len();
            assert!((3..=7).contains(&count), "{:?} has {} templates", aspect, count);
        }
    }

    #[test]
    fn test_pure_function() {
        let a = queries_for(Aspect::Social, "Barilla");
        let b = queries_for(Aspect::Social, "Barilla");
        assert_eq!(a, b);
    }
}
