use crate::aggregate::ConsolidatedRecord;
use crate::extract::FieldValue;
use crate::utils::string_utils::StringUtils;

/// Render a consolidated record as a Markdown report: a metadata header,
/// one section per aspect, sources and any failed aspects at the end.
pub fn render_markdown(record: &ConsolidatedRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Analisi: {}\n\n", record.company_name));
    out.push_str(&format!(
        "*Generato il: {}*\n\n",
        record.analysis_date.format("%d/%m/%Y %H:%M")
    ));
    out.push_str(&format!(
        "**Score complessivo**: {:.2} ({})\n\n",
        record.overall_score, record.quality
    ));

    for (section, data) in &record.sections {
        out.push_str(&format!("## {}\n\n", StringUtils::title_case_field(section)));

        if data.is_empty() {
            out.push_str("*Nessun dato trovato*\n\n");
            continue;
        }

        for (field, value) in data {
            let display = match value {
                FieldValue::Integer(n) => StringUtils::format_compact(*n as f64),
                other => other.to_string(),
            };
            out.push_str(&format!(
                "- **{}**: {}\n",
                StringUtils::title_case_field(field),
                display
            ));
        }

        if let Some(score) = record.aspect_scores.get(section) {
            out.push_str(&format!("\n*Confidenza: {:.2}*\n", score));
        }
        out.push('\n');
    }

    if !record.sources.is_empty() {
        out.push_str("## Fonti\n\n");
        for url in &record.sources {
            out.push_str(&format!("- {}\n", url));
        }
        out.push('\n');
    }

    if !record.failed_aspects.is_empty() {
        out.push_str("## Analisi non riuscite\n\n");
        for failure in &record.failed_aspects {
            out.push_str(&format!("- **{}**: {}\n", failure.aspect, failure.reason));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_record;

    #[test]
    fn test_markdown_structure() {
        let rendered = render_markdown(&sample_record());

        assert!(rendered.starts_with("# Analisi: Ferrero"));
        assert!(rendered.contains("## Financial"));
        assert!(rendered.contains("**Fatturato**: 13,000 milioni €"));
        assert!(rendered.contains("## Fonti"));
        assert!(rendered.contains("registroimprese.it"));
        assert!(!rendered.contains("Analisi non riuscite"));
    }

    #[test]
    fn test_integers_render_compact() {
        let rendered = render_markdown(&sample_record());
        // 120 stays plain below the compact threshold.
        assert!(rendered.contains("**Dipendenti**: 120"));
    }
}
