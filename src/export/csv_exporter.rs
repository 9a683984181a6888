use crate::aggregate::ConsolidatedRecord;
use crate::error::{ResearchError, ResearchResult};

/// Render a consolidated record as flat CSV rows: one row per extracted
/// field, section-qualified, followed by the per-aspect scores.
pub fn render_csv(record: &ConsolidatedRecord) -> ResearchResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["section", "field", "value"])
        .map_err(|e| ResearchError::export(e.to_string()))?;

    for (section, data) in &record.sections {
        for (field, value) in data {
            writer
                .write_record([section.as_str(), field.as_str(), &value.to_string()])
                .map_err(|e| ResearchError::export(e.to_string()))?;
        }
    }

    for (section, score) in &record.aspect_scores {
        writer
            .write_record([section.as_str(), "confidence_score", &score.to_string()])
            .map_err(|e| ResearchError::export(e.to_string()))?;
    }

    writer
        .write_record(["overall", "overall_score", &record.overall_score.to_string()])
        .map_err(|e| ResearchError::export(e.to_string()))?;
    writer
        .write_record(["overall", "quality", record.quality.as_str()])
        .map_err(|e| ResearchError::export(e.to_string()))?;

    let bytes = writer
        .into_inner()
        .map_err(|e| ResearchError::export(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| ResearchError::export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_record;

    #[test]
    fn test_csv_has_header_and_field_rows() {
        let rendered = render_csv(&sample_record()).unwrap();
        let lines: Vec<&str> = rendered.trim().lines().collect();

        assert_eq!(lines[0], "section,field,value");
        assert!(lines.iter().any(|l| l.starts_with("financial,dipendenti,120")));
        assert!(lines.iter().any(|l| l.starts_with("financial,fatturato,")));
        assert!(lines.iter().any(|l| l.starts_with("overall,overall_score,")));
    }

    #[test]
    fn test_values_with_commas_are_quoted() {
        let rendered = render_csv(&sample_record()).unwrap();
        // "13,000 milioni €" must survive as one CSV field.
        assert!(rendered.contains("\"13,000 milioni €\""));
    }
}
