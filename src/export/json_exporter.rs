use serde_json::json;

use crate::aggregate::ConsolidatedRecord;
use crate::error::{ResearchError, ResearchResult};

/// Render a consolidated record as pretty-printed JSON. The export is a
/// direct serialization of the record; no schema is enforced.
pub fn render_json(record: &ConsolidatedRecord) -> ResearchResult<String> {
    serde_json::to_string_pretty(record).map_err(|e| ResearchError::export(e.to_string()))
}

/// Render with a metadata envelope for consumers that want provenance
/// alongside the record.
pub fn render_json_with_metadata(record: &ConsolidatedRecord) -> ResearchResult<String> {
    let envelope = json!({
        "generator": format!("impresascope {}", env!("CARGO_PKG_VERSION")),
        "exported_at": chrono::Utc::now().to_rfc3339(),
        "record": record,
    });

    serde_json::to_string_pretty(&envelope).map_err(|e| ResearchError::export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_record;

    #[test]
    fn test_json_round_trips_the_record() {
        let record = sample_record();
        let rendered = render_json(&record).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["company_name"], "Ferrero");
        assert_eq!(parsed["sections"]["financial"]["dipendenti"], 120);
        assert_eq!(
            parsed["sections"]["financial"]["fatturato"],
            "13,000 milioni €"
        );
        assert_eq!(parsed["sources"][0], "https://www.registroimprese.it/ferrero");
    }

    #[test]
    fn test_metadata_envelope() {
        let rendered = render_json_with_metadata(&sample_record()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert!(parsed["exported_at"].is_string());
        assert_eq!(parsed["record"]["company_name"], "Ferrero");
    }
}
