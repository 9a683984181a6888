use std::path::Path;
use tracing::info;

use crate::aggregate::ConsolidatedRecord;
use crate::config::ExportConfig;
use crate::error::{ResearchError, ResearchResult};

pub mod csv_exporter;
pub mod json_exporter;
pub mod markdown_exporter;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> ResearchResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(ResearchError::UnsupportedFormat { format: other.to_string() }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "md",
        }
    }
}

/// Statistics about a completed export.
#[derive(Debug, Clone)]
pub struct ExportStats {
    pub file_size_bytes: u64,
    pub format: ExportFormat,
}

/// Renders and writes consolidated records.
pub struct ExportManager {
    config: ExportConfig,
}

impl ExportManager {
    pub fn new(config: &ExportConfig) -> Self {
        Self { config: config.clone() }
    }

    /// Render a record to a string in the given format.
    pub fn render(record: &ConsolidatedRecord, format: ExportFormat) -> ResearchResult<String> {
        match format {
            ExportFormat::Json => json_exporter::render_json(record),
            ExportFormat::Csv => csv_exporter::render_csv(record),
            ExportFormat::Markdown => Ok(markdown_exporter::render_markdown(record)),
        }
    }

    /// Write a record to a file, creating parent directories as needed.
    pub async fn export(
        &self,
        record: &ConsolidatedRecord,
        output_path: &Path,
        format: ExportFormat,
    ) -> ResearchResult<ExportStats> {
        let rendered = Self::render(record, format)?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ResearchError::export(e.to_string()))?;
            }
        }

        tokio::fs::write(output_path, &rendered)
            .await
            .map_err(|e| ResearchError::export(e.to_string()))?;

        let file_size = tokio::fs::metadata(output_path)
            .await
            .map_err(|e| ResearchError::export(e.to_string()))?
            .len();

        info!(
            path = %output_path.display(),
            bytes = file_size,
            "export completed"
        );

        Ok(ExportStats { file_size_bytes: file_size, format })
    }

    /// Default output path for a company under the configured directory.
    /// Legal forms are stripped from the name before sanitizing, so
    /// "Rossi Costruzioni S.r.l." lands in "Rossi_Costruzioni.json".
    pub fn default_path(&self, company_name: &str, format: ExportFormat) -> std::path::PathBuf {
        use crate::utils::string_utils::StringUtils;
        use crate::utils::validation_utils::ValidationUtils;

        let cleaned = ValidationUtils::clean_company_name(company_name);
        let display = if cleaned.is_empty() { company_name } else { &cleaned };
        let stem = StringUtils::sanitize_filename(display);

        self.config
            .output_directory
            .join(format!("{}.{}", stem, format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{consolidate, AspectOutcome, AspectResult};
    use crate::aspect::Aspect;
    use crate::extract::FieldValue;

    pub(crate) fn sample_record() -> ConsolidatedRecord {
        let mut result = AspectResult::empty(Aspect::Financial, 5);
        result
            .data
            .insert("fatturato".to_string(), FieldValue::Text("13,000 milioni €".to_string()));
        result
            .data
            .insert("dipendenti".to_string(), FieldValue::Integer(120));
        result.queries_with_results = 3;
        result.sources = vec![crate::fetch::StubFetcher::hit(
            "https://www.registroimprese.it/ferrero",
            "fatturato",
        )];

        consolidate("Ferrero", &[AspectOutcome::Completed(result)])
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(ExportFormat::from_name("json").unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::from_name("MD").unwrap(), ExportFormat::Markdown);
        assert!(ExportFormat::from_name("xlsx").is_err());
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            default_format: "json".to_string(),
            output_directory: dir.path().to_path_buf(),
        };

        let manager = ExportManager::new(&config);
        let record = sample_record();
        let path = manager.default_path("Ferrero", ExportFormat::Json);

        let stats = manager.export(&record, &path, ExportFormat::Json).await.unwrap();
        assert!(stats.file_size_bytes > 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["company_name"], "Ferrero");
    }

    #[test]
    fn test_default_path_sanitizes_company_name() {
        let manager = ExportManager::new(&ExportConfig {
            default_format: "json".to_string(),
            output_directory: std::path::PathBuf::from("exports"),
        });

        let path = manager.default_path("Acme / Figli S.r.l.", ExportFormat::Csv);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.contains('/'));
        assert!(name.ends_with(".csv"));
    }
}
