//! Centralized configuration management for questionnaire

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};

use crate::submit::{LogSink, SubmitFormat, SubmitSink, WriterSink};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// File the TUI writes its log to
    pub log_file: PathBuf,
    /// Where and how submissions are delivered
    pub submit: SubmitConfig,
}

/// Submission delivery configuration
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// File submissions are appended to; the log is used when unset
    pub output: Option<PathBuf>,
    /// Encoding of submissions written to `output`
    pub format: SubmitFormat,
    /// Indent JSON submissions
    pub pretty: bool,
}

impl SubmitConfig {
    /// Indented JSON suits the log; files get one document per line
    pub fn default_pretty(output: Option<&Path>) -> bool {
        output.is_none()
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: SubmitFormat::Json,
            pretty: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("./questionnaire.log"),
            submit: SubmitConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let log_file = std::env::var("QUESTIONNAIRE_LOG_FILE")
            .unwrap_or_else(|_| "./questionnaire.log".to_string())
            .into();

        let output = std::env::var("QUESTIONNAIRE_SUBMIT_OUTPUT").ok().map(PathBuf::from);
        let submit = SubmitConfig {
            format: parse_env_var("QUESTIONNAIRE_SUBMIT_FORMAT")?.unwrap_or(SubmitFormat::Json),
            pretty: parse_env_var("QUESTIONNAIRE_SUBMIT_PRETTY")?
                .unwrap_or_else(|| SubmitConfig::default_pretty(output.as_deref())),
            output,
        };

        Ok(Config { log_file, submit })
    }

    /// Get log file path as string
    pub fn log_file_str(&self) -> &str {
        self.log_file.to_str().unwrap_or("./questionnaire.log")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        check_parent_exists(&self.log_file, "Log file")?;
        if let Some(ref output) = self.submit.output {
            check_parent_exists(output, "Submission output")?;
            if output.is_dir() {
                return Err(anyhow::anyhow!(
                    "Submission output is a directory: {}",
                    output.display()
                ));
            }
        }
        Ok(())
    }

    /// Build the sink configured for submissions
    pub fn submit_sink(&self) -> Result<Box<dyn SubmitSink>> {
        match self.submit.output {
            Some(ref path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Cannot open submission output: {}", path.display()))?;
                // Appending to an existing table must not repeat the CSV header
                let is_new = file
                    .metadata()
                    .with_context(|| format!("Cannot inspect submission output: {}", path.display()))?
                    .len()
                    == 0;
                let sink = WriterSink::new(file, self.submit.format, &path.display().to_string())
                    .with_pretty(self.submit.pretty)
                    .with_header(is_new);
                Ok(Box::new(sink))
            }
            None => Ok(Box::new(LogSink)),
        }
    }
}

fn check_parent_exists(path: &Path, what: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(anyhow::anyhow!(
                "{} parent directory does not exist: {}",
                what,
                parent.display()
            ));
        }
    }
    Ok(())
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::Submission;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_env().unwrap();
        assert_eq!(config.log_file_str(), "./questionnaire.log");
        assert!(config.submit.output.is_none());
        assert_eq!(config.submit.format, SubmitFormat::Json);
        assert!(config.submit.pretty);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        // Should not fail for default paths
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_missing_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.submit.output = Some(temp_dir.path().join("missing").join("answers.json"));
        assert!(config.validate().is_err());

        config.submit.output = Some(temp_dir.path().to_path_buf());
        assert!(config.validate().is_err());

        config.submit.output = Some(temp_dir.path().join("answers.json"));
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_env_var_reports_variable() {
        std::env::set_var("QUESTIONNAIRE_TEST_BAD_BOOL", "maybe");
        let err = parse_env_var::<bool>("QUESTIONNAIRE_TEST_BAD_BOOL").unwrap_err();
        assert!(err.to_string().contains("QUESTIONNAIRE_TEST_BAD_BOOL"));

        std::env::set_var("QUESTIONNAIRE_TEST_FORMAT", "csv");
        let format = parse_env_var::<SubmitFormat>("QUESTIONNAIRE_TEST_FORMAT").unwrap();
        assert_eq!(format, Some(SubmitFormat::Csv));

        assert!(parse_env_var::<bool>("QUESTIONNAIRE_TEST_UNSET").unwrap().is_none());
    }

    #[test]
    fn test_file_sink_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("answers.csv");
        let config = Config {
            submit: SubmitConfig {
                output: Some(path.clone()),
                format: SubmitFormat::Csv,
                pretty: false,
            },
            ..Config::default()
        };

        let mut sink = config.submit_sink().unwrap();
        let fields = Arc::new(vec![crate::models::Field::new("First Name?")]);
        let submission = Submission::new(fields);
        sink.deliver(&submission).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!(
                "submitted_at,label,name,value\n{},First Name?,first_name,\n",
                submission.submitted_at.to_rfc3339()
            )
        );
        assert!(sink.describe().ends_with("(csv)"));
    }

    #[test]
    fn test_csv_file_stays_one_table_across_sinks() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("answers.csv");
        let config = Config {
            submit: SubmitConfig {
                output: Some(path.clone()),
                format: SubmitFormat::Csv,
                pretty: false,
            },
            ..Config::default()
        };

        let mut editor = crate::editor::FieldListEditor::new();
        // Same sink twice, then a fresh sink reopening the file
        let mut sink = config.submit_sink().unwrap();
        sink.deliver(&editor.submit()).unwrap();
        editor.set_value(0, "Ada");
        sink.deliver(&editor.submit()).unwrap();
        drop(sink);
        config.submit_sink().unwrap().deliver(&editor.submit()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(vec!["submitted_at", "label", "name", "value"])
        );
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(&row[1], "First Name?");
            assert_eq!(&row[2], "first_name");
        }
        assert_eq!(&rows[0][3], "");
        assert_eq!(&rows[1][3], "Ada");
        assert_eq!(&rows[2][3], "Ada");
    }

    #[test]
    fn test_file_output_defaults_to_one_json_document_per_line() {
        assert!(SubmitConfig::default_pretty(None));
        assert!(!SubmitConfig::default_pretty(Some(Path::new("answers.jsonl"))));

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("answers.jsonl");
        let config = Config {
            submit: SubmitConfig {
                pretty: SubmitConfig::default_pretty(Some(path.as_path())),
                output: Some(path.clone()),
                format: SubmitFormat::Json,
            },
            ..Config::default()
        };

        let editor = crate::editor::FieldListEditor::new();
        let mut sink = config.submit_sink().unwrap();
        sink.deliver(&editor.submit()).unwrap();
        sink.deliver(&editor.submit()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(parsed["fields"][0]["name"], "first_name");
        }
    }
}
