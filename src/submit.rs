//! Submission of the current form state to an external sink
//!
//! Submitting never changes the form. A [`Submission`] shares the editor's
//! snapshot of the field list and is handed to a [`SubmitSink`], which decides
//! where it goes: the log, stdout, or a file.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::FormError;
use crate::models::Field;

/// The form state at the moment of submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub submitted_at: DateTime<Local>,
    pub fields: Arc<Vec<Field>>,
}

impl Submission {
    pub fn new(fields: Arc<Vec<Field>>) -> Self {
        Self {
            submitted_at: Local::now(),
            fields,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Encoding used by [`WriterSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitFormat {
    Json,
    Csv,
}

impl SubmitFormat {
    pub fn as_str(&self) -> &str {
        match self {
            SubmitFormat::Json => "json",
            SubmitFormat::Csv => "csv",
        }
    }
}

impl FromStr for SubmitFormat {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(SubmitFormat::Json),
            "csv" => Ok(SubmitFormat::Csv),
            _ => Err(FormError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SubmitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for submitted forms
pub trait SubmitSink {
    /// Deliver one submission
    fn deliver(&mut self, submission: &Submission) -> Result<(), FormError>;

    /// Short description shown to the user after a successful delivery
    fn describe(&self) -> String;
}

/// Sink that reports submissions through `tracing`
#[derive(Debug, Default)]
pub struct LogSink;

impl SubmitSink for LogSink {
    fn deliver(&mut self, submission: &Submission) -> Result<(), FormError> {
        info!(
            fields = submission.len(),
            submitted_at = %submission.submitted_at.to_rfc3339(),
            "Form submitted"
        );
        for (index, field) in submission.fields.iter().enumerate() {
            debug!(
                index,
                label = %field.label,
                name = %field.name,
                value = %field.value,
                "Submitted field"
            );
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "log".to_string()
    }
}

/// Columns of CSV output; rows of one submission share `submitted_at`
pub const CSV_HEADER: [&str; 4] = ["submitted_at", "label", "name", "value"];

/// Sink that encodes submissions onto a writer
///
/// JSON output is one document per submission. CSV output carries a single
/// header, so several submissions form one valid table.
pub struct WriterSink<W: Write> {
    writer: W,
    format: SubmitFormat,
    pretty: bool,
    /// CSV header still to be written before the next row
    header_pending: bool,
    target: String,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: SubmitFormat, target: &str) -> Self {
        Self {
            writer,
            format,
            pretty: true,
            header_pending: true,
            target: target.to_string(),
        }
    }

    /// Choose between indented and single-line JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Whether the CSV header still has to be written; `false` when
    /// appending to output that already starts with one
    pub fn with_header(mut self, header: bool) -> Self {
        self.header_pending = header;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_json(&mut self, submission: &Submission) -> Result<(), FormError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, submission)?;
        } else {
            serde_json::to_writer(&mut self.writer, submission)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_csv(&mut self, submission: &Submission) -> Result<(), FormError> {
        let submitted_at = submission.submitted_at.to_rfc3339();
        let mut csv_writer = csv::Writer::from_writer(&mut self.writer);
        if self.header_pending {
            csv_writer.write_record(CSV_HEADER)?;
        }
        for field in submission.fields.iter() {
            csv_writer.write_record([&submitted_at, &field.label, &field.name, &field.value])?;
        }
        csv_writer.flush()?;
        drop(csv_writer);
        self.header_pending = false;
        Ok(())
    }
}

impl<W: Write> SubmitSink for WriterSink<W> {
    fn deliver(&mut self, submission: &Submission) -> Result<(), FormError> {
        match self.format {
            SubmitFormat::Json => self.write_json(submission)?,
            SubmitFormat::Csv => self.write_csv(submission)?,
        }
        self.writer.flush()?;
        info!(
            fields = submission.len(),
            format = %self.format,
            target = %self.target,
            "Submission written"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.target, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> Arc<Vec<Field>> {
        Arc::new(vec![
            Field::new("First Name?").with_value("Ada"),
            Field::new("Favourite number, please").with_value("7, obviously"),
        ])
    }

    #[test]
    fn test_submit_format_parsing() {
        assert_eq!("json".parse::<SubmitFormat>().unwrap(), SubmitFormat::Json);
        assert_eq!(" CSV ".parse::<SubmitFormat>().unwrap(), SubmitFormat::Csv);
        assert!(matches!(
            "xml".parse::<SubmitFormat>(),
            Err(FormError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_compact_json_output() {
        let submission = Submission::new(sample_fields());
        let mut sink = WriterSink::new(Vec::new(), SubmitFormat::Json, "memory").with_pretty(false);
        sink.deliver(&submission).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["submitted_at"].is_string());
        assert_eq!(parsed["fields"][0]["name"], "first_name");
        assert_eq!(parsed["fields"][0]["value"], "Ada");
        assert_eq!(parsed["fields"][1]["name"], "favourite_number_please");
        assert!(parsed["fields"][0].get("id").is_none());
    }

    #[test]
    fn test_csv_output_quotes_commas() {
        let submission = Submission::new(sample_fields());
        let mut sink = WriterSink::new(Vec::new(), SubmitFormat::Csv, "memory");
        sink.deliver(&submission).unwrap();

        let stamp = submission.submitted_at.to_rfc3339();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "submitted_at,label,name,value");
        assert_eq!(lines[1], format!("{},First Name?,first_name,Ada", stamp));
        assert_eq!(
            lines[2],
            format!(
                "{},\"Favourite number, please\",favourite_number_please,\"7, obviously\"",
                stamp
            )
        );
    }

    #[test]
    fn test_empty_submission_is_delivered() {
        let submission = Submission::new(Arc::new(Vec::new()));
        assert!(submission.is_empty());

        let mut json_sink = WriterSink::new(Vec::new(), SubmitFormat::Json, "memory");
        json_sink.deliver(&submission).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_slice(&json_sink.into_inner()).unwrap();
        assert_eq!(parsed["fields"], serde_json::json!([]));

        let mut csv_sink = WriterSink::new(Vec::new(), SubmitFormat::Csv, "memory");
        csv_sink.deliver(&submission).unwrap();
        assert_eq!(
            String::from_utf8(csv_sink.into_inner()).unwrap(),
            "submitted_at,label,name,value\n"
        );

        LogSink.deliver(&submission).unwrap();
    }

    #[test]
    fn test_file_sink_appends() {
        use std::fs::OpenOptions;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("answers.jsonl");

        for _ in 0..2 {
            let file = OpenOptions::new().create(true).append(true).open(&path).unwrap();
            let mut sink = WriterSink::new(file, SubmitFormat::Json, "answers.jsonl").with_pretty(false);
            sink.deliver(&Submission::new(sample_fields())).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_csv_header_written_once_per_sink() {
        let mut sink = WriterSink::new(Vec::new(), SubmitFormat::Csv, "memory");
        let first = Submission::new(sample_fields());
        let second = Submission::new(Arc::new(vec![Field::new("Age").with_value("42")]));
        sink.deliver(&first).unwrap();
        sink.deliver(&second).unwrap();

        let output = sink.into_inner();
        let mut reader = csv::Reader::from_reader(output.as_slice());
        assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(CSV_HEADER.to_vec()));
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][2], "first_name");
        assert_eq!(&rows[2][1], "Age");
        assert_eq!(&rows[2][0], second.submitted_at.to_rfc3339());
        assert!(rows.iter().all(|row| &row[1] != "label"));
    }

    #[test]
    fn test_csv_without_header_appends_rows_only() {
        let mut sink = WriterSink::new(Vec::new(), SubmitFormat::Csv, "memory").with_header(false);
        sink.deliver(&Submission::new(sample_fields())).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(!output.contains("submitted_at"));
    }

    #[test]
    fn test_sink_descriptions() {
        assert_eq!(LogSink.describe(), "log");
        let sink = WriterSink::new(Vec::new(), SubmitFormat::Csv, "stdout");
        assert_eq!(sink.describe(), "stdout (csv)");
    }
}
