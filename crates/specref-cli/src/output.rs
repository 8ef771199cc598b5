//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable).

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use specref_core::loader::Reference;
use specref_core::Format;
use std::collections::BTreeSet;
use std::io::{self, Write};
use tracing::debug;

/// Trait for formatting output with support for the resolver's results
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a resolved document; human output keeps the source format
    fn format_document(&self, document: &Value, source: Format) -> Result<String>;

    /// Format the set of references found in a document
    fn format_references(&self, references: &BTreeSet<String>, use_color: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_document(&self, document: &Value, source: Format) -> Result<String> {
        match (self, source) {
            (OutputFormat::Human, Format::Yaml) => Ok(serde_yaml::to_string(document)?),
            _ => self.format(document),
        }
    }

    fn format_references(&self, references: &BTreeSet<String>, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_references_human(references, use_color)),
            _ => self.format(references),
        }
    }
}

fn format_references_human(references: &BTreeSet<String>, use_color: bool) -> String {
    if references.is_empty() {
        return "No references found\n".to_string();
    }

    let mut output = format!("{} reference(s)\n", references.len());
    for kind in ["local", "file", "remote"] {
        let group: Vec<&String> = references
            .iter()
            .filter(|raw| Reference::classify(raw).kind() == kind)
            .collect();
        if group.is_empty() {
            continue;
        }

        let title = format!("{} ({})", kind, group.len());
        if use_color {
            output.push_str(&format!("\n{}\n", title.bold()));
        } else {
            output.push_str(&format!("\n{}\n", title));
        }
        for raw in group {
            output.push_str(&format!("  • {}\n", raw));
        }
    }
    output
}

/// Output writer that handles different output formats and colors
///
/// Results go to the main writer; status messages go to a separate one
/// so that piped output stays a valid document.
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
    status: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a writer on stdout, with status messages on stderr
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writers(
            format,
            use_color,
            quiet,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    /// Create an output writer with custom writers
    pub fn with_writers(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
        status: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
            status,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output, ending with a newline
    pub fn write(&mut self, content: &str) -> Result<()> {
        if content.ends_with('\n') {
            write!(self.writer, "{}", content)?;
        } else {
            writeln!(self.writer, "{}", content)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let line = if self.use_color {
            format!("{} {}", "ℹ".blue(), message)
        } else {
            format!("INFO: {}", message)
        };
        writeln!(self.status, "{}", line)?;
        Ok(())
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let line = if self.use_color {
            message.green().to_string()
        } else {
            message.to_string()
        };
        writeln!(self.status, "{}", line)?;
        Ok(())
    }

    /// Write a resolved document
    pub fn document(&mut self, document: &Value, source: Format) -> Result<()> {
        let content = self.format.format_document(document, source)?;
        self.write(&content)
    }

    /// Write a reference listing
    pub fn references(&mut self, references: &BTreeSet<String>) -> Result<()> {
        let content = self.format.format_references(references, self.use_color)?;
        self.write(&content)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Writer sharing its buffer with the test
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn test_writer(format: OutputFormat) -> (OutputWriter, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let status = SharedBuffer::default();
        let writer = OutputWriter::with_writers(
            format,
            false,
            false,
            Box::new(out.clone()),
            Box::new(status.clone()),
        );
        (writer, out, status)
    }

    #[test]
    fn test_document_formats() {
        let document = json!({"type": "object"});

        let json = OutputFormat::Json.format_document(&document, Format::Yaml).unwrap();
        assert_eq!(json, r#"{"type":"object"}"#);

        let human_yaml = OutputFormat::Human.format_document(&document, Format::Yaml).unwrap();
        assert_eq!(human_yaml, "type: object\n");

        let human_json = OutputFormat::Human.format_document(&document, Format::Json).unwrap();
        assert!(human_json.contains("\"type\": \"object\""));
    }

    #[test]
    fn test_references_human() {
        let references: BTreeSet<String> = [
            "#/components/schemas/User",
            "common.yaml#/Id",
            "https://example.com/tag.json",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let output = OutputFormat::Human
            .format_references(&references, false)
            .unwrap();
        assert!(output.starts_with("3 reference(s)"));
        assert!(output.contains("local (1)"));
        assert!(output.contains("  • common.yaml#/Id"));
        assert!(output.contains("remote (1)"));

        let empty = OutputFormat::Human
            .format_references(&BTreeSet::new(), false)
            .unwrap();
        assert_eq!(empty, "No references found\n");
    }

    #[test]
    fn test_references_json() {
        let references: BTreeSet<String> = ["#/a".to_string()].into();
        let output = OutputFormat::Json.format_references(&references, false).unwrap();
        assert_eq!(output, r##"["#/a"]"##);
    }

    #[test]
    fn test_status_messages_stay_off_the_document() {
        let (mut writer, out, status) = test_writer(OutputFormat::Human);
        writer.info("Resolving spec.yaml").unwrap();
        writer.write("{}").unwrap();

        assert_eq!(out.contents(), "{}\n");
        assert_eq!(status.contents(), "INFO: Resolving spec.yaml\n");

        let (mut writer, _out, status) = test_writer(OutputFormat::Json);
        writer.success("done").unwrap();
        assert!(status.contents().is_empty());
    }
}
