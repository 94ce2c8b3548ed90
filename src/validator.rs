//! Schema Validation
//!
//! Validates a document against an XSD and turns everything that goes wrong
//! while reading the document into an ordered [`ValidationReport`]:
//!
//! - **Schema phase**: fetching or compiling the schema fails with an
//!   [`Error`] that propagates to the caller.
//! - **Document phase**: fetch failures, well-formedness failures and schema
//!   violations are recorded as report entries and never propagate. The
//!   document is validated while it is parsed, so violations found before a
//!   well-formedness failure are reported ahead of it.
//!
//! Every call builds its own report, so repeated calls never see each
//! other's errors.

use std::fmt;

use crate::document_loader::DocumentFetcher;
use crate::error::{Error, LibXml2Error, Result};
use crate::libxml2::{LibXml2Wrapper, StructuredError, ValidationResult, XmlSchemaPtr};

/// Rendering of a report with no entries
pub const NO_ERROR: &str = "No Error";

/// Separator between entries of a rendered report
pub const ENTRY_SEPARATOR: &str = " | ";

/// A schema violation found while reading the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub line: i32,
    pub column: i32,
    pub message: String,
}

impl From<StructuredError> for ValidationError {
    fn from(error: StructuredError) -> Self {
        ValidationError {
            line: error.line,
            column: error.column,
            message: error.message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, Pos {}: {}", self.line, self.column, self.message)
    }
}

/// One entry of a validation report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// The document broke a schema rule
    Violation(ValidationError),
    /// The document is not well-formed XML; reading stopped here
    WellFormedness(String),
    /// Anything else that went wrong while fetching or reading the document
    Unhandled(String),
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEntry::Violation(error) => error.fmt(f),
            ReportEntry::WellFormedness(message) => {
                write!(f, "XML well-formedness error: {}", message)
            }
            ReportEntry::Unhandled(message) => write!(f, "Unhandled exception: {}", message),
        }
    }
}

/// Ordered outcome of validating one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: Vec<ReportEntry>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Record a document-phase failure under the matching entry kind
    pub fn record_failure(&mut self, error: Error) {
        if error.is_fetch_error() {
            tracing::warn!(error = %error, "document could not be fetched");
        } else {
            tracing::warn!(error = %error, "document could not be read");
        }
        let entry = match error {
            Error::MalformedXml { message, .. } => ReportEntry::WellFormedness(message),
            other => ReportEntry::Unhandled(other.to_string()),
        };
        self.entries.push(entry);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str(NO_ERROR);
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(ENTRY_SEPARATOR)?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Validates documents against schemas retrieved through a [`DocumentFetcher`]
pub struct Validator<'a, F: DocumentFetcher + ?Sized> {
    fetcher: &'a F,
    libxml2: LibXml2Wrapper,
}

impl<'a, F: DocumentFetcher + ?Sized> Validator<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            libxml2: LibXml2Wrapper::new(),
        }
    }

    /// Validate the document at `xml_locator` against the schema at
    /// `xsd_locator`, rendering the report as `"No Error"` or the joined
    /// entries
    pub async fn validate(&self, xml_locator: &str, xsd_locator: &str) -> Result<String> {
        self.validate_report(xml_locator, xsd_locator)
            .await
            .map(|report| report.to_string())
    }

    /// Validate and return the structured report
    ///
    /// # Errors
    ///
    /// Fails only when the schema cannot be fetched or compiled.
    pub async fn validate_report(
        &self,
        xml_locator: &str,
        xsd_locator: &str,
    ) -> Result<ValidationReport> {
        let schema_data = self.fetcher.fetch(xsd_locator).await?;
        let schema = self.compile_schema(xsd_locator, &schema_data)?;

        let mut report = ValidationReport::new();
        match self.fetcher.fetch(xml_locator).await {
            Ok(document) => self.check_document(&schema, &document, &mut report),
            Err(error) => report.record_failure(error),
        }

        tracing::info!(
            document = xml_locator,
            schema = xsd_locator,
            errors = report.len(),
            "validation finished"
        );
        Ok(report)
    }

    /// Validate already-fetched content with the same phase rules
    pub fn validate_bytes(&self, xml: &[u8], xsd: &[u8]) -> Result<ValidationReport> {
        let schema = self.compile_schema("<memory>", xsd)?;
        let mut report = ValidationReport::new();
        self.check_document(&schema, xml, &mut report);
        Ok(report)
    }

    fn compile_schema(&self, origin: &str, data: &[u8]) -> Result<XmlSchemaPtr> {
        tracing::debug!(schema = origin, bytes = data.len(), "compiling schema");
        self.libxml2
            .parse_schema_from_memory(data)
            .map_err(|error| match error {
                LibXml2Error::SchemaParseFailed { details } => Error::SchemaParsing {
                    url: origin.to_string(),
                    details,
                },
                other => Error::from(other),
            })
    }

    fn check_document(&self, schema: &XmlSchemaPtr, data: &[u8], report: &mut ValidationReport) {
        let result = match self.libxml2.validate_stream(schema, data) {
            Ok(result) => result,
            Err(error) => return report.record_failure(error.into()),
        };

        if matches!(&result, ValidationResult::Invalid { errors } if errors.is_empty()) {
            report.push(ReportEntry::Violation(ValidationError {
                line: 0,
                column: 0,
                message: "The document does not conform to the schema.".to_string(),
            }));
        }
        for error in result.errors() {
            report.push(ReportEntry::Violation(error.clone().into()));
        }

        if let ValidationResult::NotWellFormed { cause, .. } = result {
            report.record_failure(Error::MalformedXml {
                message: cause.message,
                line: cause.line,
                column: cause.column,
            });
        }
    }
}
