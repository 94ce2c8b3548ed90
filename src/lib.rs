//! # hotel-xml Library
//!
//! Validates hotel listing XML documents against an XSD and converts them to
//! a fixed JSON shape.

pub mod cli;
pub mod config;
pub mod converter;
pub mod document_loader;
pub mod error;
pub mod error_reporter;
pub mod http_client;
pub mod libxml2;
pub mod output;
pub mod runner;
pub mod validator;

pub use cli::{Cli, VerbosityLevel};
pub use config::{Config, ConfigError, ConfigManager, EndpointConfig};
pub use converter::{Converter, HotelsDocument, convert_bytes, convert_str};
pub use document_loader::{DocumentFetcher, DocumentSource, SourceLoader};
pub use error::{Error, Result};
pub use error_reporter::ErrorReporter;
pub use http_client::{AsyncHttpClient, HttpClientConfig};
pub use libxml2::{LibXml2Wrapper, ValidationResult, XmlSchemaPtr};
pub use output::Output;
pub use runner::run;
pub use validator::{ReportEntry, ValidationError, ValidationReport, Validator};
