//! Error presentation on stderr, shaped by the verbosity level

use crate::cli::VerbosityLevel;
use crate::config::ConfigError;
use crate::error::Error;

/// Error reporter with configurable verbosity
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    /// Create a new error reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: verbosity == VerbosityLevel::Debug,
        }
    }

    pub fn with_timestamps(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    /// Report an error that stopped the run
    pub fn report_error(&self, error: &Error) {
        eprintln!("{}", self.format_error(error));
    }

    /// Report a configuration error
    pub fn report_config_error(&self, error: &ConfigError) {
        eprintln!("{}", self.format_config_error(error));
    }

    pub fn format_error(&self, error: &Error) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("ERROR: {}", error),
            VerbosityLevel::Normal => self.format_error_normal(error),
            VerbosityLevel::Verbose => self.format_error_verbose(error),
            VerbosityLevel::Debug => self.format_error_debug(error),
        }
    }

    pub fn format_config_error(&self, error: &ConfigError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("Config error: {}", error),
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                format!(
                    "Configuration Error: {}\n{}",
                    error,
                    self.get_config_help(error)
                )
            }
            VerbosityLevel::Debug => {
                format!(
                    "Configuration Error: {}\nDebug: {:?}\n{}",
                    error,
                    error,
                    self.get_config_help(error)
                )
            }
        }
    }

    fn format_error_normal(&self, error: &Error) -> String {
        let timestamp = if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        };

        format!("{}Error: {}", timestamp, error)
    }

    fn format_error_verbose(&self, error: &Error) -> String {
        let mut output = self.format_error_normal(error);

        match error {
            Error::Http(_) | Error::Timeout { .. } => {
                output.push_str("\nSuggestion: Check network connectivity and URL validity");
            }
            Error::HttpStatus { url, .. } => {
                output.push_str(&format!(
                    "\nSuggestion: Verify the document is published at: {}",
                    url
                ));
            }
            Error::LocalRead { path, .. } => {
                output.push_str(&format!(
                    "\nSuggestion: Check that {} exists and is readable",
                    path.display()
                ));
            }
            Error::SchemaParsing { .. } => {
                output.push_str("\nSuggestion: Check that the xsdURL entry points to an XSD");
            }
            Error::MalformedXml { line, column, .. } => {
                output.push_str(&format!("\nLocation: line {}, column {}", line, column));
            }
            _ => {}
        }

        output
    }

    fn format_error_debug(&self, error: &Error) -> String {
        let mut output = self.format_error_verbose(error);
        output.push_str(&format!("\nDebug Info: {:?}", error));

        output.push_str("\nError Chain:");
        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }

    /// Get helpful suggestions for configuration errors
    fn get_config_help(&self, error: &ConfigError) -> String {
        match error {
            ConfigError::Io(_) => "Check that the configuration file exists and is readable".to_string(),
            ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
                "Check the configuration file syntax (TOML/JSON format expected)".to_string()
            }
            ConfigError::UnsupportedFormat(ext) => {
                format!("Rename the configuration file from .{} to .toml or .json", ext)
            }
            ConfigError::Environment(_) => {
                "Fix or unset the HOTEL_XML_* environment variable".to_string()
            }
            ConfigError::Validation(_) => {
                "Fix the value in the configuration file, environment, or command line".to_string()
            }
        }
    }
}
