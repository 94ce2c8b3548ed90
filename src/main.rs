use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hotel_xml::{
    Cli, Config, ConfigManager, Error, ErrorReporter, HttpClientConfig, Output, SourceLoader,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let config = match ConfigManager::load_config(&cli).await {
        Ok(config) => config,
        Err(error) => {
            ErrorReporter::new(cli_verbosity(&cli)).report_config_error(&error);
            return ExitCode::from(2);
        }
    };

    let verbosity = config.verbosity();
    init_tracing(verbosity.filter_directive());

    match execute(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let reporter = ErrorReporter::new(verbosity);
            match error.downcast_ref::<Error>() {
                Some(error) => reporter.report_error(error),
                None => eprintln!("Error: {:#}", error),
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        xml = %config.endpoints.xml_url,
        xml_error = %config.endpoints.xml_error_url,
        xsd = %config.endpoints.xsd_url,
        "starting"
    );

    let loader = SourceLoader::with_config(HttpClientConfig::from(&config.network))
        .context("Failed to create HTTP client")?;
    let mut output = Output::stdout();

    hotel_xml::run(&loader, &config.endpoints, &mut output).await?;
    Ok(())
}

fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn cli_verbosity(cli: &Cli) -> hotel_xml::VerbosityLevel {
    ConfigManager::merge_with_cli(Config::default(), cli).verbosity()
}
