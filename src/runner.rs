//! Program flow: validate the conformant document, validate the faulty one,
//! then convert the conformant one to JSON.

use std::io::Write;

use crate::config::EndpointConfig;
use crate::converter::Converter;
use crate::document_loader::DocumentFetcher;
use crate::error::Result;
use crate::output::Output;
use crate::validator::Validator;

/// Run the three steps in order, printing each result as soon as it is ready
///
/// # Errors
///
/// Stops at the first propagated failure: an unusable schema, or a
/// conformant document that cannot be fetched or parsed for conversion.
pub async fn run<F, W>(fetcher: &F, endpoints: &EndpointConfig, output: &mut Output<W>) -> Result<()>
where
    F: DocumentFetcher + ?Sized,
    W: Write,
{
    let validator = Validator::new(fetcher);

    let report = validator
        .validate(&endpoints.xml_url, &endpoints.xsd_url)
        .await?;
    output.valid_result(&report)?;

    let report = validator
        .validate(&endpoints.xml_error_url, &endpoints.xsd_url)
        .await?;
    output.faulty_result(&report)?;

    let json = Converter::new(fetcher)
        .xml_to_json(&endpoints.xml_url)
        .await?;
    output.json_result(&json)?;

    Ok(())
}
