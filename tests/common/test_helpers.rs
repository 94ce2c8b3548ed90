use std::path::PathBuf;

use hotel_xml::EndpointConfig;

use super::mocks::InMemoryFetcher;

pub const XML_URL: &str = "https://hotels.test/Hotels.xml";
pub const XML_ERROR_URL: &str = "https://hotels.test/HotelsErrors.xml";
pub const XSD_URL: &str = "https://hotels.test/Hotels.xsd";

/// Test fixture paths
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    pub fn hotels_xml(&self) -> PathBuf {
        self.fixtures_dir.join("Hotels.xml")
    }

    pub fn hotels_errors_xml(&self) -> PathBuf {
        self.fixtures_dir.join("HotelsErrors.xml")
    }

    pub fn hotels_xsd(&self) -> PathBuf {
        self.fixtures_dir.join("Hotels.xsd")
    }

    pub fn read(&self, path: PathBuf) -> Vec<u8> {
        std::fs::read(path).unwrap()
    }

    /// Endpoints pointing at the fixture files on disk
    pub fn local_endpoints(&self) -> EndpointConfig {
        EndpointConfig {
            xml_url: self.hotels_xml().display().to_string(),
            xml_error_url: self.hotels_errors_xml().display().to_string(),
            xsd_url: self.hotels_xsd().display().to_string(),
        }
    }

    /// A fetcher serving the fixtures under the `hotels.test` URLs
    pub fn remote_fetcher(&self) -> InMemoryFetcher {
        InMemoryFetcher::new()
            .with_document(XML_URL, self.read(self.hotels_xml()))
            .with_document(XML_ERROR_URL, self.read(self.hotels_errors_xml()))
            .with_document(XSD_URL, self.read(self.hotels_xsd()))
    }

    pub fn remote_endpoints(&self) -> EndpointConfig {
        EndpointConfig {
            xml_url: XML_URL.to_string(),
            xml_error_url: XML_ERROR_URL.to_string(),
            xsd_url: XSD_URL.to_string(),
        }
    }
}
