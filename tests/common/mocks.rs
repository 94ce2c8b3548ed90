use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hotel_xml::{DocumentFetcher, Error, Result};

/// Serves documents from memory and records every locator it was asked for
#[derive(Default)]
pub struct InMemoryFetcher {
    documents: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, locator: &str, content: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(locator.to_string(), content.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for InMemoryFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(locator.to_string());
        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: locator.to_string(),
                status: 404,
                message: "HTTP 404: Not Found".to_string(),
            })
    }
}
