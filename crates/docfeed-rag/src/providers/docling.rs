//! Document conversion via a docling-serve compatible HTTP service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::providers::converter::DocumentConverter;

/// HTTP client for a docling-serve conversion endpoint
pub struct DoclingConverter {
    client: Client,
    config: ConverterConfig,
}

#[derive(Deserialize)]
struct ConvertResponse {
    document: ConvertedDocument,
}

#[derive(Deserialize)]
struct ConvertedDocument {
    #[serde(default)]
    md_content: Option<String>,
    #[serde(default)]
    text_content: Option<String>,
}

impl DoclingConverter {
    /// Create a new converter client with a bounded request timeout
    pub fn new(config: &ConverterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl DocumentConverter for DoclingConverter {
    async fn convert(&self, filename: &str, data: &[u8]) -> Result<String> {
        let url = format!("{}/v1alpha/convert/file", self.config.url);

        let form = reqwest::multipart::Form::new().part(
            "files",
            reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string()),
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::conversion(filename, format!("Conversion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::conversion(
                filename,
                format!("Conversion failed: HTTP {} - {}", status, body),
            ));
        }

        let body: ConvertResponse = response.json().await.map_err(|e| {
            Error::conversion(filename, format!("Failed to parse conversion response: {}", e))
        })?;

        let text = body
            .document
            .md_content
            .or(body.document.text_content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::conversion(
                filename,
                "Conversion produced no text content",
            ));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "docling"
    }
}
