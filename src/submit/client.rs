use crate::submit::response::{parse_response, RecognitionEntry};
use anyhow::{bail, Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use std::time::Duration;

/// Transport seam between the widget and the recognition service. The GUI
/// only ever talks to this trait, so tests can substitute a canned backend.
pub trait Recognizer: Send + Sync {
    fn analyze(&self, png: &[u8]) -> Result<Vec<RecognitionEntry>>;
}

/// Uploads the canvas snapshot to the recognition endpoint as a multipart
/// form with a single `file` field.
pub struct HttpRecognizer {
    client: Client,
    endpoint: String,
}

impl HttpRecognizer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("sketch_calc uploader")
            .build()
            .context("build recognition http client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Recognizer for HttpRecognizer {
    fn analyze(&self, png: &[u8]) -> Result<Vec<RecognitionEntry>> {
        let part = Part::bytes(png.to_vec())
            .file_name("canvas.png")
            .mime_str("image/png")
            .context("build multipart image part")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .with_context(|| format!("post sketch to {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            bail!("recognition endpoint returned {status}");
        }
        let body = response.bytes().context("read recognition response body")?;
        parse_response(&body)
    }
}
