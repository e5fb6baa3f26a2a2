use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{AnalysisBackend, BackendError, Upload};
use crate::assessment::AnalysisResult;

/// Analysis backend reached over HTTP.
///
/// Documents are posted as multipart field `file` to `<base>/api/upload`;
/// the response body must be an `AnalysisResult` in JSON.
pub struct HttpBackend {
    client: reqwest::Client,
    upload_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(timeout)?,
            upload_url: upload_url(base_url)?,
        })
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, BackendError> {
    let mut builder = reqwest::Client::builder().user_agent("dpr-assessor");
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Resolve the upload endpoint under `base_url`, with or without a trailing slash.
pub fn upload_url(base_url: &str) -> Result<Url, BackendError> {
    let joined = format!("{}/api/upload", base_url.trim_end_matches('/'));
    let url = Url::parse(&joined).map_err(|_| BackendError::InvalidUrl(base_url.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(BackendError::InvalidUrl(base_url.to_string())),
    }
}

/// Decode and validate a backend response body.
pub fn decode_payload(body: &str) -> Result<AnalysisResult, BackendError> {
    let result: AnalysisResult = serde_json::from_str(body)?;
    result.validate()?;
    Ok(result)
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, upload), fields(url = %self.upload_url, filename = %upload.filename, size = upload.size()))]
    async fn analyze(&self, upload: &Upload) -> Result<AnalysisResult, BackendError> {
        let part = Part::bytes(upload.bytes.clone()).file_name(upload.filename.clone());
        let form = Form::new().part("file", part);

        debug!("posting document to analysis backend");
        let body = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(body_bytes = body.len(), "received analysis payload");

        decode_payload(&body)
    }
}
