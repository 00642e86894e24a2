//! HTTP gateway to the document/chat backend.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Method, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::TransportError,
    protocol::{
        ChatRequest, ChatResponse, DeleteAck, ErrorDetail, FilesResponse, HealthResponse,
        UploadAck,
    },
};
use tracing::{debug, info, warn};
use url::Url;

pub type TransportResult<T> = Result<T, TransportError>;

/// Multipart field name the backend reads the uploaded file from.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait DocumentGateway: Send + Sync {
    async fn list_documents(&self) -> TransportResult<Vec<String>>;
    async fn upload_document(&self, upload: DocumentUpload) -> TransportResult<UploadAck>;
    async fn ask_question(&self, question: &str) -> TransportResult<String>;
    async fn delete_all_documents(&self) -> TransportResult<DeleteAck>;
    async fn health(&self) -> TransportResult<String>;
}

pub struct HttpGateway {
    http: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn with_client(http: Client, base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> TransportResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::Request {
                endpoint: path.to_string(),
                message: format!("invalid endpoint url: {e}"),
            })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send,
    ) -> TransportResult<(String, Response)> {
        let label = format!("{method} /{}", path.trim_start_matches('/'));
        let url = self.endpoint(path)?;
        debug!(endpoint = %label, %url, "gateway: sending request");
        let response = build(self.http.request(method, url))
            .send()
            .await
            .map_err(|e| TransportError::Network {
                endpoint: label.clone(),
                message: e.to_string(),
            })?;
        Ok((label, response))
    }
}

#[async_trait]
impl DocumentGateway for HttpGateway {
    async fn list_documents(&self) -> TransportResult<Vec<String>> {
        let (label, response) = self.send(Method::GET, "files", |req| req).await?;
        let body: FilesResponse = decode(&label, response).await?;
        debug!(count = body.files.len(), "gateway: document listing received");
        Ok(body.files)
    }

    async fn upload_document(&self, upload: DocumentUpload) -> TransportResult<UploadAck> {
        let filename = upload.filename.clone();
        let mut part = Part::bytes(upload.bytes).file_name(upload.filename);
        if let Some(mime_type) = upload.mime_type.as_deref() {
            part = part
                .mime_str(mime_type)
                .map_err(|e| TransportError::Request {
                    endpoint: "POST /upload".to_string(),
                    message: format!("invalid mime type '{mime_type}': {e}"),
                })?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        let (label, response) = self
            .send(Method::POST, "upload", |req| req.multipart(form))
            .await?;
        let ack: UploadAck = decode(&label, response).await?;
        if !ack.is_success() {
            let message = ack
                .message
                .unwrap_or_else(|| "document was not ingested".to_string());
            warn!(filename = %filename, %message, "gateway: upload rejected by backend");
            return Err(TransportError::Rejected {
                endpoint: label,
                message,
            });
        }
        info!(filename = %filename, "gateway: upload accepted");
        Ok(ack)
    }

    async fn ask_question(&self, question: &str) -> TransportResult<String> {
        let request = ChatRequest {
            question: question.to_string(),
        };
        let (label, response) = self
            .send(Method::POST, "chat", |req| req.json(&request))
            .await?;
        let body: ChatResponse = decode(&label, response).await?;
        Ok(body.answer)
    }

    async fn delete_all_documents(&self) -> TransportResult<DeleteAck> {
        let (label, response) = self.send(Method::DELETE, "files", |req| req).await?;
        let ack: DeleteAck = decode(&label, response).await?;
        info!(message = %ack.message, "gateway: documents cleared");
        Ok(ack)
    }

    async fn health(&self) -> TransportResult<String> {
        let (label, response) = self.send(Method::GET, "", |req| req).await?;
        let body: HealthResponse = decode(&label, response).await?;
        Ok(body.message)
    }
}

async fn decode<T: DeserializeOwned>(label: &str, response: Response) -> TransportResult<T> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ErrorDetail>()
            .await
            .ok()
            .map(|body| body.detail);
        return Err(TransportError::Status {
            endpoint: label.to_string(),
            status: status.as_u16(),
            detail,
        });
    }

    response.json::<T>().await.map_err(|e| TransportError::Decode {
        endpoint: label.to_string(),
        message: e.to_string(),
    })
}

/// Parses the backend address and makes sure relative endpoint joins keep any
/// path prefix (`http://host/api` must resolve `files` to `/api/files`).
pub fn normalize_base_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(anyhow!("backend url must not be empty"));
    }
    let mut url = Url::parse(raw).with_context(|| format!("invalid backend url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "backend url '{raw}' must use http or https, got '{}'",
            url.scheme()
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
