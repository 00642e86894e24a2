use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Full document listing returned by `GET /files`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Body returned by `POST /upload`.
///
/// The backend answers `200` with `status: error` when it could not extract any
/// text from the PDF, so success of the HTTP call alone does not mean the
/// document was ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAck {
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadAck {
    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: String,
}

/// Error body produced by the backend on non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
