//! Typed client for the backend analyze / generate / history API.
//!
//! The backend is an external collaborator consumed only through its
//! documented envelope shape: `{code, message, data}` with `code == 200`
//! signaling success. Failures are classified at this boundary into the
//! three user-facing causes ([`ApiError`]); nothing is retried
//! automatically — retry is always a manual user action.

use std::time::Duration;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::template::Template;

/// Analysis can legitimately take a while; bound it instead of assuming
/// it is instant.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Toggles sent with an analyze request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeConfig {
    pub enable_ai: bool,
    pub enable_ocr: bool,
    pub enable_cv: bool,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        AnalyzeConfig {
            enable_ai: true,
            enable_ocr: true,
            enable_cv: true,
        }
    }
}

/// Payload of a successful `/analyze` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeData {
    pub template: Template,
    #[serde(default)]
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisMetadata {
    pub processing_time_ms: Option<u64>,
    pub text_count: Option<u32>,
    pub button_count: Option<u32>,
    pub image_count: Option<u32>,
    pub ai_model: Option<String>,
    pub ai_used: Option<bool>,
    pub ocr_used: Option<bool>,
    pub cv_used: Option<bool>,
}

/// Body of `POST /generate/image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateImageRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub keywords: Vec<String>,
    pub style: String,
    pub model: String,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl Default for GenerateImageRequest {
    fn default() -> Self {
        GenerateImageRequest {
            title: String::new(),
            subtitle: None,
            keywords: Vec::new(),
            style: String::new(),
            model: String::new(),
            count: 1,
            background_image: None,
        }
    }
}

impl GenerateImageRequest {
    /// The same limits the original UI enforced before submitting.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.keywords.is_empty() {
            return Err(ApiError::InvalidRequest(
                "at least one keyword is required".to_string(),
            ));
        }
        if self.keywords.len() > 5 {
            return Err(ApiError::InvalidRequest(
                "at most 5 keywords are allowed".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payload of a successful `/generate/image` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageData {
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
    #[serde(default)]
    pub metadata: GenerationMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedImage {
    pub base64: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationMetadata {
    pub count: Option<u32>,
    pub generation_time_ms: Option<u64>,
}

/// Query string for the paginated history listings.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryQuery {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        HistoryQuery {
            page: 1,
            size: 10,
            style: None,
        }
    }
}

/// One page of history records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage<T> {
    #[serde(default)]
    pub records: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Stored image-generation run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageHistoryRecord {
    pub history_id: String,
    pub timestamp: Option<String>,
    pub request: Option<GenerateImageRequest>,
    pub metadata: Option<GenerationMetadata>,
    /// Relative paths of the form `images/{historyId}/{filename}`.
    pub image_paths: Vec<String>,
    pub style: Option<String>,
    pub model: Option<String>,
    pub image_count: Option<u32>,
    pub images: Vec<GeneratedImage>,
}

/// Stored design-analysis run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisHistoryRecord {
    pub history_id: String,
    pub timestamp: Option<String>,
    pub original_image_path: Option<String>,
    pub template: Option<Template>,
    pub metadata: Option<AnalysisMetadata>,
    pub component_count: Option<u32>,
    pub analysis_engine: Option<String>,
}

/// Static-asset URL for a stored image path of the form
/// `segment/historyId/filename`. Returns `None` for malformed paths.
pub fn history_image_url(image_path: &str) -> Option<String> {
    let parts: Vec<&str> = image_path.split('/').collect();
    if parts.len() < 3 {
        return None;
    }
    Some(format!("/api/history/image/{}/{}", parts[1], parts[2]))
}

/// HTTP client bound to one backend base URL (e.g. `http://host/api`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(ApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /analyze` — multipart upload of a design image.
    pub async fn analyze(
        &self,
        image: Vec<u8>,
        filename: &str,
        config: AnalyzeConfig,
    ) -> Result<AnalyzeData, ApiError> {
        log::debug!("analyzing {} ({} bytes)", filename, image.len());
        let part = multipart::Part::bytes(image).file_name(filename.to_string());
        // Booleans travel as form-field strings, matching the endpoint.
        let form = multipart::Form::new()
            .part("image", part)
            .text("enableAI", config.enable_ai.to_string())
            .text("enableOCR", config.enable_ocr.to_string())
            .text("enableCV", config.enable_cv.to_string());
        let response = self
            .http
            .post(self.url("/analyze"))
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;
        unwrap_envelope(response).await
    }

    /// `POST /generate/image`.
    pub async fn generate_image(
        &self,
        request: &GenerateImageRequest,
    ) -> Result<GenerateImageData, ApiError> {
        request.validate()?;
        let response = self
            .http
            .post(self.url("/generate/image"))
            .json(request)
            .send()
            .await
            .map_err(classify)?;
        unwrap_envelope(response).await
    }

    /// `GET /history/list`.
    pub async fn image_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<HistoryPage<ImageHistoryRecord>, ApiError> {
        let response = self
            .http
            .get(self.url("/history/list"))
            .query(query)
            .send()
            .await
            .map_err(classify)?;
        unwrap_envelope(response).await
    }

    /// `GET /history/analysis/list`.
    pub async fn analysis_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<HistoryPage<AnalysisHistoryRecord>, ApiError> {
        let response = self
            .http
            .get(self.url("/history/analysis/list"))
            .query(query)
            .send()
            .await
            .map_err(classify)?;
        unwrap_envelope(response).await
    }

    /// `GET /history/{id}`.
    pub async fn image_history_record(
        &self,
        history_id: &str,
    ) -> Result<ImageHistoryRecord, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/history/{}", history_id)))
            .send()
            .await
            .map_err(classify)?;
        unwrap_envelope(response).await
    }

    /// `DELETE /history/{id}`.
    pub async fn delete_image_history(&self, history_id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/history/{}", history_id)))
            .send()
            .await
            .map_err(classify)?;
        check_envelope(response).await
    }

    /// `GET /history/analysis/{id}`.
    pub async fn analysis_record(
        &self,
        history_id: &str,
    ) -> Result<AnalysisHistoryRecord, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/history/analysis/{}", history_id)))
            .send()
            .await
            .map_err(classify)?;
        unwrap_envelope(response).await
    }

    /// `DELETE /history/analysis/{id}`.
    pub async fn delete_analysis(&self, history_id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/history/analysis/{}", history_id)))
            .send()
            .await
            .map_err(classify)?;
        check_envelope(response).await
    }
}

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_connect() {
        ApiError::Unreachable(err)
    } else {
        ApiError::Transport(err)
    }
}

async fn unwrap_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let envelope: ApiEnvelope<T> = response.json().await.map_err(classify)?;
    if envelope.code != 200 {
        return Err(ApiError::Server {
            message: envelope
                .message
                .unwrap_or_else(|| format!("backend returned code {}", envelope.code)),
        });
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Malformed("success envelope without data".to_string()))
}

/// Like [`unwrap_envelope`] for endpoints whose payload is irrelevant.
async fn check_envelope(response: reqwest::Response) -> Result<(), ApiError> {
    let envelope: ApiEnvelope<serde_json::Value> = response.json().await.map_err(classify)?;
    if envelope.code != 200 {
        return Err(ApiError::Server {
            message: envelope
                .message
                .unwrap_or_else(|| format!("backend returned code {}", envelope.code)),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn image_url_derivation_splits_the_stored_path() {
        assert_eq!(
            history_image_url("images/abc-123/image_1.png").as_deref(),
            Some("/api/history/image/abc-123/image_1.png")
        );
        assert_eq!(history_image_url("images/abc-123"), None);
        assert_eq!(history_image_url(""), None);
    }

    #[test]
    fn envelope_success_exposes_data() {
        let envelope: ApiEnvelope<GenerateImageData> = serde_json::from_str(
            r#"{"code":200,"message":"ok","data":{"images":[{"base64":"xyz","width":750,"height":1334}],"metadata":{"count":1,"generationTimeMs":840}}}"#,
        )
        .unwrap();
        assert_eq!(envelope.code, 200);
        let data = envelope.data.unwrap();
        assert_eq!(data.images.len(), 1);
        assert_eq!(data.metadata.generation_time_ms, Some(840));
    }

    #[test]
    fn envelope_error_carries_the_message() {
        let envelope: ApiEnvelope<GenerateImageData> =
            serde_json::from_str(r#"{"code":500,"message":"model overloaded"}"#).unwrap();
        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.message.as_deref(), Some("model overloaded"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn analyze_payload_includes_the_template() {
        let data: AnalyzeData = serde_json::from_str(
            r##"{"template":{"page":{"width":750,"height":1334,"backgroundColor":"#fff"},"components":[]},"metadata":{"textCount":3,"buttonCount":1,"imageCount":2,"processingTimeMs":5200}}"##,
        )
        .unwrap();
        assert!(data.template.validate().is_ok());
        assert_eq!(data.metadata.text_count, Some(3));
    }

    #[test]
    fn keyword_limits_are_enforced_client_side() {
        let mut request = GenerateImageRequest {
            title: "t".to_string(),
            keywords: vec![],
            ..GenerateImageRequest::default()
        };
        assert!(matches!(
            request.validate(),
            Err(ApiError::InvalidRequest(_))
        ));

        request.keywords = vec!["a".to_string(); 6];
        assert!(matches!(
            request.validate(),
            Err(ApiError::InvalidRequest(_))
        ));

        request.keywords.truncate(5);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn history_record_tolerates_missing_fields() {
        let record: ImageHistoryRecord = serde_json::from_str(
            r#"{"historyId":"h1","imagePaths":["images/h1/image_1.png"]}"#,
        )
        .unwrap();
        assert_eq!(record.history_id, "h1");
        assert!(record.request.is_none());
        assert_eq!(
            history_image_url(&record.image_paths[0]).as_deref(),
            Some("/api/history/image/h1/image_1.png")
        );
    }
}
