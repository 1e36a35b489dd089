/// Gemini API 客户端
///
/// 封装文件上传（Files API 可续传协议）和 generateContent 调用
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult, GeminiError};

const PDF_MIME_TYPE: &str = "application/pdf";

/// 已上传到 Gemini 的文件
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub mime_type: String,
}

/// Gemini 客户端
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model_name: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.gemini_model_name.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// 上传 PDF 文件
    ///
    /// # 参数
    /// - `path`: 本地文件路径
    /// - `display_name`: 在 Gemini 中显示的名称
    ///
    /// # 返回
    /// 返回上传后的文件信息（含 uri）
    pub async fn upload_file(&self, path: &Path, display_name: &str) -> AppResult<UploadedFile> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::io(path.display().to_string(), e))?;

        // 第一步：开启上传会话
        let start_endpoint = format!("{}/upload/v1beta/files", self.base_url);
        let metadata = UploadStartRequest {
            file: UploadMetadata {
                display_name: display_name.to_string(),
            },
        };

        let response = self
            .http_client
            .post(&start_endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", PDF_MIME_TYPE)
            .json(&metadata)
            .send()
            .await
            .map_err(|source| request_failed(&start_endpoint, source))?;
        let response = ensure_success(&start_endpoint, response).await?;

        let upload_url = response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(AppError::Gemini(GeminiError::MissingUploadUrl))?;
        debug!("上传会话已创建: {}", upload_url);

        // 第二步：上传内容并结束会话
        let response = self
            .http_client
            .post(&upload_url)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(|source| request_failed(&upload_url, source))?;
        let response = ensure_success(&upload_url, response).await?;

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|source| request_failed(&upload_url, source))?;

        Ok(uploaded.file)
    }

    /// 基于已上传文件生成内容
    ///
    /// # 参数
    /// - `prompt`: 提示词
    /// - `file`: 已上传的文件
    ///
    /// # 返回
    /// 返回第一个候选结果的全部文本
    pub async fn generate_content(&self, prompt: &str, file: &UploadedFile) -> AppResult<String> {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        );
        let mime_type = if file.mime_type.is_empty() {
            PDF_MIME_TYPE.to_string()
        } else {
            file.mime_type.clone()
        };

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::FileData {
                        file_data: FileData {
                            mime_type,
                            file_uri: file.uri.clone(),
                        },
                    },
                ],
            }],
        };

        debug!("正在调用 Gemini generateContent，模型: {}", self.model_name);

        let response = self
            .http_client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| request_failed(&endpoint, source))?;
        let response = ensure_success(&endpoint, response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|source| request_failed(&endpoint, source))?;

        let text: String = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::Gemini(GeminiError::EmptyResponse));
        }

        Ok(text)
    }
}

fn request_failed(endpoint: &str, source: reqwest::Error) -> AppError {
    AppError::Gemini(GeminiError::RequestFailed {
        endpoint: endpoint.to_string(),
        source,
    })
}

async fn ensure_success(endpoint: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Gemini(GeminiError::BadStatus {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    }))
}

// Gemini API 请求/响应结构体

#[derive(Serialize)]
struct UploadStartRequest {
    file: UploadMetadata,
}

#[derive(Serialize)]
struct UploadMetadata {
    display_name: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    FileData { file_data: FileData },
}

#[derive(Serialize)]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
