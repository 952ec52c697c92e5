//! # HTTP 게이트웨이
//!
//! 분석/저장 서비스의 HTTP API를 `reqwest`로 호출하는 구현체입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/document_schema/{doc_type}?job_slug=...`      → 폼 스키마
//! - `POST   /api/analyze_document/{doc_type}`                   → 분석 피드백
//! - `DELETE /api/rollback_document/{doc_type}/{job_slug}/{v}`   → 롤백 후 원격 삭제
//! - `POST   /api/portfolio_summary` (multipart)                 → 요약 PDF
//! - `GET    /api/load_documents/{job_slug}`                     → 이전 세션 버전
//!
//! 실패 응답 본문은 다음 형태 중 하나이며, 모두 한 줄 메시지로 줄입니다:
//! - `{"detail": [{"msg": "..."}]}` (필드별 에러 목록)
//! - `{"detail": "..."}`
//! - `{"error": "..."}` 또는 `{"error": {"message": "..."}}`

use async_trait::async_trait;
use base64::Engine;
use reqwest::{header, multipart, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::{AnalysisGateway, SchemaGateway};
use crate::config::Config;
use crate::error::GatewayError;
use crate::models::{
    job_slug, AnalysisRequest, AnalysisResponse, DocType, FormSchema, LoadedDocuments,
    PortfolioRequest, PortfolioSummary, SUMMARY_FILE_NAME,
};

/// 두 협력자 트레이트를 모두 구현하는 HTTP 클라이언트
///
/// `reqwest::Client`는 내부적으로 `Arc`를 쓰므로 clone해도 연결 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    api_base: String,
    auth_token: Option<String>,
}

impl HttpGateway {
    pub fn new(api_base: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base.clone(), config.auth_token.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.api_base, path));
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 성공이 아니면 본문을 해석해 `GatewayError`로 바꿉니다.
    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }
}

/// 실패 응답 본문을 가장 구체적인 에러로 줄입니다.
fn error_from_body(status: u16, body: &str) -> GatewayError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = match parsed.as_ref() {
        Some(json) => {
            if let Some(items) = json.get("detail").and_then(Value::as_array) {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect();
                if !messages.is_empty() {
                    return GatewayError::FieldErrors(messages);
                }
            }
            json.get("detail")
                .and_then(Value::as_str)
                .or_else(|| json.get("error").and_then(Value::as_str))
                .or_else(|| {
                    json.get("error")
                        .and_then(|error| error.get("message"))
                        .and_then(Value::as_str)
                })
                .map(str::to_string)
        }
        None => Some(body.trim().to_string()).filter(|text| !text.is_empty()),
    };

    GatewayError::Status {
        status,
        message: message.unwrap_or_else(|| "알 수 없는 오류".to_string()),
    }
}

/// 요약 문서가 JSON으로 올 때의 형태
#[derive(Debug, Deserialize)]
struct EncodedSummary {
    #[serde(alias = "pdf_base64")]
    document_base64: String,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    feedback: Option<String>,
}

/// `Content-Disposition: attachment; filename="x.pdf"`에서 파일 이름을 꺼냅니다.
fn disposition_file_name(response: &Response) -> Option<String> {
    let value = response
        .headers()
        .get(header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;
    let (_, rest) = value.split_once("filename=")?;
    let name = rest.split(';').next()?.trim().trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

#[async_trait]
impl SchemaGateway for HttpGateway {
    async fn fetch_schema(
        &self,
        doc_type: DocType,
        job_title: &str,
    ) -> Result<FormSchema, GatewayError> {
        tracing::debug!("Fetching schema for {}", doc_type);
        let response = self
            .request(Method::GET, &format!("/api/document_schema/{doc_type}"))
            .query(&[("job_slug", job_slug(job_title))])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl AnalysisGateway for HttpGateway {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, GatewayError> {
        tracing::info!("Requesting analysis for {} v{}", request.doc_type, request.version);
        let response = self
            .request(
                Method::POST,
                &format!("/api/analyze_document/{}", request.doc_type),
            )
            .json(request)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Malformed(e.to_string()))
    }

    async fn delete_after(
        &self,
        doc_type: DocType,
        job_title: &str,
        version: u32,
    ) -> Result<(), GatewayError> {
        tracing::info!("Requesting remote rollback of {} to v{}", doc_type, version);
        let path = format!(
            "/api/rollback_document/{}/{}/{}",
            doc_type,
            job_slug(job_title),
            version
        );
        let response = self.request(Method::DELETE, &path).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn summarize_portfolio(
        &self,
        request: &PortfolioRequest,
    ) -> Result<PortfolioSummary, GatewayError> {
        let mut form = multipart::Form::new().text("job_title", request.job_title.clone());
        if let Some(file) = &request.upload.file {
            let part = multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str("application/pdf")?;
            form = form.part("portfolio_pdf", part);
        }
        if let Some(link) = request.upload.trimmed_link() {
            form = form.text("portfolio_link", link.to_string());
        }

        let response = self
            .request(Method::POST, "/api/portfolio_summary")
            .multipart(form)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let encoded: EncodedSummary = response.json().await?;
            let document = base64::engine::general_purpose::STANDARD
                .decode(encoded.document_base64.as_bytes())
                .map_err(|e| GatewayError::Malformed(e.to_string()))?;
            return Ok(PortfolioSummary {
                file_name: encoded
                    .file_name
                    .unwrap_or_else(|| SUMMARY_FILE_NAME.to_string()),
                document,
                feedback: encoded.feedback.filter(|text| !text.trim().is_empty()),
            });
        }

        let file_name =
            disposition_file_name(&response).unwrap_or_else(|| SUMMARY_FILE_NAME.to_string());
        let document = response.bytes().await?.to_vec();
        Ok(PortfolioSummary {
            file_name,
            document,
            feedback: None,
        })
    }

    async fn load_documents(&self, job_title: &str) -> Result<LoadedDocuments, GatewayError> {
        let path = format!("/api/load_documents/{}", job_slug(job_title));
        let response = self.request(Method::GET, &path).send().await?;
        let response = Self::check(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Malformed(e.to_string()))
    }
}
