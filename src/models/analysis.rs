use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DocType, DocumentContent};

/// `POST /api/analyze_document/{doc_type}` 요청 본문
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub job_title: String,
    pub doc_type: DocType,
    pub document_content: DocumentContent,
    /// 편집을 시작한 버전 (version context)
    pub version: u32,
}

/// 분석 성공 응답
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResponse {
    pub feedback: String,
    #[serde(default)]
    pub individual_feedbacks: BTreeMap<String, String>,
    /// 서버가 정한 버전 번호. 없으면 클라이언트가 다음 번호를 계산합니다.
    #[serde(default, alias = "canonical_version")]
    pub version: Option<u32>,
}

impl AnalysisResponse {
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            individual_feedbacks: BTreeMap::new(),
            version: None,
        }
    }
}

/// 업로드할 포트폴리오 PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 포트폴리오 폼 입력. 파일과 링크 중 하나 이상이 있어야 합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioUpload {
    pub file: Option<PortfolioFile>,
    pub link: Option<String>,
}

impl PortfolioUpload {
    /// 앞뒤 공백을 제거한 링크. 비어 있으면 None.
    pub fn trimmed_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.trimmed_link().is_none()
    }
}

/// `POST /api/portfolio_summary` 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioRequest {
    pub job_title: String,
    pub upload: PortfolioUpload,
}

/// 포트폴리오 요약 결과: 내려받을 문서와 선택적 피드백
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSummary {
    pub file_name: String,
    pub document: Vec<u8>,
    pub feedback: Option<String>,
}

/// 요약 문서 기본 파일 이름
pub const SUMMARY_FILE_NAME: &str = "portfolio_summary.pdf";
