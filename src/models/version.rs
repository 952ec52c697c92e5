use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DocType, DocumentContent};

/// 문서의 한 버전
///
/// `display_label`과 `is_latest`는 저장하지 않고 항상 계산합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub doc_type: DocType,
    pub version: u32,
    pub content: DocumentContent,
    pub overall_feedback: Option<String>,
    pub individual_feedbacks: BTreeMap<String, String>,
    /// 내용의 SHA-256. 내용이 바뀔 때마다 다시 계산됩니다.
    pub content_hash: String,
    /// 로컬에서 만든 버전만 기록됩니다. 원격에서 불러온 버전은 비어 있을 수 있습니다.
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentVersion {
    /// 내용이 비어 있고 피드백이 없는 루트 버전(v0)
    pub fn root(doc_type: DocType) -> Self {
        Self::new(doc_type, 0, DocumentContent::new(), None, BTreeMap::new())
    }

    pub fn new(
        doc_type: DocType,
        version: u32,
        content: DocumentContent,
        overall_feedback: Option<String>,
        individual_feedbacks: BTreeMap<String, String>,
    ) -> Self {
        let content_hash = content.content_hash();
        Self {
            doc_type,
            version,
            content,
            overall_feedback,
            individual_feedbacks,
            content_hash,
            created_at: Some(Utc::now()),
        }
    }

    pub fn display_label(&self) -> String {
        self.doc_type.display_label(self.version)
    }

    pub fn has_feedback(&self) -> bool {
        self.overall_feedback.is_some() || !self.individual_feedbacks.is_empty()
    }

    /// 내용을 교체하고 해시를 다시 계산합니다. 피드백은 건드리지 않습니다.
    pub(crate) fn replace_content(&mut self, content: DocumentContent) {
        self.content_hash = content.content_hash();
        self.content = content;
    }
}

/// 초기 로딩 응답의 버전 레코드 한 개
///
/// 원본 데이터는 피드백이 없을 때 빈 문자열을 씁니다.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredVersion {
    pub version: u32,
    #[serde(default)]
    pub content: DocumentContent,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub individual_feedbacks: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredVersion {
    pub fn into_version(self, doc_type: DocType) -> DocumentVersion {
        DocumentVersion {
            doc_type,
            version: self.version,
            content_hash: self.content.content_hash(),
            content: self.content,
            overall_feedback: self.feedback.filter(|text| !text.trim().is_empty()),
            individual_feedbacks: self.individual_feedbacks,
            created_at: self.created_at,
        }
    }
}

/// `GET /api/load_documents/{job_slug}` 응답
///
/// 알 수 없는 문서 타입 키는 무시합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadedDocuments {
    #[serde(default)]
    pub resume: Vec<StoredVersion>,
    #[serde(default)]
    pub cover_letter: Vec<StoredVersion>,
    #[serde(default)]
    pub portfolio: Vec<StoredVersion>,
}

impl LoadedDocuments {
    pub fn take(&mut self, doc_type: DocType) -> Vec<StoredVersion> {
        match doc_type {
            DocType::Resume => std::mem::take(&mut self.resume),
            DocType::CoverLetter => std::mem::take(&mut self.cover_letter),
            DocType::Portfolio => std::mem::take(&mut self.portfolio),
        }
    }
}
