use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::EditorError;

/// 편집 가능한 문서 종류. 고정된 세 가지입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Resume,
    CoverLetter,
    Portfolio,
}

impl DocType {
    /// 다이어그램 레인 순서
    pub const ALL: [DocType; 3] = [DocType::Resume, DocType::CoverLetter, DocType::Portfolio];

    /// URL 경로와 JSON 키에 쓰는 이름
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Resume => "resume",
            DocType::CoverLetter => "cover_letter",
            DocType::Portfolio => "portfolio",
        }
    }

    pub fn korean_name(self) -> &'static str {
        match self {
            DocType::Resume => "이력서",
            DocType::CoverLetter => "자기소개서",
            DocType::Portfolio => "포트폴리오",
        }
    }

    /// `"이력서 (v2)"` 형태의 버전 라벨
    pub fn display_label(self, version: u32) -> String {
        format!("{} (v{})", self.korean_name(), version)
    }

    /// 편집기 제목 `"이력서 편집 (v2)"`
    pub fn editor_title(self, version: u32) -> String {
        format!("{} 편집 (v{})", self.korean_name(), version)
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(DocType::Resume),
            "cover_letter" => Ok(DocType::CoverLetter),
            "portfolio" => Ok(DocType::Portfolio),
            other => Err(EditorError::InvalidDocType(other.to_string())),
        }
    }
}

/// 반복 섹션의 한 행 (예: 학력 한 줄 `{level, status, school, major}`)
pub type Entry = BTreeMap<String, String>;

/// 필드 하나의 값
///
/// JSON에서는 문자열, 문자열 배열, 객체 배열 중 하나로 표현됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Entries(Vec<Entry>),
}

impl FieldValue {
    /// 공백만 있거나 빈 값이면 true
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
            FieldValue::Entries(rows) => rows
                .iter()
                .all(|row| row.values().all(|value| value.trim().is_empty())),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// 문서 내용: 필드 이름 → 값
///
/// `BTreeMap`이라 키 순서가 고정되고, 따라서 직렬화 결과와 해시도 결정적입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentContent(BTreeMap<String, FieldValue>);

impl DocumentContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 모든 필드가 비어 있으면 true (필드가 하나도 없어도 true)
    pub fn is_blank(&self) -> bool {
        self.0.values().all(FieldValue::is_blank)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// 내용의 SHA-256 해시 (소문자 16진수)
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        // BTreeMap<String, _>의 직렬화는 실패하지 않습니다.
        hasher.update(serde_json::to_vec(&self.0).unwrap_or_default());
        format!("{:x}", hasher.finalize())
    }
}

impl FromIterator<(String, FieldValue)> for DocumentContent {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 직무 이름을 서버가 쓰는 슬러그로 바꿉니다.
///
/// 공백과 `/`를 `-`로 바꾸고 소문자로 만듭니다.
/// 한글은 그대로 둡니다. (예: "DevOps/인프라 엔지니어" → "devops-인프라-엔지니어")
pub fn job_slug(job_title: &str) -> String {
    job_title.replace([' ', '/'], "-").to_lowercase()
}
