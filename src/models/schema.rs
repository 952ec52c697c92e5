//! 스키마 게이트웨이가 돌려주는 레이아웃 기술자(layout descriptor).
//!
//! 두 가지 형태를 받습니다:
//! - `{"sections": [{"title": ..., "fields": [...]}]}`
//! - `{"fields": [...]}`

use serde::{Deserialize, Serialize};

/// 입력 컨트롤 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Date,
    File,
    Select,
    /// 이 클라이언트가 그리지 않는 종류 (예: 서버의 "custom_qa")
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub accept: Option<String>,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            options: Vec::new(),
            placeholder: None,
            accept: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|option| option.to_string()).collect();
        self
    }

    pub fn accept(mut self, accept: &str) -> Self {
        self.accept = Some(accept.to_string());
        self
    }
}

/// 섹션 하나. `repeatable`이면 `name` 아래에 객체 배열로 값을 모읍니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub repeatable: bool,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaLayout {
    Sections { sections: Vec<SchemaSection> },
    Fields { fields: Vec<FieldSpec> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub korean_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub layout: SchemaLayout,
}

impl FormSchema {
    pub fn fields(fields: Vec<FieldSpec>) -> Self {
        Self {
            korean_name: None,
            title: None,
            layout: SchemaLayout::Fields { fields },
        }
    }

    pub fn sections(sections: Vec<SchemaSection>) -> Self {
        Self {
            korean_name: None,
            title: None,
            layout: SchemaLayout::Sections { sections },
        }
    }
}
