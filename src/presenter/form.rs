//! # 폼 프레젠터
//!
//! 스키마와 현재 문서 내용으로 입력 폼(`FormView`)을 만들고,
//! 사용자가 편집한 값을 다시 `DocumentContent`로 모읍니다.
//!
//! 문서 타입마다 레이아웃 전략(`FormStrategy`)이 하나씩 있습니다:
//! - 이력서: 스키마 그대로 (반복 섹션 포함)
//! - 자기소개서: 필수 질문 다섯 개로 고정
//! - 포트폴리오: PDF 업로드 + 링크, 제출 시 요약 문서를 내려받음
//!
//! ## 검증 규칙
//! - 필수 표시(`required`)가 있는 폼: 비어 있는 필수 필드마다 에러
//! - 필수 표시가 하나도 없는 폼: 모든 필드가 비어 있을 때만 거부

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{
    DocType, DocumentContent, Entry, FieldKind, FieldSpec, FieldValue, FormSchema, SchemaLayout,
    SchemaSection,
};

/// 제출 버튼이 하는 일
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    /// 분석 서비스에 보내고 새 버전을 만듦
    Analyze,
    /// 포트폴리오 요약 문서를 만들어 내려받음
    Summarize,
}

/// 문서 타입별 폼 레이아웃 전략
pub trait FormStrategy: Send + Sync {
    fn doc_type(&self) -> DocType;

    /// 서버 스키마를 이 타입의 섹션 목록으로 바꿉니다.
    fn sections(&self, schema: &FormSchema) -> Vec<SchemaSection>;

    fn submit_mode(&self) -> SubmitMode {
        SubmitMode::Analyze
    }

    fn submit_label(&self) -> &'static str {
        "저장 및 분석"
    }
}

pub struct ResumeForm;
pub struct CoverLetterForm;
pub struct PortfolioForm;

impl FormStrategy for ResumeForm {
    fn doc_type(&self) -> DocType {
        DocType::Resume
    }

    fn sections(&self, schema: &FormSchema) -> Vec<SchemaSection> {
        let renderable = |fields: &[FieldSpec]| -> Vec<FieldSpec> {
            fields
                .iter()
                .filter(|field| field.kind != FieldKind::Unsupported)
                .cloned()
                .collect()
        };

        match &schema.layout {
            SchemaLayout::Sections { sections } => sections
                .iter()
                .map(|section| SchemaSection {
                    fields: renderable(&section.fields),
                    ..section.clone()
                })
                .filter(|section| !section.fields.is_empty())
                .collect(),
            SchemaLayout::Fields { fields } => vec![SchemaSection {
                title: String::new(),
                name: None,
                repeatable: false,
                fields: renderable(fields),
            }],
        }
    }
}

impl FormStrategy for CoverLetterForm {
    fn doc_type(&self) -> DocType {
        DocType::CoverLetter
    }

    // 서버 스키마는 자유 문항("custom_qa")이라 그대로 그릴 수 없습니다.
    fn sections(&self, _schema: &FormSchema) -> Vec<SchemaSection> {
        let question = |name: &str, label: &str| {
            FieldSpec::new(name, label, FieldKind::Textarea).required()
        };
        vec![SchemaSection {
            title: String::new(),
            name: None,
            repeatable: false,
            fields: vec![
                question("reason_for_application", "1. 해당 직무에 지원한 이유"),
                question("expertise_experience", "2. 전문성을 기르기 위한 경험"),
                question("collaboration_experience", "3. 협업 경험"),
                question("challenging_goal_experience", "4. 도전 목표 경험"),
                question("growth_process", "5. 성장과정"),
            ],
        }]
    }
}

impl FormStrategy for PortfolioForm {
    fn doc_type(&self) -> DocType {
        DocType::Portfolio
    }

    fn sections(&self, _schema: &FormSchema) -> Vec<SchemaSection> {
        vec![SchemaSection {
            title: String::new(),
            name: None,
            repeatable: false,
            fields: vec![
                FieldSpec::new("portfolio_pdf", "포트폴리오 PDF 업로드", FieldKind::File)
                    .accept(".pdf"),
                FieldSpec::new("portfolio_link", "포트폴리오 링크 입력", FieldKind::Text),
            ],
        }]
    }

    fn submit_mode(&self) -> SubmitMode {
        SubmitMode::Summarize
    }

    fn submit_label(&self) -> &'static str {
        "요약 및 다운"
    }
}

pub fn strategy_for(doc_type: DocType) -> &'static dyn FormStrategy {
    match doc_type {
        DocType::Resume => &ResumeForm,
        DocType::CoverLetter => &CoverLetterForm,
        DocType::Portfolio => &PortfolioForm,
    }
}

/// 입력 컨트롤 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormControl {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<String>,
    pub placeholder: Option<String>,
    pub accept: Option<String>,
    pub value: String,
}

impl FormControl {
    fn from_spec(spec: &FieldSpec, value: &str) -> Self {
        Self {
            name: spec.name.clone(),
            label: spec.label.clone(),
            kind: spec.kind,
            required: spec.required,
            options: spec.options.clone(),
            placeholder: spec.placeholder.clone(),
            accept: spec.accept.clone(),
            // 파일 입력은 값을 미리 채울 수 없습니다.
            value: if spec.kind == FieldKind::File {
                String::new()
            } else {
                value.to_string()
            },
        }
    }

    /// 여러 줄 입력의 글자 수 (공백 포함, 유니코드 문자 단위)
    pub fn char_count(&self) -> Option<usize> {
        (self.kind == FieldKind::Textarea).then(|| self.value.chars().count())
    }

    fn carries_content(&self) -> bool {
        !matches!(self.kind, FieldKind::File | FieldKind::Unsupported)
    }
}

/// 행을 추가/삭제할 수 있는 섹션 (예: 학력사항)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatableGroup {
    pub name: String,
    pub item_fields: Vec<FieldSpec>,
    /// 최소 한 행은 항상 표시됩니다.
    pub rows: Vec<Vec<FormControl>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionBody {
    Fields(Vec<FormControl>),
    Repeatable(RepeatableGroup),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSection {
    pub title: String,
    pub body: SectionBody,
}

/// 렌더링된 폼
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub doc_type: DocType,
    pub sections: Vec<FormSection>,
    pub submit_label: &'static str,
    pub submit_mode: SubmitMode,
    /// 필드 이름 → 에러 메시지. 반복 섹션은 `education[0].school` 형태.
    pub errors: BTreeMap<String, String>,
    /// 포커스를 받을 필드 (첫 번째 에러 필드)
    pub focus: Option<String>,
    #[serde(skip)]
    layout: Vec<SchemaSection>,
}

impl FormView {
    pub fn controls(&self) -> impl Iterator<Item = &FormControl> {
        self.sections.iter().flat_map(|section| {
            let (fields, rows): (&[FormControl], &[Vec<FormControl>]) = match &section.body {
                SectionBody::Fields(controls) => (controls.as_slice(), &[]),
                SectionBody::Repeatable(group) => (&[], group.rows.as_slice()),
            };
            fields.iter().chain(rows.iter().flatten())
        })
    }

    pub fn control(&self, name: &str) -> Option<&FormControl> {
        self.controls().find(|control| control.name == name)
    }

    /// 필수 표시가 하나라도 있는지 (없으면 예전 방식의 "전부 비었을 때만 거부")
    pub fn has_required_fields(&self) -> bool {
        self.layout
            .iter()
            .flat_map(|section| section.fields.iter())
            .any(|field| field.required)
    }

    /// 같은 레이아웃에 새 값을 채웁니다. 에러 표시는 유지합니다.
    pub fn refill(&mut self, content: &DocumentContent) {
        self.sections = build_sections(&self.layout, content);
    }

    pub fn mark_errors(&mut self, report: &ValidationReport) {
        self.errors = report
            .field_errors
            .iter()
            .map(|error| (error.field.clone(), error.message.clone()))
            .collect();
        self.focus = report.first_field().map(str::to_string);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.focus = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 로컬 검증 결과: 필드별 에러와 요약 알림 한 줄
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub field_errors: Vec<FieldError>,
    pub summary: String,
}

impl ValidationReport {
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self {
            field_errors: Vec::new(),
            summary: summary.into(),
        }
    }

    pub fn first_field(&self) -> Option<&str> {
        self.field_errors.first().map(|error| error.field.as_str())
    }

    fn push(&mut self, field: String) {
        self.field_errors.push(FieldError {
            field,
            message: REQUIRED_FIELD_MESSAGE.to_string(),
        });
    }
}

const REQUIRED_FIELD_MESSAGE: &str = "필수 입력 항목입니다.";
const MISSING_REQUIRED_SUMMARY: &str = "필수 입력 항목을 모두 채워주세요.";
const EMPTY_CONTENT_SUMMARY: &str = "분석할 내용이 없습니다. 내용을 입력해주세요.";

/// 스키마와 현재 내용으로 폼을 만듭니다.
pub fn render(doc_type: DocType, schema: &FormSchema, content: &DocumentContent) -> FormView {
    let strategy = strategy_for(doc_type);
    let layout = strategy.sections(schema);
    FormView {
        doc_type,
        sections: build_sections(&layout, content),
        submit_label: strategy.submit_label(),
        submit_mode: strategy.submit_mode(),
        errors: BTreeMap::new(),
        focus: None,
        layout,
    }
}

fn build_sections(layout: &[SchemaSection], content: &DocumentContent) -> Vec<FormSection> {
    layout
        .iter()
        .map(|section| {
            let body = match (&section.name, section.repeatable) {
                (Some(name), true) => {
                    let mut rows: Vec<Vec<FormControl>> = entries_of(content.get(name), &section.fields)
                        .iter()
                        .map(|entry| row_controls(&section.fields, entry))
                        .collect();
                    if rows.is_empty() {
                        rows.push(row_controls(&section.fields, &Entry::new()));
                    }
                    SectionBody::Repeatable(RepeatableGroup {
                        name: name.clone(),
                        item_fields: section.fields.clone(),
                        rows,
                    })
                }
                _ => SectionBody::Fields(
                    section
                        .fields
                        .iter()
                        .map(|spec| {
                            FormControl::from_spec(spec, content.text(&spec.name).unwrap_or_default())
                        })
                        .collect(),
                ),
            };
            FormSection {
                title: section.title.clone(),
                body,
            }
        })
        .collect()
}

fn row_controls(fields: &[FieldSpec], entry: &Entry) -> Vec<FormControl> {
    fields
        .iter()
        .map(|spec| {
            FormControl::from_spec(spec, entry.get(&spec.name).map(String::as_str).unwrap_or_default())
        })
        .collect()
}

/// 반복 섹션 값을 행 목록으로 읽습니다.
/// 문자열 배열(예: 자격증 목록)은 첫 번째 필드의 값으로 취급합니다.
fn entries_of(value: Option<&FieldValue>, fields: &[FieldSpec]) -> Vec<Entry> {
    match value {
        Some(FieldValue::Entries(rows)) => rows.clone(),
        Some(FieldValue::List(items)) => match fields.first() {
            Some(first) => items
                .iter()
                .map(|item| Entry::from([(first.name.clone(), item.clone())]))
                .collect(),
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// 편집된 값을 폼 구조에 맞춰 모으고 검증합니다.
///
/// 값은 앞뒤 공백을 제거해 저장합니다. 파일 입력은 내용에 포함하지 않습니다.
/// 검증에 실패하면 네트워크 호출 없이 `ValidationReport`를 돌려줍니다.
pub fn collect(form: &FormView, edited: &DocumentContent) -> Result<DocumentContent, ValidationReport> {
    let (content, mut report) = gather(form, edited);

    if form.has_required_fields() {
        if !report.field_errors.is_empty() {
            report.summary = MISSING_REQUIRED_SUMMARY.to_string();
            return Err(report);
        }
    } else if content.is_blank() {
        let mut report = ValidationReport::summary_only(EMPTY_CONTENT_SUMMARY);
        if let Some(first) = form.controls().find(|c| c.carries_content()) {
            report.field_errors.push(FieldError {
                field: first.name.clone(),
                message: EMPTY_CONTENT_SUMMARY.to_string(),
            });
        }
        return Err(report);
    }

    Ok(content)
}

/// 검증 없이 현재 입력값만 모읍니다. 편집기를 닫을 때 쓰입니다.
pub fn snapshot(form: &FormView, edited: &DocumentContent) -> DocumentContent {
    gather(form, edited).0
}

/// 값을 모으면서 비어 있는 필수 필드를 기록합니다.
fn gather(form: &FormView, edited: &DocumentContent) -> (DocumentContent, ValidationReport) {
    let mut content = DocumentContent::new();
    let mut report = ValidationReport::default();

    for section in &form.sections {
        match &section.body {
            SectionBody::Fields(controls) => {
                for control in controls.iter().filter(|c| c.carries_content()) {
                    let value = edited.text(&control.name).unwrap_or_default().trim().to_string();
                    if control.required && value.is_empty() {
                        report.push(control.name.clone());
                    }
                    content.insert(control.name.clone(), value);
                }
            }
            SectionBody::Repeatable(group) => {
                let rows: Vec<Entry> = entries_of(edited.get(&group.name), &group.item_fields)
                    .into_iter()
                    .map(|row| trim_row(row, &group.item_fields))
                    .filter(|row| row.values().any(|value| !value.is_empty()))
                    .collect();

                let required: Vec<&FieldSpec> =
                    group.item_fields.iter().filter(|f| f.required).collect();
                if rows.is_empty() {
                    if let Some(first) = required.first() {
                        report.push(format!("{}[0].{}", group.name, first.name));
                    }
                }
                for (index, row) in rows.iter().enumerate() {
                    for field in &required {
                        if row.get(&field.name).map_or(true, String::is_empty) {
                            report.push(format!("{}[{}].{}", group.name, index, field.name));
                        }
                    }
                }
                content.insert(group.name.clone(), FieldValue::Entries(rows));
            }
        }
    }

    (content, report)
}

/// 폼에 있는 항목만 남기고 값의 공백을 제거합니다.
fn trim_row(row: Entry, fields: &[FieldSpec]) -> Entry {
    fields
        .iter()
        .map(|field| {
            let value = row.get(&field.name).map(|v| v.trim().to_string()).unwrap_or_default();
            (field.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume_schema() -> FormSchema {
        FormSchema::sections(vec![
            SchemaSection {
                title: "기본 정보".into(),
                name: None,
                repeatable: false,
                fields: vec![
                    FieldSpec::new("name", "이름", FieldKind::Text).required(),
                    FieldSpec::new("summary", "자기 소개", FieldKind::Textarea),
                    FieldSpec::new("photo", "사진", FieldKind::File).accept("image/*"),
                ],
            },
            SchemaSection {
                title: "학력사항".into(),
                name: Some("education".into()),
                repeatable: true,
                fields: vec![
                    FieldSpec::new("level", "학력", FieldKind::Select)
                        .options(&["", "대학교(4년제)", "대학원"])
                        .required(),
                    FieldSpec::new("school", "학교명", FieldKind::Text),
                ],
            },
        ])
    }

    fn legacy_schema() -> FormSchema {
        FormSchema::fields(vec![
            FieldSpec::new("education", "학력", FieldKind::Textarea),
            FieldSpec::new("gpa", "학점", FieldKind::Text),
            FieldSpec::new("qa", "질문", FieldKind::Unsupported),
        ])
    }

    fn education_row(level: &str, school: &str) -> Entry {
        Entry::from([
            ("level".to_string(), level.to_string()),
            ("school".to_string(), school.to_string()),
        ])
    }

    #[test]
    fn each_doc_type_has_its_own_strategy() {
        for doc_type in DocType::ALL {
            assert_eq!(strategy_for(doc_type).doc_type(), doc_type);
        }
    }

    #[test]
    fn snapshot_skips_validation() {
        let form = render(DocType::CoverLetter, &legacy_schema(), &DocumentContent::new());
        let content = snapshot(&form, &DocumentContent::new().with("growth_process", " 성장 "));
        assert_eq!(content.text("growth_process"), Some("성장"));
        assert_eq!(content.text("reason_for_application"), Some(""));
    }

    #[test]
    fn renders_current_values_and_one_blank_repeatable_row() {
        let content = DocumentContent::new().with("name", "홍길동").with("summary", "안녕하세요");
        let form = render(DocType::Resume, &resume_schema(), &content);

        assert_eq!(form.submit_mode, SubmitMode::Analyze);
        assert_eq!(form.control("name").unwrap().value, "홍길동");
        assert_eq!(form.control("summary").unwrap().char_count(), Some(5));
        assert_eq!(form.control("name").unwrap().char_count(), None);

        let SectionBody::Repeatable(group) = &form.sections[1].body else {
            panic!("expected repeatable education section");
        };
        assert_eq!(group.rows.len(), 1);
        assert!(group.rows[0].iter().all(|control| control.value.is_empty()));
    }

    #[test]
    fn renders_existing_rows_from_entries_and_string_lists() {
        let content = DocumentContent::new().with(
            "education",
            FieldValue::Entries(vec![education_row("대학원", "OO대"), education_row("", "XX고")]),
        );
        let form = render(DocType::Resume, &resume_schema(), &content);
        let SectionBody::Repeatable(group) = &form.sections[1].body else {
            panic!("expected repeatable section");
        };
        assert_eq!(group.rows.len(), 2);
        assert_eq!(group.rows[1][1].value, "XX고");

        let certificates = FormSchema::sections(vec![SchemaSection {
            title: "자격증".into(),
            name: Some("certificates".into()),
            repeatable: true,
            fields: vec![FieldSpec::new("name", "자격증", FieldKind::Text)],
        }]);
        let content = DocumentContent::new().with(
            "certificates",
            FieldValue::List(vec!["정보처리기사".into(), "SQLD".into()]),
        );
        let form = render(DocType::Resume, &certificates, &content);
        let SectionBody::Repeatable(group) = &form.sections[0].body else {
            panic!("expected repeatable section");
        };
        assert_eq!(group.rows[1][0].value, "SQLD");
    }

    #[test]
    fn required_blank_fields_are_reported_in_order() {
        let form = render(DocType::Resume, &resume_schema(), &DocumentContent::new());
        let edited = DocumentContent::new()
            .with("name", "   ")
            .with("education", FieldValue::Entries(vec![education_row("", "OO대")]));

        let report = collect(&form, &edited).unwrap_err();
        let fields: Vec<&str> = report.field_errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "education[0].level"]);
        assert_eq!(report.first_field(), Some("name"));
        assert_eq!(report.summary, "필수 입력 항목을 모두 채워주세요.");
    }

    #[test]
    fn collect_trims_values_and_drops_blank_rows_and_files() {
        let form = render(DocType::Resume, &resume_schema(), &DocumentContent::new());
        let edited = DocumentContent::new()
            .with("name", "  A ")
            .with("photo", "C:\\fakepath\\me.png")
            .with("unknown", "ignored")
            .with(
                "education",
                FieldValue::Entries(vec![education_row(" 대학원 ", "OO대"), education_row(" ", "")]),
            );

        let content = collect(&form, &edited).unwrap();
        assert_eq!(content.text("name"), Some("A"));
        assert_eq!(content.text("summary"), Some(""));
        assert!(content.get("photo").is_none());
        assert!(content.get("unknown").is_none());
        assert_eq!(
            content.get("education"),
            Some(&FieldValue::Entries(vec![education_row("대학원", "OO대")]))
        );
    }

    #[test]
    fn legacy_forms_reject_only_when_everything_is_blank() {
        let form = render(DocType::Resume, &legacy_schema(), &DocumentContent::new());
        assert!(!form.has_required_fields());
        // 그릴 수 없는 custom_qa 필드는 빠집니다.
        assert!(form.control("qa").is_none());

        let report = collect(&form, &DocumentContent::new().with("gpa", " ")).unwrap_err();
        assert_eq!(report.summary, "분석할 내용이 없습니다. 내용을 입력해주세요.");
        assert_eq!(report.first_field(), Some("education"));

        let content = collect(&form, &DocumentContent::new().with("gpa", "4.0")).unwrap();
        assert_eq!(content.text("gpa"), Some("4.0"));
        assert_eq!(content.text("education"), Some(""));
    }

    #[test]
    fn cover_letter_ignores_server_fields_and_requires_every_question() {
        let form = render(DocType::CoverLetter, &legacy_schema(), &DocumentContent::new());
        assert_eq!(form.controls().count(), 5);
        assert!(form.controls().all(|c| c.required && c.kind == FieldKind::Textarea));

        let edited = DocumentContent::new().with("reason_for_application", "지원 동기");
        let report = collect(&form, &edited).unwrap_err();
        assert_eq!(report.field_errors.len(), 4);
        assert_eq!(report.first_field(), Some("expertise_experience"));
    }

    #[test]
    fn portfolio_form_summarizes_and_prefills_link() {
        let content = DocumentContent::new().with("portfolio_link", "https://github.com/me");
        let form = render(DocType::Portfolio, &legacy_schema(), &content);
        assert_eq!(form.submit_mode, SubmitMode::Summarize);
        assert_eq!(form.submit_label, "요약 및 다운");
        assert_eq!(form.control("portfolio_link").unwrap().value, "https://github.com/me");
        assert_eq!(form.control("portfolio_pdf").unwrap().accept.as_deref(), Some(".pdf"));
    }

    #[test]
    fn mark_errors_focuses_first_offending_field_and_refill_keeps_layout() {
        let mut form = render(DocType::CoverLetter, &legacy_schema(), &DocumentContent::new());
        let typed = DocumentContent::new().with("growth_process", "성장");
        let report = collect(&form, &typed).unwrap_err();

        form.refill(&typed);
        form.mark_errors(&report);
        assert_eq!(form.focus.as_deref(), Some("reason_for_application"));
        assert_eq!(form.errors.len(), 4);
        assert_eq!(form.control("growth_process").unwrap().value, "성장");

        form.clear_errors();
        assert!(form.errors.is_empty() && form.focus.is_none());
    }
}
