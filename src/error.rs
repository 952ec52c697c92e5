//! # 에러 처리 모듈
//!
//! 편집기 코어에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `EditorError` 열거형: 편집 흐름(열기/제출/롤백/포트폴리오)의 모든 실패를 하나의 타입으로 통합
//! - `GatewayError` 열거형: 외부 협력자(스키마/분석 서비스) 호출 실패
//! - `Notice`: 에러를 사용자에게 보여줄 알림(분류 코드 + 메시지)으로 변환

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::models::DocType;

/// 편집 흐름에서 발생할 수 있는 모든 에러 종류
///
/// 각 variant는 `Notice`로 변환되어 사용자에게 보고됩니다.
/// 어떤 실패도 조용히 삼키지 않습니다.
#[derive(Debug, Error)]
pub enum EditorError {
    /// 알 수 없는 문서 타입 이름 (예: "career_statement")
    #[error("Unknown document type: {0}")]
    InvalidDocType(String),

    /// 커서가 가리키는 버전이 더 이상 존재하지 않음 (롤백 직후 등)
    #[error("{doc_type} v{version} not found")]
    VersionNotFound { doc_type: DocType, version: u32 },

    /// 스키마 조회 실패. 편집기 열기를 중단합니다.
    #[error("Schema fetch failed: {0}")]
    SchemaFetchFailed(String),

    /// 분석 서비스 실패. VersionStore는 변경되지 않습니다.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// 로컬 필수 입력 검사 실패. 네트워크 호출 없이 반환됩니다.
    #[error("Validation failed: {}", .0.summary)]
    ValidationFailed(crate::presenter::ValidationReport),

    /// 롤백 후 원격 삭제 요청 실패.
    /// 로컬 잘라내기는 이미 끝났으므로 되돌리지 않습니다.
    #[error("Remote delete failed: {0}")]
    RemoteDeleteFailed(String),

    /// 포트폴리오 요약 실패
    #[error("Portfolio summary failed: {0}")]
    SummaryFailed(String),

    /// 같은 문서 타입의 제출이 이미 진행 중
    #[error("A submit for {0} is already in flight")]
    SubmitInFlight(DocType),

    /// 열린 편집기가 없는 상태에서 제출/저장을 시도함
    #[error("No editor is open")]
    EditorClosed,

    /// 이 문서 타입은 다른 제출 경로를 사용함 (포트폴리오 ↔ 일반 문서)
    #[error("{0} does not support this submit path")]
    UnsupportedSubmit(DocType),

    /// 버전 번호가 현재 최신 버전보다 크지 않음
    #[error("Version {version} must be greater than {latest} for {doc_type}")]
    InvalidVersion {
        doc_type: DocType,
        version: u32,
        latest: u32,
    },
}

/// 외부 협력자 호출 실패
///
/// 어떤 형태로 실패하든 `message()`로 사람이 읽을 수 있는 한 줄 메시지로 줄일 수 있습니다.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 성공이 아닌 HTTP 상태 코드
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 필드별 에러 목록 (`{"detail": [{"msg": ...}]}`)
    #[error("{}", .0.join(", "))]
    FieldErrors(Vec<String>),

    /// 연결 실패 등 전송 계층 에러
    #[error("Transport error: {0}")]
    Transport(String),

    /// 응답 본문을 해석할 수 없음
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// 설정된 시간 안에 응답이 오지 않음
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl GatewayError {
    /// 사용자에게 보여줄 가장 구체적인 메시지.
    /// 필드 에러 목록이 있으면 일반 메시지보다 우선합니다.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Status { message, .. } => message.clone(),
            GatewayError::FieldErrors(messages) => messages.join(", "),
            GatewayError::Transport(_) => "서버와 통신 중 오류가 발생했습니다.".to_string(),
            GatewayError::Malformed(detail) => format!("잘못된 응답 형식: {detail}"),
            GatewayError::Timeout(after) => {
                format!("응답 시간이 초과되었습니다 ({}초)", after.as_secs())
            }
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return GatewayError::Malformed(err.to_string());
        }
        match err.status() {
            Some(status) => GatewayError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => GatewayError::Transport(err.to_string()),
        }
    }
}

/// 알림 분류. 검증/분석/원격 삭제 실패를 서로 섞지 않고 구분해서 보고합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Validation,
    SchemaFetchFailed,
    AnalysisFailed,
    VersionNotFound,
    RemoteDeleteFailed,
    SummaryFailed,
    Rejected,
}

/// 사용자에게 동기적으로 보고되는 알림 (원본 UI의 `alert`에 해당)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

// 에러 종류별로 알림 분류와 사용자용 메시지를 정합니다.
impl From<&EditorError> for Notice {
    fn from(err: &EditorError) -> Self {
        let (kind, message) = match err {
            EditorError::InvalidDocType(name) => {
                (NoticeKind::Rejected, format!("알 수 없는 문서 종류입니다: {name}"))
            }
            EditorError::VersionNotFound { doc_type, version } => (
                NoticeKind::VersionNotFound,
                format!(
                    "{} v{}을(를) 찾을 수 없습니다. 편집기를 닫습니다.",
                    doc_type.korean_name(),
                    version
                ),
            ),
            EditorError::SchemaFetchFailed(msg) => {
                // 상세 원인은 로그에만 남기고, 사용자에게는 일반 메시지를 보여줍니다.
                tracing::error!("Schema fetch failed: {}", msg);
                (
                    NoticeKind::SchemaFetchFailed,
                    "문서 스키마를 불러오는 데 실패했습니다.".to_string(),
                )
            }
            EditorError::AnalysisFailed(msg) => {
                (NoticeKind::AnalysisFailed, format!("분석 실패: {msg}"))
            }
            EditorError::ValidationFailed(report) => {
                (NoticeKind::Validation, report.summary.clone())
            }
            EditorError::RemoteDeleteFailed(msg) => (
                NoticeKind::RemoteDeleteFailed,
                format!("롤백 중 오류가 발생했습니다: {msg}"),
            ),
            EditorError::SummaryFailed(msg) => (NoticeKind::SummaryFailed, msg.clone()),
            EditorError::SubmitInFlight(doc_type) => (
                NoticeKind::Rejected,
                format!("{} 분석이 이미 진행 중입니다.", doc_type.korean_name()),
            ),
            EditorError::EditorClosed => {
                (NoticeKind::Rejected, "열려 있는 편집기가 없습니다.".to_string())
            }
            EditorError::UnsupportedSubmit(doc_type) => (
                NoticeKind::Rejected,
                format!("{}는 이 방식으로 제출할 수 없습니다.", doc_type.korean_name()),
            ),
            EditorError::InvalidVersion { .. } => (NoticeKind::Rejected, err.to_string()),
        };

        Notice { kind, message }
    }
}
