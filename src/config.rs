//! # 편집기 설정(Configuration) 모듈
//!
//! 환경변수에서 편집기 세션 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `EDITOR_API_BASE`: 분석/저장 서비스의 기본 URL (필수)
//! - `EDITOR_JOB_TITLE`: 지원 직무 (필수, 모든 요청의 job context)
//! - `EDITOR_AUTH_TOKEN`: 환경이 제공하는 Bearer 토큰 (선택)
//! - `EDITOR_REQUEST_TIMEOUT_SECS`: 게이트웨이 호출 타임아웃 (기본 30초)
//! - `EDITOR_MAX_UPLOAD_BYTES`: 포트폴리오 PDF 최대 크기 (기본 10MB)

use std::env;
use std::time::Duration;

/// 게이트웨이 호출 기본 타임아웃(초)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 서버가 허용하는 포트폴리오 PDF 최대 크기 (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 편집 세션 전체 설정을 담는 구조체
///
/// 세션 시작 시 환경변수에서 한 번 읽어온 후,
/// HTTP 게이트웨이와 컨트롤러가 나눠 씁니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 분석/저장 서비스 기본 URL (예: "http://localhost:8000")
    pub api_base: String,
    /// 지원 직무 (예: "백엔드 개발자")
    pub job_title: String,
    /// 인증 토큰. 인증 로직 자체는 이 크레이트의 범위 밖입니다.
    pub auth_token: Option<String>,
    /// 게이트웨이 호출 타임아웃
    pub request_timeout: Duration,
    /// 포트폴리오 업로드 최대 바이트 수
    pub max_upload_bytes: usize,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `EDITOR_API_BASE`와 `EDITOR_JOB_TITLE`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            api_base: env::var("EDITOR_API_BASE")?,
            job_title: env::var("EDITOR_JOB_TITLE")?,

            // 빈 문자열 토큰은 토큰이 없는 것으로 취급합니다.
            auth_token: env::var("EDITOR_AUTH_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),

            // 숫자 변환 실패 시 기본값을 사용합니다.
            request_timeout: Duration::from_secs(
                env::var("EDITOR_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            max_upload_bytes: env::var("EDITOR_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    /// `.env` 파일을 먼저 읽은 뒤 `from_env()`를 호출합니다.
    /// `.env` 파일이 없어도 에러 없이 넘어갑니다.
    pub fn load() -> Result<Self, env::VarError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// 컨트롤러가 쓰는 설정만 골라냅니다.
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            job_title: self.job_title.clone(),
            request_timeout: self.request_timeout,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// 컨트롤러 설정 (연결 정보는 게이트웨이 쪽에만 있습니다)
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub job_title: String,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl EditorSettings {
    pub fn new(job_title: impl Into<String>) -> Self {
        Self {
            job_title: job_title.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
