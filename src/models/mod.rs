//! # 데이터 모델 모듈
//!
//! 편집기에서 사용하는 데이터 구조체들을 정의합니다.
//! - `document`: 문서 타입(DocType)과 문서 내용(DocumentContent)
//! - `version`: 문서 버전(DocumentVersion)과 원격에서 불러온 버전 레코드
//! - `schema`: 스키마 게이트웨이가 돌려주는 필드 레이아웃
//! - `analysis`: 분석/포트폴리오 요약 요청과 응답

pub mod analysis;
pub mod document;
pub mod schema;
pub mod version;

pub use analysis::*;
pub use document::*;
pub use schema::*;
pub use version::*;
