//! # 프레젠터
//!
//! 화면을 직접 그리지 않고, 현재 상태에서 뷰 모델 값을 만들어 냅니다.
//! 상태가 바뀔 때마다 처음부터 다시 계산합니다.
//!
//! - `form`: 스키마 + 문서 내용 → 입력 폼, 편집된 값 → 문서 내용
//! - `diagram`: VersionStore → 문서 타입별 레인 다이어그램

pub mod diagram;
pub mod form;

pub use diagram::*;
pub use form::*;
