//! # 버전 저장소
//!
//! 세션 동안 모든 문서 타입의 버전 목록을 메모리에 보관합니다.
//! 전역 변수가 아니라 세션마다 만들어 컨트롤러에 넘기는 값입니다.

pub mod versions;

pub use versions::*;
