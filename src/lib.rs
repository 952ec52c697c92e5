//! # seoryu: 서류 편집기 상태 관리 코어
//!
//! 이력서 / 자기소개서 / 포트폴리오를 버전 단위로 편집하는 도구의 클라이언트 측 코어입니다.
//!
//! ## 모듈 구성
//! - `config`: 환경변수 설정 (API 주소, 직무, 타임아웃)
//! - `error`: 에러 타입과 사용자 알림 변환
//! - `models`: 문서 타입, 문서 내용, 버전, 스키마, 분석 요청/응답
//! - `store`: 문서 타입별 버전 목록 (VersionStore)
//! - `gateway`: 스키마/분석 서비스 트레이트와 HTTP 구현체
//! - `presenter`: 입력 폼과 버전 다이어그램 뷰 모델
//! - `controller`: 열기, 제출, 롤백 흐름 조율
//!
//! ## 사용 예
//! ```no_run
//! use std::sync::Arc;
//! use seoryu::{Config, EditorController, HttpGateway};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! seoryu::init_tracing();
//! let config = Config::load()?;
//! let gateway = Arc::new(HttpGateway::from_config(&config));
//! let controller =
//!     EditorController::bootstrap(gateway.clone(), gateway, config.editor_settings()).await;
//! println!("{}", controller.diagram().await);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod models;
pub mod presenter;
pub mod store;

pub use config::{Config, EditorSettings};
pub use controller::{
    EditorController, EditorPanel, FeedbackPanel, OpenOutcome, PortfolioOutcome, RollbackOutcome,
    RollbackReport, SubmitOutcome,
};
pub use error::{EditorError, GatewayError, Notice, NoticeKind};
pub use gateway::{AnalysisGateway, HttpGateway, SchemaGateway};
pub use models::DocType;
pub use presenter::{Diagram, DiagramAction, DiagramHit, FormView};
pub use store::VersionStore;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 로그 출력을 초기화합니다.
///
/// `RUST_LOG`가 없으면 이 크레이트의 debug 로그를 출력합니다.
/// 이미 다른 구독자가 등록되어 있으면 아무것도 하지 않습니다.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seoryu=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
