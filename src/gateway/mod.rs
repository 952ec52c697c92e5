//! # 외부 협력자 게이트웨이
//!
//! 편집기 코어가 의존하는 원격 서비스의 계약을 트레이트로 정의합니다.
//! 실제 전송 방식(HTTP 등)은 구현체가 결정합니다.
//!
//! - `SchemaGateway`: 문서 타입 → 폼 레이아웃
//! - `AnalysisGateway`: 분석/저장, 롤백 삭제, 포트폴리오 요약, 초기 로딩
//!
//! 모든 호출은 `with_timeout`으로 감싸서 응답이 오지 않는 경우도 실패로 처리합니다.

pub mod http;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::{
    AnalysisRequest, AnalysisResponse, DocType, FormSchema, LoadedDocuments, PortfolioRequest,
    PortfolioSummary,
};

pub use http::HttpGateway;

/// 문서 타입별 폼 스키마를 조회하는 협력자
#[async_trait]
pub trait SchemaGateway: Send + Sync {
    async fn fetch_schema(&self, doc_type: DocType, job_title: &str)
        -> Result<FormSchema, GatewayError>;
}

/// 분석/저장 서비스
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// 제출된 내용을 분석하고 피드백을 돌려줍니다.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, GatewayError>;

    /// `version`보다 뒤의 원격 버전을 삭제합니다.
    async fn delete_after(
        &self,
        doc_type: DocType,
        job_title: &str,
        version: u32,
    ) -> Result<(), GatewayError>;

    async fn summarize_portfolio(
        &self,
        request: &PortfolioRequest,
    ) -> Result<PortfolioSummary, GatewayError>;

    /// 이전 세션에 저장된 버전들
    async fn load_documents(&self, job_title: &str) -> Result<LoadedDocuments, GatewayError>;
}

/// 게이트웨이 호출에 타임아웃을 적용합니다.
pub async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Gateway call timed out after {:?}", timeout);
            Err(GatewayError::Timeout(timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_calls_become_timeouts() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, GatewayError>(())
        };
        let err = with_timeout(Duration::from_secs(5), slow).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout(after) if after == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let value = with_timeout(Duration::from_secs(5), async { Ok::<_, GatewayError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
