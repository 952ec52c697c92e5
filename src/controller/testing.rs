//! 컨트롤러 테스트용 가짜 게이트웨이
//!
//! 호출 횟수와 요청을 기록하고, 지연과 결과를 미리 정해 둘 수 있습니다.
//! 지연은 `tokio::time::sleep`을 쓰므로 `start_paused` 테스트에서 가상 시간으로 흐릅니다.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::EditorController;
use crate::config::EditorSettings;
use crate::error::GatewayError;
use crate::gateway::{AnalysisGateway, SchemaGateway};
use crate::models::{
    AnalysisRequest, AnalysisResponse, DocType, DocumentContent, FieldKind, FieldSpec, FormSchema,
    LoadedDocuments, PortfolioRequest, PortfolioSummary, SchemaSection, SUMMARY_FILE_NAME,
};
use crate::store::VersionStore;

pub(crate) const JOB_TITLE: &str = "백엔드 개발자";

pub(crate) fn controller_with(
    store: VersionStore,
    schemas: FakeSchemas,
    analysis: FakeAnalysis,
) -> (EditorController, Arc<FakeSchemas>, Arc<FakeAnalysis>) {
    let schemas = Arc::new(schemas);
    let analysis = Arc::new(analysis);
    let controller = EditorController::new(
        store,
        schemas.clone(),
        analysis.clone(),
        EditorSettings::new(JOB_TITLE),
    );
    (controller, schemas, analysis)
}

/// 이력서 v0 `{name: "A"}`, v1 `{name: "B"}` (피드백 "first")
pub(crate) fn resume_store_with_v1() -> VersionStore {
    let mut store = VersionStore::new();
    store
        .amend_content(DocType::Resume, 0, DocumentContent::new().with("name", "A"))
        .unwrap();
    store.append(
        DocType::Resume,
        DocumentContent::new().with("name", "B"),
        Some("first".to_string()),
        Default::default(),
    );
    store
}

pub(crate) struct FakeSchemas {
    schema: Option<FormSchema>,
    delays: Mutex<VecDeque<Duration>>,
    calls: AtomicUsize,
}

impl FakeSchemas {
    /// 필수 이름 필드 하나와 자기 소개 필드가 있는 이력서 스키마
    pub(crate) fn resume() -> Self {
        Self::with_fields(vec![
            FieldSpec::new("name", "이름", FieldKind::Text).required(),
            FieldSpec::new("summary", "자기 소개", FieldKind::Textarea),
        ])
    }

    /// 필수 이름 필드 하나뿐인 스키마. 제출 내용이 `{name}` 그대로 저장됩니다.
    pub(crate) fn name_only() -> Self {
        Self::with_fields(vec![FieldSpec::new("name", "이름", FieldKind::Text).required()])
    }

    fn with_fields(fields: Vec<FieldSpec>) -> Self {
        let schema = FormSchema::sections(vec![SchemaSection {
            title: "기본 정보".to_string(),
            name: None,
            repeatable: false,
            fields,
        }]);
        Self {
            schema: Some(schema),
            delays: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            schema: None,
            ..Self::resume()
        }
    }

    /// 호출 순서대로 적용할 지연(ms)
    pub(crate) fn with_delays(self, millis: &[u64]) -> Self {
        *self.delays.lock().unwrap() = millis.iter().copied().map(Duration::from_millis).collect();
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaGateway for FakeSchemas {
    async fn fetch_schema(
        &self,
        _doc_type: DocType,
        _job_title: &str,
    ) -> Result<FormSchema, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.schema.clone().ok_or(GatewayError::Status {
            status: 404,
            message: "Document schema not found".to_string(),
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeAnalysis {
    feedback: Option<String>,
    responses: Mutex<VecDeque<Result<AnalysisResponse, GatewayError>>>,
    delay: Option<Duration>,
    delete_error: Mutex<Option<GatewayError>>,
    delete_delay: Option<Duration>,
    summary_feedback: Option<String>,
    summary_error: Mutex<Option<GatewayError>>,
    loaded: Mutex<Option<Result<LoadedDocuments, GatewayError>>>,

    analyze_calls: AtomicUsize,
    summary_calls: AtomicUsize,
    requests: Mutex<Vec<AnalysisRequest>>,
    deletes: Mutex<Vec<(DocType, u32)>>,
    portfolio_requests: Mutex<Vec<PortfolioRequest>>,
    loaded_for: Mutex<Vec<String>>,
}

impl FakeAnalysis {
    /// 따로 정한 응답이 없을 때 돌려줄 피드백
    pub(crate) fn with_feedback(mut self, feedback: &str) -> Self {
        self.feedback = Some(feedback.to_string());
        self
    }

    pub(crate) fn with_response(self, response: Result<AnalysisResponse, GatewayError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// 분석 호출마다 적용할 지연
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn with_delete_error(self, err: GatewayError) -> Self {
        *self.delete_error.lock().unwrap() = Some(err);
        self
    }

    pub(crate) fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = Some(delay);
        self
    }

    pub(crate) fn with_summary_feedback(mut self, feedback: &str) -> Self {
        self.summary_feedback = Some(feedback.to_string());
        self
    }

    pub(crate) fn with_summary_error(self, err: GatewayError) -> Self {
        *self.summary_error.lock().unwrap() = Some(err);
        self
    }

    pub(crate) fn with_loaded(self, loaded: Result<LoadedDocuments, GatewayError>) -> Self {
        *self.loaded.lock().unwrap() = Some(loaded);
        self
    }

    pub(crate) fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<AnalysisRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub(crate) fn last_portfolio(&self) -> Option<PortfolioRequest> {
        self.portfolio_requests.lock().unwrap().last().cloned()
    }

    pub(crate) fn deletes(&self) -> Vec<(DocType, u32)> {
        self.deletes.lock().unwrap().clone()
    }

    pub(crate) fn loaded_for(&self) -> Vec<String> {
        self.loaded_for.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisGateway for FakeAnalysis {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, GatewayError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.responses.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(AnalysisResponse::new(
                self.feedback.clone().unwrap_or_else(|| "피드백".to_string()),
            ))
        })
    }

    async fn delete_after(
        &self,
        doc_type: DocType,
        _job_title: &str,
        version: u32,
    ) -> Result<(), GatewayError> {
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        self.deletes.lock().unwrap().push((doc_type, version));
        match self.delete_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn summarize_portfolio(
        &self,
        request: &PortfolioRequest,
    ) -> Result<PortfolioSummary, GatewayError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.portfolio_requests.lock().unwrap().push(request.clone());
        if let Some(err) = self.summary_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(PortfolioSummary {
            file_name: SUMMARY_FILE_NAME.to_string(),
            document: b"%PDF-1.4".to_vec(),
            feedback: self.summary_feedback.clone(),
        })
    }

    async fn load_documents(&self, job_title: &str) -> Result<LoadedDocuments, GatewayError> {
        self.loaded_for.lock().unwrap().push(job_title.to_string());
        self.loaded
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(LoadedDocuments::default()))
    }
}
