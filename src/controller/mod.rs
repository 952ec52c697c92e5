//! # 편집 흐름 컨트롤러
//!
//! 다이어그램 클릭, 폼 제출, 롤백을 받아 VersionStore와 게이트웨이를 조율합니다.
//!
//! ## 동작
//! - `open_version`     → 노드 클릭: 스키마를 받아 편집기를 엽니다
//! - `submit`           → 저장 및 분석: 새 버전을 만들고 피드백을 붙입니다
//! - `submit_portfolio` → 요약 및 다운: 포트폴리오 요약 문서를 받습니다
//! - `rollback`         → 되돌리기: 지정 버전 이후를 잘라냅니다
//! - `close_editor`     → 편집기 닫기: 입력값을 열려 있던 버전에 저장합니다
//! - `bootstrap`        → 이전 세션의 버전으로 시작합니다
//!
//! ## 상태 잠금
//! 모든 상태는 `tokio::sync::Mutex` 하나 안에 있습니다.
//! 잠금은 동기 구간에서만 잡고, 게이트웨이 호출(`.await`) 동안에는 절대 쥐고 있지 않습니다.
//! 그래서 저장소 변경은 항상 한 번에 끝나고, 느린 호출이 다른 동작을 막지 않습니다.
//!
//! ## 요청 토큰
//! 편집기를 열 때마다 `open_token`이 1 증가합니다.
//! 스키마 응답이 도착했을 때 토큰이 바뀌어 있으면 더 새로운 열기가 있었다는 뜻이므로 버립니다.

mod open;
mod portfolio;
mod rollback;
mod session;
mod submit;

#[cfg(test)]
mod testing;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::EditorSettings;
use crate::error::{EditorError, Notice};
use crate::gateway::{AnalysisGateway, SchemaGateway};
use crate::models::{DocType, DocumentContent, DocumentVersion};
use crate::presenter::{Diagram, FormView};
use crate::store::VersionStore;

pub use open::OpenOutcome;
pub use portfolio::PortfolioOutcome;
pub use rollback::{RollbackOutcome, RollbackReport};
pub use submit::SubmitOutcome;

/// 편집기 오른쪽의 AI 피드백 영역
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackPanel {
    pub overall: Option<String>,
    pub individual: BTreeMap<String, String>,
    /// 마지막 제출이 실패했을 때의 메시지 ("오류: ...")
    pub error: Option<String>,
}

impl FeedbackPanel {
    pub fn from_version(version: &DocumentVersion) -> Self {
        Self {
            overall: version.overall_feedback.clone(),
            individual: version.individual_feedbacks.clone(),
            error: None,
        }
    }

    /// 보여줄 피드백이 없는 빈 상태
    pub fn is_empty(&self) -> bool {
        self.overall.is_none() && self.individual.is_empty() && self.error.is_none()
    }
}

/// 열려 있는 편집기
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorPanel {
    pub doc_type: DocType,
    pub version: u32,
    /// 예: "이력서 편집 (v1)"
    pub title: String,
    pub form: FormView,
    pub feedback: FeedbackPanel,
}

impl EditorPanel {
    fn new(version: &DocumentVersion, form: FormView) -> Self {
        Self {
            doc_type: version.doc_type,
            version: version.version,
            title: version.doc_type.editor_title(version.version),
            form,
            feedback: FeedbackPanel::from_version(version),
        }
    }

    fn shows(&self, doc_type: DocType, version: u32) -> bool {
        self.doc_type == doc_type && self.version == version
    }

    /// 새로 만들어진 버전으로 편집기를 옮깁니다.
    fn follow(&mut self, version: &DocumentVersion) {
        self.version = version.version;
        self.title = version.doc_type.editor_title(version.version);
        self.form.refill(&version.content);
        self.form.clear_errors();
        self.feedback = FeedbackPanel::from_version(version);
    }
}

/// 잠금 안에서만 접근하는 컨트롤러 상태
#[derive(Debug)]
struct EditorState {
    store: VersionStore,
    panel: Option<EditorPanel>,
    /// 진행 중인 작업 id → 로딩 메시지
    loading: BTreeMap<u64, &'static str>,
    task_seq: u64,
    notices: Vec<Notice>,
    open_token: u64,
    /// 분석/요약이 진행 중인 문서 타입
    submitting: BTreeSet<DocType>,
}

impl EditorState {
    fn new(store: VersionStore) -> Self {
        Self {
            store,
            panel: None,
            loading: BTreeMap::new(),
            task_seq: 0,
            notices: Vec::new(),
            open_token: 0,
            submitting: BTreeSet::new(),
        }
    }

    fn begin_loading(&mut self, message: &'static str) -> u64 {
        self.task_seq += 1;
        self.loading.insert(self.task_seq, message);
        self.task_seq
    }

    fn end_loading(&mut self, task: u64) {
        self.loading.remove(&task);
    }

    fn report(&mut self, err: &EditorError) {
        self.notices.push(Notice::from(err));
    }

    /// 에러를 알림으로 남기고 그대로 돌려줍니다.
    fn fail<T>(&mut self, err: EditorError) -> Result<T, EditorError> {
        self.report(&err);
        Err(err)
    }

    /// 진행 중인 열기를 모두 무효화합니다.
    fn supersede_opens(&mut self) -> u64 {
        self.open_token += 1;
        self.open_token
    }

    fn close_panel(&mut self) {
        self.panel = None;
        self.store.clear_active();
    }

    /// 분석 피드백을 확정합니다.
    ///
    /// 1. 부모 버전(편집을 시작한 버전)의 내용을 제출 내용으로 교체 (피드백은 그대로)
    /// 2. 부모가 최신이 아니면 부모 이후를 잘라냄
    /// 3. 제출 내용과 새 피드백으로 자식 버전을 추가
    /// 4. 편집기가 부모나 잘려 나간 버전을 보고 있으면 자식으로 옮김
    fn commit_feedback(
        &mut self,
        doc_type: DocType,
        parent: u32,
        content: DocumentContent,
        overall_feedback: Option<String>,
        individual_feedbacks: BTreeMap<String, String>,
        canonical_version: Option<u32>,
    ) -> Result<(u32, usize), EditorError> {
        // 분석을 기다리는 동안 롤백으로 부모가 사라졌을 수 있습니다.
        if self.store.get(doc_type, parent).is_none() {
            if self.panel.as_ref().is_some_and(|p| p.shows(doc_type, parent)) {
                self.close_panel();
            }
            return self.fail(EditorError::VersionNotFound {
                doc_type,
                version: parent,
            });
        }

        let cursor = self.store.active();
        self.store.amend_content(doc_type, parent, content.clone())?;
        let truncated = self.store.truncate(doc_type, parent);

        let created = match canonical_version {
            Some(version) if version > parent => {
                self.store
                    .append_at(
                        doc_type,
                        version,
                        content,
                        overall_feedback,
                        individual_feedbacks,
                    )?
                    .version
            }
            other => {
                if let Some(version) = other {
                    tracing::warn!(
                        "Ignoring server version v{} for {} (parent is v{})",
                        version,
                        doc_type,
                        parent
                    );
                }
                self.store
                    .append(doc_type, content, overall_feedback, individual_feedbacks)
                    .version
            }
        };

        // 분석을 기다리는 동안 부모보다 뒤의 버전을 열었다면 그 버전은 방금 잘려 나갔습니다.
        let stale = |version: u32| version > parent;
        if let Some(panel) = self
            .panel
            .as_mut()
            .filter(|p| p.doc_type == doc_type && p.version >= parent)
        {
            if stale(panel.version) {
                tracing::warn!(
                    "{} v{} was replaced by the analysis result, moving editor to v{}",
                    doc_type,
                    panel.version,
                    created
                );
            }
            let version = self.store.require(doc_type, created)?;
            panel.follow(version);
            self.store.set_active(doc_type, created);
        } else if cursor.is_some_and(|c| c.doc_type == doc_type && stale(c.version)) {
            self.store.set_active(doc_type, created);
        }

        Ok((created, truncated))
    }
}

/// 편집 흐름 컨트롤러
///
/// 한 편집 세션에 하나만 만들고, `Arc`로 감싸 여러 작업에서 공유할 수 있습니다.
pub struct EditorController {
    state: Mutex<EditorState>,
    schemas: Arc<dyn SchemaGateway>,
    analysis: Arc<dyn AnalysisGateway>,
    settings: EditorSettings,
}

impl EditorController {
    pub fn new(
        store: VersionStore,
        schemas: Arc<dyn SchemaGateway>,
        analysis: Arc<dyn AnalysisGateway>,
        settings: EditorSettings,
    ) -> Self {
        Self {
            state: Mutex::new(EditorState::new(store)),
            schemas,
            analysis,
            settings,
        }
    }

    pub fn job_title(&self) -> &str {
        &self.settings.job_title
    }

    /// 열려 있는 편집기 (닫혀 있으면 None)
    pub async fn panel(&self) -> Option<EditorPanel> {
        self.state.lock().await.panel.clone()
    }

    /// 저장소 스냅샷
    pub async fn store(&self) -> VersionStore {
        self.state.lock().await.store.clone()
    }

    pub async fn diagram(&self) -> Diagram {
        let state = self.state.lock().await;
        Diagram::render(&state.store, &self.settings.job_title)
    }

    /// 가장 최근에 시작된 작업의 로딩 메시지
    pub async fn loading(&self) -> Option<&'static str> {
        self.state.lock().await.loading.values().next_back().copied()
    }

    /// 쌓인 알림을 꺼냅니다. 꺼낸 알림은 다시 나오지 않습니다.
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().await.notices)
    }
}
