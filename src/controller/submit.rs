use super::{EditorController, EditorState, FeedbackPanel};
use crate::error::{EditorError, Notice};
use crate::gateway::with_timeout;
use crate::models::{AnalysisRequest, DocType, DocumentContent};
use crate::presenter::form;

const ANALYSIS_LOADING: &str = "AI 분석 중...";

/// 저장 및 분석 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub doc_type: DocType,
    /// 새로 만들어진 버전
    pub version: u32,
    /// 편집한 버전이 최신이 아니어서 버려진 버전 수
    pub discarded: usize,
    pub feedback: FeedbackPanel,
}

impl EditorState {
    /// 제출 전 검사. 통과하면 분석 요청을 만들고 해당 타입을 "진행 중"으로 표시합니다.
    fn prepare_analysis(
        &mut self,
        edited: &DocumentContent,
        job_title: &str,
    ) -> Result<AnalysisRequest, EditorError> {
        let Some(panel) = self.panel.as_mut() else {
            return self.fail(EditorError::EditorClosed);
        };
        let (doc_type, version) = (panel.doc_type, panel.version);
        if doc_type == DocType::Portfolio {
            return self.fail(EditorError::UnsupportedSubmit(doc_type));
        }
        if self.submitting.contains(&doc_type) {
            return self.fail(EditorError::SubmitInFlight(doc_type));
        }

        let document_content = match form::collect(&panel.form, edited) {
            Ok(content) => content,
            Err(report) => {
                panel.form.refill(edited);
                panel.form.mark_errors(&report);
                return self.fail(EditorError::ValidationFailed(report));
            }
        };
        panel.form.clear_errors();
        panel.feedback.error = None;

        self.submitting.insert(doc_type);
        Ok(AnalysisRequest {
            job_title: job_title.to_string(),
            doc_type,
            document_content,
            version,
        })
    }

    /// 제출 실패를 편집기의 피드백 영역에도 표시합니다. 저장소는 건드리지 않습니다.
    pub(super) fn show_submit_error(
        &mut self,
        doc_type: DocType,
        version: u32,
        edited: &DocumentContent,
        message: &str,
    ) {
        if let Some(panel) = self.panel.as_mut().filter(|p| p.shows(doc_type, version)) {
            panel.form.refill(edited);
            panel.feedback.error = Some(format!("오류: {message}"));
        }
    }
}

impl EditorController {
    /// 저장 및 분석
    ///
    /// 필수 입력이 비어 있으면 네트워크 호출 없이 `ValidationFailed`를 돌려줍니다.
    /// 분석에 성공하면 편집한 버전의 자식으로 새 버전이 만들어지고, 편집기가 새 버전으로 옮겨갑니다.
    /// 분석에 실패하면 저장소는 그대로이고, 입력값은 폼에 남습니다.
    pub async fn submit(&self, edited: &DocumentContent) -> Result<SubmitOutcome, EditorError> {
        let (request, task) = {
            let mut state = self.state.lock().await;
            let request = state.prepare_analysis(edited, &self.settings.job_title)?;
            (request, state.begin_loading(ANALYSIS_LOADING))
        };
        let (doc_type, parent) = (request.doc_type, request.version);

        let result = with_timeout(self.settings.request_timeout, self.analysis.analyze(&request)).await;

        let mut state = self.state.lock().await;
        state.end_loading(task);
        state.submitting.remove(&doc_type);

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                let message = err.message();
                tracing::error!("Analysis of {} v{} failed: {}", doc_type, parent, err);
                state.show_submit_error(doc_type, parent, edited, &message);
                return state.fail(EditorError::AnalysisFailed(message));
            }
        };

        let overall = Some(response.feedback).filter(|text| !text.trim().is_empty());
        let (version, discarded) = state.commit_feedback(
            doc_type,
            parent,
            request.document_content,
            overall,
            response.individual_feedbacks,
            response.version,
        )?;

        let feedback = state
            .store
            .get(doc_type, version)
            .map(FeedbackPanel::from_version)
            .unwrap_or_default();
        state
            .notices
            .push(Notice::info("문서가 저장되고 분석되었습니다. AI 피드백을 확인하세요."));

        Ok(SubmitOutcome {
            doc_type,
            version,
            discarded,
            feedback,
        })
    }
}
