use std::collections::BTreeMap;

use super::{EditorController, EditorState};
use crate::error::{EditorError, Notice};
use crate::gateway::with_timeout;
use crate::models::{DocType, DocumentContent, PortfolioRequest, PortfolioSummary, PortfolioUpload};
use crate::presenter::{FieldError, ValidationReport};

const SUMMARY_LOADING: &str = "포트폴리오 요약 및 PDF 생성 중...";
const MISSING_UPLOAD: &str = "포트폴리오 PDF 파일을 업로드하거나 링크를 입력하세요.";

/// 요약 및 다운 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioOutcome {
    /// 내려받을 요약 문서
    pub summary: PortfolioSummary,
    /// 서비스가 피드백을 돌려줘서 새 버전이 만들어졌으면 그 번호
    pub version: Option<u32>,
}

fn upload_error(message: String) -> ValidationReport {
    ValidationReport {
        field_errors: vec![FieldError {
            field: "portfolio_pdf".to_string(),
            message: message.clone(),
        }],
        summary: message,
    }
}

impl EditorState {
    /// 업로드 검사 후 링크를 편집 중인 버전에 저장합니다. PDF 자체는 저장하지 않습니다.
    fn prepare_summary(
        &mut self,
        upload: &PortfolioUpload,
        max_upload_bytes: usize,
    ) -> Result<(u32, DocumentContent), EditorError> {
        let Some(panel) = self.panel.as_mut() else {
            return self.fail(EditorError::EditorClosed);
        };
        if panel.doc_type != DocType::Portfolio {
            let doc_type = panel.doc_type;
            return self.fail(EditorError::UnsupportedSubmit(doc_type));
        }
        if self.submitting.contains(&DocType::Portfolio) {
            return self.fail(EditorError::SubmitInFlight(DocType::Portfolio));
        }

        let too_large = upload
            .file
            .as_ref()
            .filter(|file| file.bytes.len() > max_upload_bytes);
        let report = if upload.is_empty() {
            Some(upload_error(MISSING_UPLOAD.to_string()))
        } else {
            too_large.map(|file| {
                upload_error(format!(
                    "{}의 크기가 너무 큽니다. 최대 {}MB까지 업로드할 수 있습니다.",
                    file.file_name,
                    max_upload_bytes / (1024 * 1024)
                ))
            })
        };
        if let Some(report) = report {
            panel.form.mark_errors(&report);
            return self.fail(EditorError::ValidationFailed(report));
        }
        panel.form.clear_errors();
        panel.feedback.error = None;

        let version = panel.version;
        let content =
            DocumentContent::new().with("portfolio_link", upload.trimmed_link().unwrap_or_default());
        panel.form.refill(&content);
        self.store
            .amend_content(DocType::Portfolio, version, content.clone())?;
        self.submitting.insert(DocType::Portfolio);
        Ok((version, content))
    }
}

impl EditorController {
    /// 포트폴리오 요약 및 다운
    ///
    /// PDF 파일과 링크 중 하나 이상이 있어야 합니다.
    /// 서비스가 피드백 텍스트도 돌려주면 분석 피드백과 같은 방식으로 새 버전에 붙입니다.
    pub async fn submit_portfolio(
        &self,
        upload: PortfolioUpload,
    ) -> Result<PortfolioOutcome, EditorError> {
        let (parent, content, task) = {
            let mut state = self.state.lock().await;
            let (parent, content) = state.prepare_summary(&upload, self.settings.max_upload_bytes)?;
            (parent, content, state.begin_loading(SUMMARY_LOADING))
        };

        let request = PortfolioRequest {
            job_title: self.settings.job_title.clone(),
            upload,
        };
        let result = with_timeout(
            self.settings.request_timeout,
            self.analysis.summarize_portfolio(&request),
        )
        .await;

        let mut state = self.state.lock().await;
        state.end_loading(task);
        state.submitting.remove(&DocType::Portfolio);

        let mut summary = match result {
            Ok(summary) => summary,
            Err(err) => {
                let message = err.message();
                tracing::error!("Portfolio summary failed: {}", err);
                state.show_submit_error(DocType::Portfolio, parent, &content, &message);
                return state.fail(EditorError::SummaryFailed(message));
            }
        };

        let version = match summary.feedback.take() {
            Some(feedback) => {
                let (version, _) = state.commit_feedback(
                    DocType::Portfolio,
                    parent,
                    content,
                    Some(feedback.clone()),
                    BTreeMap::new(),
                    None,
                )?;
                summary.feedback = Some(feedback);
                Some(version)
            }
            None => None,
        };

        tracing::info!(
            "Received portfolio summary {} ({} bytes)",
            summary.file_name,
            summary.document.len()
        );
        state.notices.push(Notice::info("요약 PDF가 다운로드되었습니다."));
        Ok(PortfolioOutcome { summary, version })
    }
}
