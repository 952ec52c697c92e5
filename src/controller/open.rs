use super::{EditorController, EditorPanel};
use crate::error::EditorError;
use crate::gateway::with_timeout;
use crate::models::DocType;
use crate::presenter::form;

const SCHEMA_LOADING: &str = "문서 스키마 로딩 중...";

/// 편집기 열기 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened(EditorPanel),
    /// 스키마를 기다리는 동안 더 새로운 열기(또는 닫기)가 있었음
    Superseded,
}

impl EditorController {
    /// 다이어그램 노드를 눌렀을 때: 해당 버전을 편집기에 엽니다.
    ///
    /// 스키마 조회에 실패하면 편집기는 닫힌 채로 남고 `SchemaFetchFailed`가 보고됩니다.
    /// 없는 버전이면 열려 있던 편집기도 닫습니다.
    pub async fn open_version(
        &self,
        doc_type: DocType,
        version: u32,
    ) -> Result<OpenOutcome, EditorError> {
        let (token, task) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            if let Err(err) = state.store.require(doc_type, version) {
                state.supersede_opens();
                state.close_panel();
                return state.fail(err);
            }
            state.store.set_active(doc_type, version);
            let token = state.supersede_opens();
            (token, state.begin_loading(SCHEMA_LOADING))
        };

        tracing::debug!("Opening {} v{} (token {})", doc_type, version, token);
        let fetched = with_timeout(
            self.settings.request_timeout,
            self.schemas.fetch_schema(doc_type, &self.settings.job_title),
        )
        .await;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.end_loading(task);

        if state.open_token != token {
            tracing::debug!("Discarding stale schema for {} v{}", doc_type, version);
            return Ok(OpenOutcome::Superseded);
        }

        let schema = match fetched {
            Ok(schema) => schema,
            Err(err) => {
                state.close_panel();
                return state.fail(EditorError::SchemaFetchFailed(err.to_string()));
            }
        };

        // 스키마를 기다리는 동안 롤백으로 버전이 사라졌을 수 있습니다.
        let current = match state.store.require(doc_type, version) {
            Ok(current) => current,
            Err(err) => {
                state.close_panel();
                return state.fail(err);
            }
        };

        let panel = EditorPanel::new(current, form::render(doc_type, &schema, &current.content));
        state.panel = Some(panel.clone());
        Ok(OpenOutcome::Opened(panel))
    }
}
