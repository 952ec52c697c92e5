use std::sync::Arc;

use super::EditorController;
use crate::config::EditorSettings;
use crate::error::EditorError;
use crate::gateway::{with_timeout, AnalysisGateway, SchemaGateway};
use crate::models::{DocType, DocumentContent};
use crate::presenter::form;
use crate::store::VersionStore;

impl EditorController {
    /// 이전 세션에 저장된 버전을 불러와 컨트롤러를 만듭니다.
    ///
    /// 불러오기에 실패하면 세 문서 모두 v0만 있는 기본 상태로 시작합니다.
    pub async fn bootstrap(
        schemas: Arc<dyn SchemaGateway>,
        analysis: Arc<dyn AnalysisGateway>,
        settings: EditorSettings,
    ) -> Self {
        let loaded = match with_timeout(
            settings.request_timeout,
            analysis.load_documents(&settings.job_title),
        )
        .await
        {
            Ok(documents) => Some(documents),
            Err(err) => {
                tracing::warn!("Failed to load saved documents, starting fresh: {}", err);
                None
            }
        };

        Self::new(VersionStore::initialize(loaded), schemas, analysis, settings)
    }

    /// 편집기를 닫습니다.
    ///
    /// `edited`가 있으면 검증 없이 열려 있던 버전에 내용을 저장합니다.
    /// 내용이 바뀌지 않았으면 저장하지 않습니다. 포트폴리오는 제출할 때만 저장됩니다.
    /// 진행 중인 열기는 모두 무효가 됩니다.
    ///
    /// 저장했으면 `true`를 돌려줍니다.
    pub async fn close_editor(&self, edited: Option<&DocumentContent>) -> Result<bool, EditorError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.supersede_opens();

        let Some(panel) = state.panel.take() else {
            return Ok(false);
        };
        state.store.clear_active();

        let Some(edited) = edited.filter(|_| panel.doc_type != DocType::Portfolio) else {
            return Ok(false);
        };
        let content = form::snapshot(&panel.form, edited);

        // 롤백으로 이미 사라진 버전이면 저장할 곳이 없습니다.
        let Some(current) = state.store.get(panel.doc_type, panel.version) else {
            tracing::debug!("{} v{} is gone, nothing to save", panel.doc_type, panel.version);
            return Ok(false);
        };
        if current.content_hash == content.content_hash() {
            return Ok(false);
        }

        state
            .store
            .amend_content(panel.doc_type, panel.version, content)?;
        Ok(true)
    }
}
