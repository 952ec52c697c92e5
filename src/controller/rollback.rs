use super::{EditorController, EditorPanel, OpenOutcome};
use crate::error::{EditorError, Notice};
use crate::gateway::with_timeout;
use crate::models::DocType;

const ROLLBACK_LOADING: &str = "데이터베이스 롤백 중...";

/// 되돌리기 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// 대상이 이미 최신 버전이라 할 일이 없음
    Unchanged,
    /// 사용자가 확인 창에서 취소함
    Cancelled,
    RolledBack(RollbackReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackReport {
    pub doc_type: DocType,
    pub version: u32,
    /// 잘려 나간 버전 수
    pub discarded: usize,
    /// 원격 삭제 실패 메시지. 실패해도 로컬 잘라내기는 유지됩니다.
    pub remote_error: Option<String>,
    /// 편집기가 같은 문서를 열고 있었다면 다시 연 결과
    pub reopened: Option<EditorPanel>,
}

impl EditorController {
    /// `version` 이후의 버전을 모두 버립니다.
    ///
    /// `confirm`은 확인 문구("이력서를 v1 버전으로 되돌리시겠습니까?")를 받아
    /// 진행 여부를 돌려줍니다.
    pub async fn rollback<F>(
        &self,
        doc_type: DocType,
        version: u32,
        confirm: F,
    ) -> Result<RollbackOutcome, EditorError>
    where
        F: FnOnce(&str) -> bool,
    {
        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            if version >= state.store.latest(doc_type).version {
                return Ok(RollbackOutcome::Unchanged);
            }
            if let Err(err) = state.store.require(doc_type, version) {
                return state.fail(err);
            }
        }

        let name = doc_type.korean_name();
        if !confirm(&format!("{name}를 v{version} 버전으로 되돌리시겠습니까?")) {
            return Ok(RollbackOutcome::Cancelled);
        }

        let (discarded, editor_open, task) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let discarded = state.store.truncate(doc_type, version);
            let target = state.store.require(doc_type, version)?;
            // 원격 삭제를 기다리지 않고 편집기를 바로 대상 버전으로 옮깁니다.
            let editor_open = match state.panel.as_mut().filter(|p| p.doc_type == doc_type) {
                Some(panel) => {
                    panel.follow(target);
                    true
                }
                None => false,
            };
            if editor_open {
                state.store.set_active(doc_type, version);
            }
            (discarded, editor_open, state.begin_loading(ROLLBACK_LOADING))
        };

        // 원격 삭제는 항상 요청하고, 새 스키마로 다시 열기는 그와 동시에 진행합니다.
        // 열기 실패는 open_version이 이미 알림으로 남깁니다.
        let delete = with_timeout(
            self.settings.request_timeout,
            self.analysis
                .delete_after(doc_type, &self.settings.job_title, version),
        );
        let reopen = async {
            if !editor_open {
                return None;
            }
            match self.open_version(doc_type, version).await {
                Ok(OpenOutcome::Opened(panel)) => Some(panel),
                Ok(OpenOutcome::Superseded) | Err(_) => None,
            }
        };
        let (remote, reopened) = tokio::join!(delete, reopen);

        let remote_error = {
            let mut state = self.state.lock().await;
            state.end_loading(task);
            match remote {
                Ok(()) => {
                    state
                        .notices
                        .push(Notice::info(format!("{name}가 v{version} 버전으로 되돌려졌습니다.")));
                    None
                }
                Err(err) => {
                    let message = err.message();
                    tracing::error!("Remote rollback of {} to v{} failed: {}", doc_type, version, err);
                    state.report(&EditorError::RemoteDeleteFailed(message.clone()));
                    Some(message)
                }
            }
        };

        Ok(RollbackOutcome::RolledBack(RollbackReport {
            doc_type,
            version,
            discarded,
            remote_error,
            reopened,
        }))
    }
}
