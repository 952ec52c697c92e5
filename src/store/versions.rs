use std::collections::BTreeMap;

use crate::error::EditorError;
use crate::models::{DocType, DocumentContent, DocumentVersion, LoadedDocuments};

/// 편집기가 현재 열고 있는 (문서 타입, 버전)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCursor {
    pub doc_type: DocType,
    pub version: u32,
}

/// 문서 타입별 버전 목록과 활성 커서
///
/// 불변식:
/// - 모든 타입의 목록은 비어 있지 않고 v0이 항상 있습니다.
/// - 목록은 버전 오름차순이며 중복 번호가 없습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionStore {
    lanes: BTreeMap<DocType, Vec<DocumentVersion>>,
    active: Option<ActiveCursor>,
}

impl Default for VersionStore {
    fn default() -> Self {
        Self::initialize(None)
    }
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이전 세션의 버전을 받아 저장소를 만듭니다.
    ///
    /// 첫 버전이 0보다 크면 빈 v0을 앞에 만들어 넣습니다.
    /// `None`이면 세 타입 모두 v0만 가진 기본 상태가 됩니다.
    pub fn initialize(loaded: Option<LoadedDocuments>) -> Self {
        let mut loaded = loaded.unwrap_or_default();
        let mut lanes = BTreeMap::new();

        for doc_type in DocType::ALL {
            let mut versions: Vec<DocumentVersion> = loaded
                .take(doc_type)
                .into_iter()
                .map(|stored| stored.into_version(doc_type))
                .collect();

            versions.sort_by_key(|v| v.version);
            let before = versions.len();
            versions.dedup_by_key(|v| v.version);
            if versions.len() != before {
                tracing::warn!(
                    "Dropped {} duplicate loaded versions for {}",
                    before - versions.len(),
                    doc_type
                );
            }

            if versions.first().map_or(true, |first| first.version > 0) {
                versions.insert(0, DocumentVersion::root(doc_type));
            }

            tracing::debug!("Initialized {} with {} versions", doc_type, versions.len());
            lanes.insert(doc_type, versions);
        }

        Self { lanes, active: None }
    }

    /// 오름차순 버전 목록
    pub fn versions(&self, doc_type: DocType) -> &[DocumentVersion] {
        self.lanes.get(&doc_type).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get(&self, doc_type: DocType, version: u32) -> Option<&DocumentVersion> {
        let versions = self.versions(doc_type);
        versions
            .binary_search_by_key(&version, |v| v.version)
            .ok()
            .map(|index| &versions[index])
    }

    /// `get`과 같지만 없으면 `VersionNotFound`
    pub fn require(&self, doc_type: DocType, version: u32) -> Result<&DocumentVersion, EditorError> {
        self.get(doc_type, version)
            .ok_or(EditorError::VersionNotFound { doc_type, version })
    }

    pub fn latest(&self, doc_type: DocType) -> &DocumentVersion {
        let versions = self.versions(doc_type);
        // 목록은 항상 v0을 포함하므로 비어 있지 않습니다.
        &versions[versions.len() - 1]
    }

    pub fn is_latest(&self, doc_type: DocType, version: u32) -> bool {
        self.latest(doc_type).version == version
    }

    /// 다음에 추가될 버전 번호.
    /// 번호에 빈틈이 없으면 목록 길이와 같습니다.
    pub fn next_version(&self, doc_type: DocType) -> u32 {
        self.latest(doc_type).version + 1
    }

    /// 다음 번호로 새 버전을 추가합니다.
    pub fn append(
        &mut self,
        doc_type: DocType,
        content: DocumentContent,
        overall_feedback: Option<String>,
        individual_feedbacks: BTreeMap<String, String>,
    ) -> &DocumentVersion {
        let version = self.next_version(doc_type);
        self.push(DocumentVersion::new(
            doc_type,
            version,
            content,
            overall_feedback,
            individual_feedbacks,
        ))
    }

    /// 서버가 정한 번호로 새 버전을 추가합니다. 번호는 최신 버전보다 커야 합니다.
    pub fn append_at(
        &mut self,
        doc_type: DocType,
        version: u32,
        content: DocumentContent,
        overall_feedback: Option<String>,
        individual_feedbacks: BTreeMap<String, String>,
    ) -> Result<&DocumentVersion, EditorError> {
        let latest = self.latest(doc_type).version;
        if version <= latest {
            return Err(EditorError::InvalidVersion {
                doc_type,
                version,
                latest,
            });
        }
        Ok(self.push(DocumentVersion::new(
            doc_type,
            version,
            content,
            overall_feedback,
            individual_feedbacks,
        )))
    }

    fn push(&mut self, version: DocumentVersion) -> &DocumentVersion {
        let doc_type = version.doc_type;
        tracing::info!("Added {} v{}", doc_type, version.version);
        let versions = self.lanes.entry(doc_type).or_default();
        versions.push(version);
        &versions[versions.len() - 1]
    }

    /// 편집 중인 버전의 내용을 그 자리에서 교체합니다. 피드백은 유지됩니다.
    pub fn amend_content(
        &mut self,
        doc_type: DocType,
        version: u32,
        content: DocumentContent,
    ) -> Result<(), EditorError> {
        let target = self
            .lanes
            .get_mut(&doc_type)
            .and_then(|versions| versions.iter_mut().find(|v| v.version == version))
            .ok_or(EditorError::VersionNotFound { doc_type, version })?;

        target.replace_content(content);
        tracing::debug!("Amended content of {} v{}", doc_type, version);
        Ok(())
    }

    /// `keep_through`보다 큰 버전을 모두 버리고, 버린 개수를 돌려줍니다.
    ///
    /// `keep_through`가 최신 버전 이상이면 아무것도 하지 않습니다.
    /// v0은 어떤 경우에도 남습니다.
    pub fn truncate(&mut self, doc_type: DocType, keep_through: u32) -> usize {
        let Some(versions) = self.lanes.get_mut(&doc_type) else {
            return 0;
        };
        let keep = versions.partition_point(|v| v.version <= keep_through);
        let discarded = versions.len() - keep;
        if discarded > 0 {
            versions.truncate(keep);
            tracing::info!(
                "Truncated {} to v{} ({} versions discarded)",
                doc_type,
                keep_through,
                discarded
            );
        }
        discarded
    }

    pub fn set_active(&mut self, doc_type: DocType, version: u32) {
        self.active = Some(ActiveCursor { doc_type, version });
    }

    pub fn active(&self) -> Option<ActiveCursor> {
        self.active
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }
}
