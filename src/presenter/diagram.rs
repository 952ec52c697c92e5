//! # 버전 다이어그램
//!
//! 직무 노드 아래에 문서 타입별 레인을 두고, 각 레인에 버전 노드를 오름차순으로 놓습니다.
//! 최신이 아닌 노드에는 "v{n} 되돌리기" 버튼이 붙습니다.
//!
//! `Diagram::render`는 `VersionStore`만 보고 결과를 만드는 순수 함수입니다.

use std::fmt;

use serde::Serialize;

use crate::models::DocType;
use crate::store::VersionStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackButton {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    pub doc_type: DocType,
    pub version: u32,
    /// 예: "이력서 (v1)"
    pub label: String,
    pub is_latest: bool,
    pub is_active: bool,
    pub has_feedback: bool,
    pub rollback: Option<RollbackButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lane {
    pub doc_type: DocType,
    pub nodes: Vec<DiagramNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagram {
    pub job_title: String,
    pub lanes: Vec<Lane>,
}

/// 사용자가 누른 곳
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramHit {
    Job,
    Node { doc_type: DocType, version: u32 },
    /// 노드 위의 되돌리기 버튼. 노드 클릭으로 이어지지 않습니다.
    Rollback { doc_type: DocType, version: u32 },
}

/// 클릭이 컨트롤러에 요청하는 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramAction {
    Open { doc_type: DocType, version: u32 },
    Rollback { doc_type: DocType, version: u32 },
}

impl Diagram {
    pub fn render(store: &VersionStore, job_title: &str) -> Self {
        let active = store.active();
        let lanes = DocType::ALL
            .into_iter()
            .map(|doc_type| {
                let latest = store.latest(doc_type).version;
                let nodes = store
                    .versions(doc_type)
                    .iter()
                    .map(|version| {
                        let is_latest = version.version == latest;
                        DiagramNode {
                            doc_type,
                            version: version.version,
                            label: version.display_label(),
                            is_latest,
                            is_active: active.is_some_and(|cursor| {
                                cursor.doc_type == doc_type && cursor.version == version.version
                            }),
                            has_feedback: version.has_feedback(),
                            rollback: (!is_latest).then(|| RollbackButton {
                                label: format!("v{} 되돌리기", version.version),
                            }),
                        }
                    })
                    .collect();
                Lane { doc_type, nodes }
            })
            .collect();

        Self {
            job_title: job_title.to_string(),
            lanes,
        }
    }

    pub fn lane(&self, doc_type: DocType) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.doc_type == doc_type)
    }

    pub fn node(&self, doc_type: DocType, version: u32) -> Option<&DiagramNode> {
        self.lane(doc_type)?
            .nodes
            .iter()
            .find(|node| node.version == version)
    }

    /// 클릭을 동작으로 바꿉니다.
    ///
    /// 다이어그램에 없는 노드나, 버튼이 없는 노드(최신 버전)의 되돌리기는 무시합니다.
    pub fn dispatch(&self, hit: DiagramHit) -> Option<DiagramAction> {
        match hit {
            DiagramHit::Job => None,
            DiagramHit::Node { doc_type, version } => self
                .node(doc_type, version)
                .map(|_| DiagramAction::Open { doc_type, version }),
            DiagramHit::Rollback { doc_type, version } => self
                .node(doc_type, version)
                .filter(|node| node.rollback.is_some())
                .map(|_| DiagramAction::Rollback { doc_type, version }),
        }
    }
}

/// 텍스트 렌더링
///
/// ```text
/// 백엔드 개발자
///   이력서: 이력서 (v0) [v0 되돌리기] -> *이력서 (v1)+
/// ```
/// `*`는 편집 중인 버전, `+`는 피드백이 있는 버전입니다.
impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.job_title)?;
        for lane in &self.lanes {
            write!(f, "  {}: ", lane.doc_type.korean_name())?;
            for (index, node) in lane.nodes.iter().enumerate() {
                if index > 0 {
                    write!(f, " -> ")?;
                }
                if node.is_active {
                    write!(f, "*")?;
                }
                write!(f, "{}", node.label)?;
                if node.has_feedback {
                    write!(f, "+")?;
                }
                if let Some(button) = &node.rollback {
                    write!(f, " [{}]", button.label)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
