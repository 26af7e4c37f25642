//! API-surface errors. Orchestration-domain problems (unresolvable labels,
//! superseded animations, unknown value keys) are non-fatal by design and
//! surface through outputs/log instead.

use thiserror::Error;

use crate::ids::NodeId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("unknown parent node {0:?}")]
    UnknownParent(NodeId),
}
