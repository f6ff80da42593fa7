use crate::node::{NodeId, NodeKind};

/// Constraint violations reported by the mutation API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),
    #[error("node {node:?} is not a child of {parent:?}")]
    NotFound { parent: NodeId, node: NodeId },
    #[error("invalid character in name {0:?}")]
    InvalidCharacter(String),
    #[error("operation not supported on a {0:?} node")]
    InvalidNodeType(NodeKind),
}
