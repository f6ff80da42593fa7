//! Arena DOM with mutation counters, live node lists and snapshot lists.

pub mod document;
pub mod error;
pub mod node;
pub mod node_list;
pub mod position;
pub mod snapshot;
pub mod static_list;
pub mod version;

pub use document::{Children, Descendants, Document, QuirksMode};
pub use error::DomError;
pub use node::{AttrData, DoctypeData, ElementData, NodeData, NodeId, NodeKind};
pub use node_list::{
    ChildNodes, ClassMatcher, DynamicNodeList, ListCache, ListType, Match, NameMatcher,
    NodeMatcher, TagMatcher,
};
pub use position::DocumentPosition;
pub use snapshot::DomSnapshot;
pub use static_list::{Normalization, StaticNodeList};
pub use version::{TreeVersion, TreeVersions};
