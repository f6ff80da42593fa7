//! Membership predicates for the standard live lists.

use core_types::{CaseMode, LocalName, NameTables, NamespaceName, PrefixName, local, namespace};

use super::{ListType, Match, NodeMatcher};
use crate::document::{Document, QuirksMode};
use crate::node::{NodeId, parse_classes};
use crate::version::TreeVersion;

/// Every direct child; never recurses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChildNodes;

impl NodeMatcher for ChildNodes {
    fn matches(&self, _doc: &Document, _node: NodeId) -> Match {
        Match::new(true, false)
    }

    fn list_type(&self) -> ListType {
        ListType::ChildNodes
    }
}

/// Element name match with `*` wildcards.
///
/// Without namespace awareness the query is a qualified name: HTML elements are
/// compared against its lowercased form, other elements against it verbatim,
/// and the prefix must be equal. With namespace awareness the namespace and
/// local name are compared independently.
#[derive(Debug)]
pub struct TagMatcher {
    namespace_aware: bool,
    namespace: NamespaceName,
    local_exact: LocalName,
    local_lower: LocalName,
    prefix: PrefixName,
}

impl TagMatcher {
    pub fn by_qualified_name(names: &NameTables, qualified_name: &str) -> Self {
        let namespace = NamespaceName::from_id(names, namespace::ANY);
        if qualified_name == "*" {
            return Self {
                namespace_aware: false,
                namespace,
                local_exact: LocalName::from_id(names, local::ANY),
                local_lower: LocalName::from_id(names, local::ANY),
                prefix: PrefixName::empty(names),
            };
        }
        let (prefix, local_name) = match qualified_name.split_once(':') {
            Some((prefix, local_name)) => (prefix, local_name),
            None => ("", qualified_name),
        };
        Self {
            namespace_aware: false,
            namespace,
            local_exact: LocalName::from_string(names, local_name, CaseMode::CaseSensitive),
            local_lower: LocalName::from_string(names, local_name, CaseMode::NormalizeLower),
            prefix: PrefixName::from_string(names, prefix, CaseMode::CaseSensitive),
        }
    }

    pub fn by_namespace(names: &NameTables, namespace_uri: &str, local_name: &str) -> Self {
        let namespace = if namespace_uri == "*" {
            NamespaceName::from_id(names, namespace::ANY)
        } else {
            NamespaceName::from_string(names, namespace_uri, CaseMode::CaseSensitive)
        };
        let local_exact = if local_name == "*" {
            LocalName::from_id(names, local::ANY)
        } else {
            LocalName::from_string(names, local_name, CaseMode::CaseSensitive)
        };
        Self {
            namespace_aware: true,
            namespace,
            local_lower: local_exact.clone(),
            local_exact,
            prefix: PrefixName::empty(names),
        }
    }
}

impl NodeMatcher for TagMatcher {
    fn matches(&self, doc: &Document, node: NodeId) -> Match {
        let Some(element) = doc.element(node) else {
            return Match::new(false, true);
        };
        let any_local = self.local_exact.id() == local::ANY;
        let matched = if self.namespace_aware {
            (self.namespace.id() == namespace::ANY || self.namespace.id() == element.namespace.id())
                && (any_local || self.local_exact.id() == element.local.id())
        } else if any_local {
            true
        } else {
            let wanted = if element.namespace.id() == namespace::XHTML {
                &self.local_lower
            } else {
                &self.local_exact
            };
            wanted.id() == element.local.id() && self.prefix.id() == element.prefix.id()
        };
        Match::new(matched, true)
    }
}

/// Elements carrying every class of the query set.
#[derive(Clone, Debug)]
pub struct ClassMatcher {
    classes: Vec<Box<str>>,
}

impl ClassMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            classes: parse_classes(query),
        }
    }
}

impl NodeMatcher for ClassMatcher {
    fn matches(&self, doc: &Document, node: NodeId) -> Match {
        let Some(element) = doc.element(node) else {
            return Match::new(false, false);
        };
        if self.classes.is_empty() {
            return Match::new(false, true);
        }
        let quirks = doc.quirks_mode() == QuirksMode::Quirks;
        let has = |wanted: &str| {
            element.classes().iter().any(|class| {
                if quirks {
                    class.eq_ignore_ascii_case(wanted)
                } else {
                    &**class == wanted
                }
            })
        };
        Match::new(self.classes.iter().all(|wanted| has(wanted)), true)
    }

    fn secondary_version(&self) -> Option<TreeVersion> {
        Some(TreeVersion::Class)
    }
}

/// Elements of any namespace whose `name` attribute equals a fixed string.
#[derive(Clone, Debug)]
pub struct NameMatcher {
    name: String,
}

impl NameMatcher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl NodeMatcher for NameMatcher {
    fn matches(&self, doc: &Document, node: NodeId) -> Match {
        let matched = doc.element(node).is_some()
            && doc.attribute_value(node, local::NAME) == Some(self.name.as_str());
        Match::new(matched, true)
    }

    fn secondary_version(&self) -> Option<TreeVersion> {
        Some(TreeVersion::IdNameHref)
    }
}
