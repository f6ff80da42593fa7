//! Per-document mutation counters.
//!
//! Invariant: every counter is monotonically non-decreasing for the life of
//! the document. Live collections snapshot the counters they depend on and
//! treat any difference as "recompute before use".

/// Category of mutation a counter tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeVersion {
    /// Insertion, removal or reparenting anywhere in the tree.
    Structural,
    /// `id`, `name` or `href` attribute changes.
    IdNameHref,
    /// `class` attribute changes (and quirks-mode switches, which change how
    /// classes compare).
    Class,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeVersions {
    structural: u64,
    id_name_href: u64,
    class: u64,
}

impl TreeVersions {
    pub fn get(&self, which: TreeVersion) -> u64 {
        match which {
            TreeVersion::Structural => self.structural,
            TreeVersion::IdNameHref => self.id_name_href,
            TreeVersion::Class => self.class,
        }
    }

    pub(crate) fn bump(&mut self, which: TreeVersion) {
        let counter = match which {
            TreeVersion::Structural => &mut self.structural,
            TreeVersion::IdNameHref => &mut self.id_name_href,
            TreeVersion::Class => &mut self.class,
        };
        *counter = counter.wrapping_add(1);
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "dom.version", "{which:?} -> {}", *counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent() {
        let mut versions = TreeVersions::default();
        versions.bump(TreeVersion::Class);
        versions.bump(TreeVersion::Class);
        versions.bump(TreeVersion::Structural);
        assert_eq!(versions.get(TreeVersion::Structural), 1);
        assert_eq!(versions.get(TreeVersion::IdNameHref), 0);
        assert_eq!(versions.get(TreeVersion::Class), 2);
    }
}
