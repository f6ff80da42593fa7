//! Reference-counted string interning into 16-bit ids.
//!
//! Invariants:
//! - Every live id other than [`FALLBACK_ID`] has `ref_count > 0`; an id whose
//!   count reaches zero is unmapped and pushed onto the free list.
//! - Case handling is chosen per call ([`CaseMode`]), never per table. New
//!   entries are stored in the canonical case of the mode that created them.
//! - Once every slot is in use, further distinct names alias to the pinned
//!   [`FALLBACK_ID`]. This is lossy on purpose and never reported as an error.
//! - Hidden mappings resolve by id but are absent from the string lookup.

use std::borrow::Cow;
use std::collections::HashMap;
use std::rc::Rc;

/// Id shared by every name interned after the table filled up.
pub const FALLBACK_ID: u16 = 0xFFFF;

/// Number of allocatable slots (`0..FALLBACK_ID`).
pub const MAX_SLOTS: usize = FALLBACK_ID as usize - 1;

const FALLBACK_NAME: &str = "#fallback";

/// Case normalization applied to one lookup or insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaseMode {
    CaseSensitive,
    NormalizeUpper,
    NormalizeLower,
}

impl CaseMode {
    /// ASCII-only folding; non-ASCII code points are preserved.
    pub fn canonicalize<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            CaseMode::CaseSensitive => Cow::Borrowed(name),
            CaseMode::NormalizeLower => {
                if name.bytes().any(|b| b.is_ascii_uppercase()) {
                    Cow::Owned(name.to_ascii_lowercase())
                } else {
                    Cow::Borrowed(name)
                }
            }
            CaseMode::NormalizeUpper => {
                if name.bytes().any(|b| b.is_ascii_lowercase()) {
                    Cow::Owned(name.to_ascii_uppercase())
                } else {
                    Cow::Borrowed(name)
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    name: Option<Rc<str>>,
    ref_count: u32,
}

/// One interning table (local names, prefixes or namespaces).
#[derive(Debug)]
pub struct IdTable {
    label: &'static str,
    slots: Vec<Slot>,
    lookup: HashMap<Rc<str>, u16>,
    free: Vec<u16>,
    handed_out_dynamic: bool,
    fallback_warned: bool,
    fallback_name: Rc<str>,
}

impl IdTable {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            slots: Vec::new(),
            lookup: HashMap::new(),
            free: Vec::new(),
            handed_out_dynamic: false,
            fallback_warned: false,
            fallback_name: Rc::from(FALLBACK_NAME),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Intern `name`, returning an id that the caller now holds one reference to.
    ///
    /// The empty string is an ordinary key: it stands for "no name".
    pub fn grab_id(&mut self, name: &str, mode: CaseMode) -> u16 {
        let key = mode.canonicalize(name);
        if let Some(&id) = self.lookup.get(key.as_ref()) {
            self.ref_id(id);
            return id;
        }

        let Some(id) = self.allocate_slot() else {
            if !self.fallback_warned {
                self.fallback_warned = true;
                log::warn!(
                    target: "names.table",
                    "{} table exhausted after {} names; aliasing new names to the fallback id",
                    self.label,
                    MAX_SLOTS
                );
            }
            return FALLBACK_ID;
        };
        self.handed_out_dynamic = true;

        let name: Rc<str> = Rc::from(key.as_ref());
        let slot = &mut self.slots[id as usize];
        slot.name = Some(Rc::clone(&name));
        slot.ref_count = 1;
        self.lookup.insert(name, id);
        id
    }

    /// Find an existing id without taking a reference.
    pub fn lookup(&self, name: &str, mode: CaseMode) -> Option<u16> {
        let key = mode.canonicalize(name);
        self.lookup.get(key.as_ref()).copied()
    }

    pub fn ref_id(&mut self, id: u16) {
        if id == FALLBACK_ID {
            return;
        }
        let slot = self.live_slot_mut(id);
        slot.ref_count = slot.ref_count.saturating_add(1);
    }

    pub fn deref_id(&mut self, id: u16) {
        if id == FALLBACK_ID {
            return;
        }
        let slot = self.live_slot_mut(id);
        slot.ref_count -= 1;
        if slot.ref_count > 0 {
            return;
        }
        if let Some(name) = slot.name.take() {
            if self.lookup.get(&name) == Some(&id) {
                self.lookup.remove(&name);
            }
        }
        self.free.push(id);
    }

    pub fn name_of(&self, id: u16) -> Option<Rc<str>> {
        if id == FALLBACK_ID {
            return Some(Rc::clone(&self.fallback_name));
        }
        self.slots.get(id as usize).and_then(|slot| slot.name.clone())
    }

    /// Current reference count; 0 for unmapped ids, pinned 1 for the fallback.
    pub fn ref_count(&self, id: u16) -> u32 {
        if id == FALLBACK_ID {
            return 1;
        }
        self.slots
            .get(id as usize)
            .map(|slot| slot.ref_count)
            .unwrap_or(0)
    }

    /// Number of ids currently mapped (static, hidden and dynamic).
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.name.is_some()).count()
    }

    /// Register a compile-time id that is also reachable by string lookup.
    pub fn add_static_mapping(&mut self, id: u16, name: &str) {
        self.add_hidden_mapping(id, name);
        if let Some(name) = self.slots[id as usize].name.clone() {
            self.lookup.insert(name, id);
        }
    }

    /// Register a compile-time id that is resolvable by id only.
    ///
    /// The entry is pinned with one reference that is never released.
    pub fn add_hidden_mapping(&mut self, id: u16, name: &str) {
        assert!(
            !self.handed_out_dynamic,
            "{} table: static mapping {id} ({name:?}) registered after dynamic ids",
            self.label
        );
        assert!(
            (id as usize) < MAX_SLOTS,
            "{} table: static id {id} is out of range",
            self.label
        );
        let idx = id as usize;
        if idx >= self.slots.len() {
            let start = self.slots.len();
            self.slots.resize_with(idx + 1, Slot::default);
            // Gap slots stay allocatable; lower ids are handed out first.
            self.free
                .extend((start..idx).rev().map(|gap| gap as u16));
        } else {
            assert!(
                self.slots[idx].name.is_none(),
                "{} table: static id {id} registered twice",
                self.label
            );
            self.free.retain(|&free| free != id);
        }
        let slot = &mut self.slots[idx];
        slot.name = Some(Rc::from(name));
        slot.ref_count = 1;
    }

    fn allocate_slot(&mut self) -> Option<u16> {
        if let Some(id) = self.free.pop() {
            return Some(id);
        }
        if self.slots.len() >= MAX_SLOTS {
            return None;
        }
        self.slots.push(Slot::default());
        Some((self.slots.len() - 1) as u16)
    }

    fn live_slot_mut(&mut self, id: u16) -> &mut Slot {
        let label = self.label;
        match self.slots.get_mut(id as usize) {
            Some(slot) if slot.name.is_some() => slot,
            _ => panic!("{label} table: reference count change on unmapped id {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_mode_returns_same_id() {
        let mut table = IdTable::new("test");
        let a = table.grab_id("div", CaseMode::CaseSensitive);
        let b = table.grab_id("div", CaseMode::CaseSensitive);
        assert_eq!(a, b);
        assert_eq!(table.ref_count(a), 2);
        assert_eq!(table.name_of(a).as_deref(), Some("div"));
    }

    #[test]
    fn normalize_lower_folds_but_case_sensitive_does_not() {
        let mut table = IdTable::new("test");
        let upper = table.grab_id("Foo", CaseMode::NormalizeLower);
        let lower = table.grab_id("foo", CaseMode::NormalizeLower);
        assert_eq!(upper, lower);
        assert_eq!(table.name_of(upper).as_deref(), Some("foo"));

        let exact_upper = table.grab_id("Foo", CaseMode::CaseSensitive);
        let exact_lower = table.grab_id("foo", CaseMode::CaseSensitive);
        assert_ne!(exact_upper, exact_lower);
        // The lowercase entry is shared with the folded lookups above.
        assert_eq!(exact_lower, lower);
    }

    #[test]
    fn normalize_upper_canonicalizes_new_entries() {
        let mut table = IdTable::new("test");
        let id = table.grab_id("click", CaseMode::NormalizeUpper);
        assert_eq!(table.name_of(id).as_deref(), Some("CLICK"));
        assert_eq!(table.lookup("Click", CaseMode::NormalizeUpper), Some(id));
        assert_eq!(table.lookup("click", CaseMode::CaseSensitive), None);
    }

    #[test]
    fn released_ids_are_unmapped_and_reused() {
        let mut table = IdTable::new("test");
        let id = table.grab_id("span", CaseMode::CaseSensitive);
        table.deref_id(id);
        assert_eq!(table.ref_count(id), 0);
        assert_eq!(table.lookup("span", CaseMode::CaseSensitive), None);
        assert_eq!(table.name_of(id), None);

        let reused = table.grab_id("em", CaseMode::CaseSensitive);
        assert_eq!(reused, id, "freed slot must be recycled");
    }

    #[test]
    fn hidden_mapping_is_not_found_by_string() {
        let mut table = IdTable::new("test");
        table.add_static_mapping(0, "");
        table.add_hidden_mapping(3, "*");
        assert_eq!(table.name_of(3).as_deref(), Some("*"));
        assert_eq!(table.lookup("*", CaseMode::CaseSensitive), None);

        let star = table.grab_id("*", CaseMode::CaseSensitive);
        assert_ne!(star, 3);
        // Gap ids 1 and 2 are allocatable.
        assert!(star == 1 || star == 2, "unexpected id {star}");
    }

    #[test]
    fn empty_name_is_a_regular_key() {
        let mut table = IdTable::new("test");
        table.add_static_mapping(0, "");
        assert_eq!(table.grab_id("", CaseMode::NormalizeLower), 0);
        assert_eq!(table.ref_count(0), 2);
    }

    #[test]
    #[should_panic(expected = "registered after dynamic ids")]
    fn static_mapping_after_dynamic_id_panics() {
        let mut table = IdTable::new("test");
        table.grab_id("a", CaseMode::CaseSensitive);
        table.add_static_mapping(10, "b");
    }

    #[test]
    fn exhaustion_aliases_to_pinned_fallback() {
        let mut table = IdTable::new("test");
        for i in 0..MAX_SLOTS {
            let id = table.grab_id(&format!("n{i}"), CaseMode::CaseSensitive);
            assert_ne!(id, FALLBACK_ID, "slot {i} must still be allocatable");
        }
        let a = table.grab_id("overflow-a", CaseMode::CaseSensitive);
        let b = table.grab_id("overflow-b", CaseMode::CaseSensitive);
        assert_eq!(a, FALLBACK_ID);
        assert_eq!(b, FALLBACK_ID);

        table.ref_id(FALLBACK_ID);
        table.deref_id(FALLBACK_ID);
        table.deref_id(FALLBACK_ID);
        assert_eq!(table.ref_count(FALLBACK_ID), 1);
        assert_eq!(table.name_of(FALLBACK_ID).as_deref(), Some(FALLBACK_NAME));

        // Freeing a slot makes room for a real entry again.
        let first = table
            .lookup("n0", CaseMode::CaseSensitive)
            .expect("n0 interned above");
        table.deref_id(first);
        assert_eq!(table.grab_id("fresh", CaseMode::CaseSensitive), first);
    }
}
