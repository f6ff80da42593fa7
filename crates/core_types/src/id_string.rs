//! Typed, reference-counted handles into a [`NameTables`] table.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::id_table::{CaseMode, IdTable};
use crate::well_known;

/// Selects which of the three tables a handle lives in.
pub trait NameKind: 'static {
    fn table(tables: &NameTables) -> &Rc<RefCell<IdTable>>;
}

#[derive(Debug)]
pub enum LocalNameKind {}
#[derive(Debug)]
pub enum PrefixKind {}
#[derive(Debug)]
pub enum NamespaceKind {}

impl NameKind for LocalNameKind {
    fn table(tables: &NameTables) -> &Rc<RefCell<IdTable>> {
        &tables.local
    }
}

impl NameKind for PrefixKind {
    fn table(tables: &NameTables) -> &Rc<RefCell<IdTable>> {
        &tables.prefix
    }
}

impl NameKind for NamespaceKind {
    fn table(tables: &NameTables) -> &Rc<RefCell<IdTable>> {
        &tables.namespace
    }
}

/// The three interning tables a document's names are drawn from.
///
/// Cloning shares the tables; every handle created from a clone is
/// interchangeable with one created from the original.
#[derive(Clone, Debug)]
pub struct NameTables {
    local: Rc<RefCell<IdTable>>,
    prefix: Rc<RefCell<IdTable>>,
    namespace: Rc<RefCell<IdTable>>,
}

impl NameTables {
    /// Tables containing only the empty "no name" entry at id 0.
    pub fn empty() -> Self {
        let tables = Self {
            local: Rc::new(RefCell::new(IdTable::new("local-name"))),
            prefix: Rc::new(RefCell::new(IdTable::new("prefix"))),
            namespace: Rc::new(RefCell::new(IdTable::new("namespace"))),
        };
        for table in [&tables.local, &tables.prefix, &tables.namespace] {
            table.borrow_mut().add_static_mapping(0, "");
        }
        tables
    }

    /// Tables pre-seeded with the HTML names that have fixed ids.
    pub fn with_well_known() -> Self {
        let tables = Self::empty();
        well_known::register(&tables);
        tables
    }

    pub fn local(&self) -> &Rc<RefCell<IdTable>> {
        &self.local
    }

    pub fn prefix(&self) -> &Rc<RefCell<IdTable>> {
        &self.prefix
    }

    pub fn namespace(&self) -> &Rc<RefCell<IdTable>> {
        &self.namespace
    }

    pub fn same_tables(&self, other: &NameTables) -> bool {
        Rc::ptr_eq(&self.local, &other.local)
    }
}

impl Default for NameTables {
    fn default() -> Self {
        Self::with_well_known()
    }
}

/// An interned name holding one reference on its table entry.
pub struct IdString<K: NameKind> {
    id: u16,
    table: Rc<RefCell<IdTable>>,
    _kind: PhantomData<K>,
}

pub type LocalName = IdString<LocalNameKind>;
pub type PrefixName = IdString<PrefixKind>;
pub type NamespaceName = IdString<NamespaceKind>;

impl<K: NameKind> IdString<K> {
    pub fn from_string(tables: &NameTables, name: &str, mode: CaseMode) -> Self {
        let table = Rc::clone(K::table(tables));
        let id = table.borrow_mut().grab_id(name, mode);
        Self {
            id,
            table,
            _kind: PhantomData,
        }
    }

    /// Take a new reference on an id that is already mapped.
    pub fn from_id(tables: &NameTables, id: u16) -> Self {
        let table = Rc::clone(K::table(tables));
        table.borrow_mut().ref_id(id);
        Self {
            id,
            table,
            _kind: PhantomData,
        }
    }

    /// The "no name" handle (id 0).
    pub fn empty(tables: &NameTables) -> Self {
        Self::from_id(tables, 0)
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    pub fn name(&self) -> Rc<str> {
        self.table
            .borrow()
            .name_of(self.id)
            .unwrap_or_else(|| Rc::from(""))
    }
}

impl<K: NameKind> Clone for IdString<K> {
    fn clone(&self) -> Self {
        self.table.borrow_mut().ref_id(self.id);
        Self {
            id: self.id,
            table: Rc::clone(&self.table),
            _kind: PhantomData,
        }
    }
}

impl<K: NameKind> Drop for IdString<K> {
    fn drop(&mut self) {
        self.table.borrow_mut().deref_id(self.id);
    }
}

impl<K: NameKind> PartialEq for IdString<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.table, &other.table)
    }
}

impl<K: NameKind> Eq for IdString<K> {}

impl<K: NameKind> Hash for IdString<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K: NameKind> fmt::Debug for IdString<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{:?})", self.table.borrow().label(), self.id, self.name())
    }
}

impl<K: NameKind> fmt::Display for IdString<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well_known::local;

    #[test]
    fn clone_and_drop_track_references() {
        let tables = NameTables::empty();
        let first = LocalName::from_string(&tables, "custom", CaseMode::CaseSensitive);
        let id = first.id();
        let second = first.clone();
        assert_eq!(tables.local().borrow().ref_count(id), 2);

        drop(first);
        assert_eq!(tables.local().borrow().ref_count(id), 1);
        assert_eq!(&*second.name(), "custom");

        drop(second);
        assert_eq!(
            tables.local().borrow().lookup("custom", CaseMode::CaseSensitive),
            None
        );
    }

    #[test]
    fn well_known_names_resolve_to_fixed_ids() {
        let tables = NameTables::with_well_known();
        let script = LocalName::from_string(&tables, "SCRIPT", CaseMode::NormalizeLower);
        assert_eq!(script.id(), local::SCRIPT);

        let any = LocalName::from_id(&tables, local::ANY);
        assert_eq!(&*any.name(), "*");
        let star = LocalName::from_string(&tables, "*", CaseMode::CaseSensitive);
        assert_ne!(star, any, "wildcard must not be reachable by string");
    }

    #[test]
    fn handles_from_shared_tables_compare_equal() {
        let tables = NameTables::with_well_known();
        let other = tables.clone();
        let a = LocalName::from_string(&tables, "widget", CaseMode::NormalizeLower);
        let b = LocalName::from_string(&other, "Widget", CaseMode::NormalizeLower);
        assert_eq!(a, b);
        assert!(tables.same_tables(&other));
    }
}
