//! Interned names shared by the DOM and the HTML parser.

pub mod id_string;
pub mod id_table;
pub mod well_known;

pub use id_string::{
    IdString, LocalName, LocalNameKind, NameKind, NameTables, NamespaceKind, NamespaceName,
    PrefixKind, PrefixName,
};
pub use id_table::{CaseMode, FALLBACK_ID, IdTable, MAX_SLOTS};
pub use well_known::{local, namespace, prefix};
